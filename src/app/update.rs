//! The reducer: one message in, state stepped, effects out.
//!
//! Effects are descriptions of work for the runtime (fetches, surface
//! updates, the marker overlay); the reducer itself never touches IO, so
//! every navigation path is testable synchronously.

use super::messages::Message;
use super::state::App;
use crate::model::{Book, BookId, VolumeId};
use crate::navigation::{self, AdjacentChapter, Direction, LocationToken, NavState};
use crate::places::Place;
use crate::render::{self, Crumb, NavLink, Region, Transition, ViewDocument};
use crate::retry::CancellationToken;
use tracing::{debug, info, warn};

/// Work requested from the runtime by a reduction step.
#[derive(Debug, Clone)]
pub enum Effect {
    SetBreadcrumbs(Vec<Crumb>),
    Show {
        region: Region,
        document: ViewDocument,
    },
    SetChapterNav {
        previous: Option<NavLink>,
        next: Option<NavLink>,
    },
    FetchChapter {
        slot: Region,
        book_id: BookId,
        chapter: u32,
        request_id: u64,
    },
    RunOverlay {
        places: Vec<Place>,
        cancel: CancellationToken,
    },
    ClearMarkers,
    Shutdown,
}

impl App {
    pub fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::LocationChanged(token) => {
                self.handle_location_changed(&token, &mut effects)
            }
            Message::ChapterLoaded {
                slot,
                book_id,
                chapter,
                request_id,
                markup,
                places,
            } => self.handle_chapter_loaded(
                slot,
                book_id,
                chapter,
                request_id,
                markup,
                places,
                &mut effects,
            ),
            Message::ChapterLoadFailed {
                slot,
                request_id,
                error,
            } => {
                // Localized failure: the affected region keeps whatever it
                // was showing.
                warn!(?slot, request_id, %error, "Chapter request failed");
            }
            Message::Quit => effects.push(Effect::Shutdown),
        }
        effects
    }

    fn handle_location_changed(&mut self, token: &str, effects: &mut Vec<Effect>) {
        self.cancel_overlay();
        let previous = self.nav;
        let next = navigation::resolve(&self.catalog, token);
        self.pending_transition = transition_between(previous, next);
        self.nav = next;
        let request_id = self.next_request();
        info!(token, state = ?next, "Location resolved");

        match next {
            NavState::Home => self.show_volume_grid(None, effects),
            NavState::VolumeList(volume_id) => self.show_volume_grid(Some(volume_id), effects),
            NavState::BookChapters(book_id) => {
                let Some(book) = self.catalog.book(book_id) else {
                    debug!(book_id, "Resolved book vanished from the catalog");
                    self.show_volume_grid(None, effects);
                    return;
                };
                if book.num_chapters == 0 {
                    // Single-chapter work: skip the grid, go straight to
                    // its only chapter.
                    self.show_chapter(book_id, 0, request_id, effects);
                } else {
                    self.show_chapter_grid(book, effects);
                }
            }
            NavState::Chapter { book_id, chapter } => {
                self.show_chapter(book_id, chapter, request_id, effects);
            }
        }
    }

    fn show_volume_grid(&self, only: Option<VolumeId>, effects: &mut Vec<Effect>) {
        let volume = only.and_then(|id| self.catalog.volume(id));
        effects.push(Effect::SetBreadcrumbs(render::breadcrumbs(volume, None, None)));
        effects.push(Effect::Show {
            region: Region::Current,
            document: render::volume_grid(&self.catalog, only),
        });
        self.clear_chapter_regions(effects);
    }

    fn show_chapter_grid(&self, book: &Book, effects: &mut Vec<Effect>) {
        let volume = self.catalog.volume_for_book(book);
        effects.push(Effect::SetBreadcrumbs(render::breadcrumbs(
            volume,
            Some(book),
            None,
        )));
        effects.push(Effect::Show {
            region: Region::Current,
            document: render::chapter_grid(&self.catalog, book),
        });
        self.clear_chapter_regions(effects);
    }

    fn clear_chapter_regions(&self, effects: &mut Vec<Effect>) {
        effects.push(Effect::Show {
            region: Region::Previous,
            document: ViewDocument::Empty,
        });
        effects.push(Effect::Show {
            region: Region::Next,
            document: ViewDocument::Empty,
        });
        effects.push(Effect::SetChapterNav {
            previous: None,
            next: None,
        });
        effects.push(Effect::ClearMarkers);
    }

    fn show_chapter(
        &self,
        book_id: BookId,
        chapter: u32,
        request_id: u64,
        effects: &mut Vec<Effect>,
    ) {
        let Some(book) = self.catalog.book(book_id) else {
            debug!(book_id, "Resolved chapter's book vanished from the catalog");
            return;
        };
        let volume = self.catalog.volume_for_book(book);
        effects.push(Effect::SetBreadcrumbs(render::breadcrumbs(
            volume,
            Some(book),
            Some(chapter),
        )));

        let previous =
            navigation::adjacent_chapter(&self.catalog, book_id, chapter, Direction::Backward);
        let next =
            navigation::adjacent_chapter(&self.catalog, book_id, chapter, Direction::Forward);
        effects.push(Effect::SetChapterNav {
            previous: previous.as_ref().map(|adj| self.nav_link(adj)),
            next: next.as_ref().map(|adj| self.nav_link(adj)),
        });
        effects.push(Effect::ClearMarkers);

        effects.push(Effect::FetchChapter {
            slot: Region::Current,
            book_id,
            chapter,
            request_id,
        });
        self.prefetch_region(Region::Previous, previous, request_id, effects);
        self.prefetch_region(Region::Next, next, request_id, effects);
    }

    /// Prefetch an adjacent chapter into its region, or blank the region
    /// at the corpus boundary.
    fn prefetch_region(
        &self,
        slot: Region,
        adjacent: Option<AdjacentChapter>,
        request_id: u64,
        effects: &mut Vec<Effect>,
    ) {
        match adjacent {
            Some(adj) => effects.push(Effect::FetchChapter {
                slot,
                book_id: adj.book_id,
                chapter: adj.chapter,
                request_id,
            }),
            None => effects.push(Effect::Show {
                region: slot,
                document: ViewDocument::Empty,
            }),
        }
    }

    fn nav_link(&self, adjacent: &AdjacentChapter) -> NavLink {
        let volume_id = self
            .catalog
            .book(adjacent.book_id)
            .map(|book| book.parent_book_id)
            .unwrap_or_default();
        NavLink {
            title: adjacent.title.clone(),
            target: LocationToken::chapter(volume_id, adjacent.book_id, adjacent.chapter),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_chapter_loaded(
        &mut self,
        slot: Region,
        book_id: BookId,
        chapter: u32,
        request_id: u64,
        markup: String,
        places: Vec<Place>,
        effects: &mut Vec<Effect>,
    ) {
        if request_id != self.request_id {
            debug!(
                ?slot,
                request_id,
                current = self.request_id,
                "Dropping stale chapter response"
            );
            return;
        }
        let title = self
            .catalog
            .book(book_id)
            .map(|book| book.chapter_title(chapter))
            .unwrap_or_default();
        let transition = if matches!(slot, Region::Current) {
            self.pending_transition
        } else {
            Transition::None
        };
        effects.push(Effect::Show {
            region: slot,
            document: ViewDocument::ChapterText {
                title,
                markup,
                places: places.clone(),
                transition,
            },
        });
        if matches!(slot, Region::Current) {
            let cancel = CancellationToken::new();
            self.overlay_cancel = Some(cancel.clone());
            effects.push(Effect::RunOverlay { places, cancel });
        }
    }
}

/// Slide direction between two chapter states; anything else is a plain
/// swap.
fn transition_between(previous: NavState, next: NavState) -> Transition {
    let (NavState::Chapter { book_id: b0, chapter: c0 }, NavState::Chapter { book_id: b1, chapter: c1 }) =
        (previous, next)
    else {
        return Transition::None;
    };
    match (b1, c1).cmp(&(b0, c0)) {
        std::cmp::Ordering::Greater => Transition::Forward,
        std::cmp::Ordering::Less => Transition::Backward,
        std::cmp::Ordering::Equal => Transition::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::small_catalog;

    fn app() -> App {
        App::new(small_catalog())
    }

    fn fetches(effects: &[Effect]) -> Vec<(Region, BookId, u32, u64)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::FetchChapter {
                    slot,
                    book_id,
                    chapter,
                    request_id,
                } => Some((*slot, *book_id, *chapter, *request_id)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn home_renders_the_full_volume_grid() {
        let mut app = app();
        let effects = app.reduce(Message::LocationChanged(String::new()));
        assert_eq!(app.nav(), NavState::Home);
        let grid = effects.iter().find_map(|effect| match effect {
            Effect::Show {
                region: Region::Current,
                document: ViewDocument::VolumeGrid { sections },
            } => Some(sections.len()),
            _ => None,
        });
        assert_eq!(grid, Some(2));
        assert!(effects.iter().any(|e| matches!(e, Effect::ClearMarkers)));
    }

    #[test]
    fn chapter_navigation_issues_three_region_fetches() {
        let mut app = app();
        let effects = app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let fetches = fetches(&effects);
        assert_eq!(fetches.len(), 3);
        assert_eq!(fetches[0].0, Region::Current);
        assert_eq!((fetches[0].1, fetches[0].2), (5, 2));
        assert!(fetches.iter().any(|f| f.0 == Region::Previous && f.2 == 1));
        assert!(fetches.iter().any(|f| f.0 == Region::Next && f.2 == 3));
        // All three carry the same request generation.
        assert!(fetches.iter().all(|f| f.3 == fetches[0].3));
    }

    #[test]
    fn last_chapter_blanks_the_next_region() {
        let mut app = app();
        let effects = app.reduce(Message::LocationChanged("2:8:4".to_string()));
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Show {
                region: Region::Next,
                document: ViewDocument::Empty,
            }
        )));
        let next_link = effects.iter().find_map(|effect| match effect {
            Effect::SetChapterNav { next, .. } => Some(next.clone()),
            _ => None,
        });
        assert_eq!(next_link, Some(None));
    }

    #[test]
    fn chapterless_book_goes_straight_to_chapter_zero() {
        let mut app = app();
        let effects = app.reduce(Message::LocationChanged("2:7".to_string()));
        let fetches = fetches(&effects);
        assert_eq!((fetches[0].0, fetches[0].1, fetches[0].2), (Region::Current, 7, 0));
    }

    #[test]
    fn invalid_token_falls_back_to_home() {
        let mut app = app();
        let effects = app.reduce(Message::LocationChanged("9:9:9".to_string()));
        assert_eq!(app.nav(), NavState::Home);
        assert!(fetches(&effects).is_empty());
    }

    #[test]
    fn current_chapter_load_runs_the_overlay() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let effects = app.reduce(Message::ChapterLoaded {
            slot: Region::Current,
            book_id: 5,
            chapter: 2,
            request_id: app.request_id,
            markup: "<p>text</p>".to_string(),
            places: vec![Place {
                name: "Jerusalem".to_string(),
                latitude: 31.77,
                longitude: 35.21,
            }],
        });
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::RunOverlay { places, .. } if places.len() == 1)));
        assert!(app.overlay_cancel.is_some());
    }

    #[test]
    fn prefetch_load_renders_without_an_overlay() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let effects = app.reduce(Message::ChapterLoaded {
            slot: Region::Next,
            book_id: 5,
            chapter: 3,
            request_id: app.request_id,
            markup: String::new(),
            places: Vec::new(),
        });
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Show {
                region: Region::Next,
                document: ViewDocument::ChapterText { .. },
            }
        )));
        assert!(!effects.iter().any(|e| matches!(e, Effect::RunOverlay { .. })));
    }

    #[test]
    fn stale_chapter_responses_are_dropped() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let stale_id = app.request_id;
        app.reduce(Message::LocationChanged("1:6:1".to_string()));
        let effects = app.reduce(Message::ChapterLoaded {
            slot: Region::Current,
            book_id: 5,
            chapter: 2,
            request_id: stale_id,
            markup: String::new(),
            places: Vec::new(),
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn fetch_failure_leaves_the_region_unchanged() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let effects = app.reduce(Message::ChapterLoadFailed {
            slot: Region::Previous,
            request_id: app.request_id,
            error: "timeout".to_string(),
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn navigating_away_cancels_the_running_overlay() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let effects = app.reduce(Message::ChapterLoaded {
            slot: Region::Current,
            book_id: 5,
            chapter: 2,
            request_id: app.request_id,
            markup: String::new(),
            places: Vec::new(),
        });
        let cancel = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::RunOverlay { cancel, .. } => Some(cancel.clone()),
                _ => None,
            })
            .expect("overlay should start");
        assert!(!cancel.is_cancelled());
        app.reduce(Message::LocationChanged(String::new()));
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn re_resolving_the_same_token_is_idempotent() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        let nav = app.nav();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        assert_eq!(app.nav(), nav);
    }

    #[test]
    fn forward_chapter_steps_hint_a_forward_transition() {
        let mut app = app();
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        app.reduce(Message::LocationChanged("1:5:3".to_string()));
        assert_eq!(app.pending_transition, Transition::Forward);
        app.reduce(Message::LocationChanged("1:5:2".to_string()));
        assert_eq!(app.pending_transition, Transition::Backward);
    }
}
