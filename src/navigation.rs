//! Location-token parsing and navigation-state resolution.
//!
//! A location token is the colon-delimited `volumeId[:bookId[:chapter]]`
//! string surfaced by the host's addressable-location mechanism. Resolution
//! is a pure function of the token and the catalog snapshot; anything
//! malformed or out of range falls back to [`NavState::Home`].

use crate::model::{BookId, Catalog, VolumeId};
use std::fmt;

/// Validated display state for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Home,
    VolumeList(VolumeId),
    BookChapters(BookId),
    Chapter { book_id: BookId, chapter: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A composed location token, carried on rendered links instead of
/// markup-embedded handler strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationToken(String);

impl LocationToken {
    pub fn home() -> Self {
        LocationToken(String::new())
    }

    pub fn volume(volume_id: VolumeId) -> Self {
        LocationToken(volume_id.to_string())
    }

    pub fn book(volume_id: VolumeId, book_id: BookId) -> Self {
        LocationToken(format!("{volume_id}:{book_id}"))
    }

    pub fn chapter(volume_id: VolumeId, book_id: BookId, chapter: u32) -> Self {
        LocationToken(format!("{volume_id}:{book_id}:{chapter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve a raw token against the catalog. Deterministic and
/// side-effect free; re-resolving the same token yields the same state.
pub fn resolve(catalog: &Catalog, token: &str) -> NavState {
    let token = token.trim().trim_start_matches('#');
    if token.is_empty() {
        return NavState::Home;
    }
    let parts: Vec<&str> = token.split(':').collect();
    match parts.len() {
        1 => {
            let Ok(volume_id) = parts[0].trim().parse::<VolumeId>() else {
                return NavState::Home;
            };
            match catalog.volume_id_range() {
                Some((min, max)) if (min..=max).contains(&volume_id) => {
                    NavState::VolumeList(volume_id)
                }
                _ => NavState::Home,
            }
        }
        2 => {
            let Ok(book_id) = parts[1].trim().parse::<BookId>() else {
                return NavState::Home;
            };
            if catalog.book(book_id).is_some() {
                NavState::BookChapters(book_id)
            } else {
                NavState::Home
            }
        }
        _ => {
            let (Ok(book_id), Ok(chapter)) = (
                parts[1].trim().parse::<BookId>(),
                parts[2].trim().parse::<u32>(),
            ) else {
                return NavState::Home;
            };
            if catalog.chapter_valid(book_id, chapter) {
                NavState::Chapter { book_id, chapter }
            } else {
                NavState::Home
            }
        }
    }
}

/// Target of a previous/next chapter link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentChapter {
    pub book_id: BookId,
    pub chapter: u32,
    pub title: String,
}

/// Step one chapter forward or backward, rolling over between books in id
/// order. A chapterless book contributes the single chapter `0`. Returns
/// `None` past either end of the corpus.
pub fn adjacent_chapter(
    catalog: &Catalog,
    book_id: BookId,
    chapter: u32,
    direction: Direction,
) -> Option<AdjacentChapter> {
    let book = catalog.book(book_id)?;
    match direction {
        Direction::Forward => {
            if chapter < book.num_chapters {
                return Some(AdjacentChapter {
                    book_id,
                    chapter: chapter + 1,
                    title: book.chapter_title(chapter + 1),
                });
            }
            let next = catalog.book(book_id + 1)?;
            let first = if next.num_chapters > 0 { 1 } else { 0 };
            Some(AdjacentChapter {
                book_id: next.id,
                chapter: first,
                title: next.chapter_title(first),
            })
        }
        Direction::Backward => {
            if chapter > 1 {
                return Some(AdjacentChapter {
                    book_id,
                    chapter: chapter - 1,
                    title: book.chapter_title(chapter - 1),
                });
            }
            let previous = catalog.book(book_id.checked_sub(1)?)?;
            let last = previous.num_chapters;
            Some(AdjacentChapter {
                book_id: previous.id,
                chapter: last,
                title: previous.chapter_title(last),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::small_catalog;

    #[test]
    fn empty_and_blank_tokens_resolve_home() {
        let catalog = small_catalog();
        assert_eq!(resolve(&catalog, ""), NavState::Home);
        assert_eq!(resolve(&catalog, "   "), NavState::Home);
        assert_eq!(resolve(&catalog, "#"), NavState::Home);
    }

    #[test]
    fn volume_token_checks_id_range() {
        let catalog = small_catalog();
        assert_eq!(resolve(&catalog, "1"), NavState::VolumeList(1));
        assert_eq!(resolve(&catalog, "2"), NavState::VolumeList(2));
        assert_eq!(resolve(&catalog, "999"), NavState::Home);
        assert_eq!(resolve(&catalog, "0"), NavState::Home);
    }

    #[test]
    fn book_token_requires_known_book() {
        let catalog = small_catalog();
        assert_eq!(resolve(&catalog, "1:5"), NavState::BookChapters(5));
        assert_eq!(resolve(&catalog, "1:42"), NavState::Home);
    }

    #[test]
    fn chapter_token_requires_valid_chapter() {
        let catalog = small_catalog();
        assert_eq!(
            resolve(&catalog, "1:5:3"),
            NavState::Chapter { book_id: 5, chapter: 3 }
        );
        assert_eq!(resolve(&catalog, "1:5:4"), NavState::Home);
        assert_eq!(
            resolve(&catalog, "2:7:0"),
            NavState::Chapter { book_id: 7, chapter: 0 }
        );
        assert_eq!(resolve(&catalog, "2:7:1"), NavState::Home);
    }

    #[test]
    fn non_numeric_parts_resolve_home() {
        let catalog = small_catalog();
        assert_eq!(resolve(&catalog, "one"), NavState::Home);
        assert_eq!(resolve(&catalog, "1:beta"), NavState::Home);
        assert_eq!(resolve(&catalog, "1:5:three"), NavState::Home);
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = small_catalog();
        let first = resolve(&catalog, "1:5:2");
        let second = resolve(&catalog, "1:5:2");
        assert_eq!(first, second);
    }

    #[test]
    fn forward_steps_within_a_book() {
        let catalog = small_catalog();
        let step = adjacent_chapter(&catalog, 5, 1, Direction::Forward)
            .expect("chapter 2 should follow chapter 1");
        assert_eq!((step.book_id, step.chapter), (5, 2));
        assert_eq!(step.title, "Alpha 2");
    }

    #[test]
    fn forward_rolls_over_to_next_book() {
        let catalog = small_catalog();
        let step = adjacent_chapter(&catalog, 5, 3, Direction::Forward)
            .expect("book 6 should follow book 5");
        assert_eq!((step.book_id, step.chapter), (6, 1));
    }

    #[test]
    fn forward_into_chapterless_book_yields_zero() {
        let catalog = small_catalog();
        let step = adjacent_chapter(&catalog, 6, 2, Direction::Forward)
            .expect("book 7 should follow book 6");
        assert_eq!((step.book_id, step.chapter), (7, 0));
        assert_eq!(step.title, "Gamma");
    }

    #[test]
    fn forward_past_last_chapter_is_none() {
        let catalog = small_catalog();
        assert_eq!(adjacent_chapter(&catalog, 8, 4, Direction::Forward), None);
    }

    #[test]
    fn backward_steps_and_rolls_over() {
        let catalog = small_catalog();
        let step = adjacent_chapter(&catalog, 5, 3, Direction::Backward)
            .expect("chapter 2 should precede chapter 3");
        assert_eq!((step.book_id, step.chapter), (5, 2));
        let rollover = adjacent_chapter(&catalog, 6, 1, Direction::Backward)
            .expect("book 5 should precede book 6");
        assert_eq!((rollover.book_id, rollover.chapter), (5, 3));
    }

    #[test]
    fn backward_out_of_chapterless_book() {
        let catalog = small_catalog();
        let step = adjacent_chapter(&catalog, 7, 0, Direction::Backward)
            .expect("book 6 should precede book 7");
        assert_eq!((step.book_id, step.chapter), (6, 2));
    }

    #[test]
    fn backward_before_first_book_is_none() {
        let catalog = small_catalog();
        assert_eq!(adjacent_chapter(&catalog, 5, 1, Direction::Backward), None);
    }

    #[test]
    fn tokens_compose_prefix_forms() {
        assert_eq!(LocationToken::home().as_str(), "");
        assert_eq!(LocationToken::volume(2).as_str(), "2");
        assert_eq!(LocationToken::book(2, 7).as_str(), "2:7");
        assert_eq!(LocationToken::chapter(1, 5, 3).as_str(), "1:5:3");
    }
}
