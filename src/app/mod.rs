//! Application core: reducer state, messages, effects, and the headless
//! runtime that executes effects as tokio tasks.
//!
//! The runtime is the only place IO happens. Chapter fetches for the
//! three view regions run as independent tasks whose completions flow
//! back through one message channel; a failure in one region never
//! blocks the others. The marker overlay runs as its own cancellable
//! task so a newer navigation can abandon it mid-retry.

mod messages;
mod state;
mod update;
mod view;

pub use messages::Message;
pub use state::App;
pub use update::Effect;
pub use view::{ConsoleMap, TerminalSurface};

use crate::api::{ChapterRequest, ScriptureApi};
use crate::cache;
use crate::config::AppConfig;
use crate::map::{self, SharedMap};
use crate::model::{BookId, Catalog};
use crate::places;
use crate::render::{Region, Surface};
use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

pub type SharedSurface = Arc<Mutex<dyn Surface + Send>>;

struct Runtime {
    api: Arc<ScriptureApi>,
    surface: SharedSurface,
    map: SharedMap,
    config: AppConfig,
    tx: UnboundedSender<Message>,
}

impl Runtime {
    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::SetBreadcrumbs(crumbs) => {
                if let Ok(mut surface) = self.surface.lock() {
                    surface.set_breadcrumbs(&crumbs);
                }
            }
            Effect::Show { region, document } => {
                if let Ok(mut surface) = self.surface.lock() {
                    surface.show(region, &document);
                }
            }
            Effect::SetChapterNav { previous, next } => {
                if let Ok(mut surface) = self.surface.lock() {
                    surface.set_chapter_nav(previous.as_ref(), next.as_ref());
                }
            }
            Effect::FetchChapter {
                slot,
                book_id,
                chapter,
                request_id,
            } => self.spawn_chapter_fetch(slot, book_id, chapter, request_id),
            Effect::RunOverlay { places, cancel } => {
                tokio::spawn(map::overlay_with_retry(
                    Arc::clone(&self.map),
                    places,
                    self.config.max_zoom,
                    self.config.marker_retry_schedule(),
                    cancel,
                ));
            }
            Effect::ClearMarkers => {
                if let Ok(mut map) = self.map.lock() {
                    map.clear_markers();
                }
            }
            // Handled by the message loop.
            Effect::Shutdown => {}
        }
    }

    fn spawn_chapter_fetch(&self, slot: Region, book_id: BookId, chapter: u32, request_id: u64) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let use_cache = self.config.cache_chapters;
        tokio::spawn(async move {
            let request = ChapterRequest::default();
            let cached = use_cache
                .then(|| cache::load_chapter(book_id, chapter, &request))
                .flatten();
            let markup = match cached {
                Some(markup) => {
                    debug!(book_id, chapter, "Chapter served from cache");
                    markup
                }
                None => match api.fetch_chapter(book_id, chapter, &request).await {
                    Ok(markup) => {
                        if use_cache {
                            cache::save_chapter(book_id, chapter, &request, &markup);
                        }
                        markup
                    }
                    Err(err) => {
                        let _ = tx.send(Message::ChapterLoadFailed {
                            slot,
                            request_id,
                            error: format!("{err:#}"),
                        });
                        return;
                    }
                },
            };
            let places = places::extract_places(&markup);
            let _ = tx.send(Message::ChapterLoaded {
                slot,
                book_id,
                chapter,
                request_id,
                markup,
                places,
            });
        });
    }
}

/// Drive the reducer with location tokens until quit. Tokens come from
/// the initial argument and then stdin, one per line; `q`/`quit` or EOF
/// ends the session.
pub async fn run_app(
    catalog: Catalog,
    config: AppConfig,
    api: ScriptureApi,
    surface: SharedSurface,
    map: SharedMap,
    initial_token: String,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runtime = Runtime {
        api: Arc::new(api),
        surface,
        map,
        config,
        tx: tx.clone(),
    };
    let mut app = App::new(catalog);

    let _ = tx.send(Message::LocationChanged(initial_token));
    spawn_token_reader(tx);

    while let Some(message) = rx.recv().await {
        for effect in app.reduce(message) {
            if matches!(effect, Effect::Shutdown) {
                info!("Session ended");
                return Ok(());
            }
            runtime.run_effect(effect);
        }
    }
    Ok(())
}

fn spawn_token_reader(tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let token = line.trim().to_string();
                    if token == "q" || token == "quit" {
                        let _ = tx.send(Message::Quit);
                        break;
                    }
                    if tx.send(Message::LocationChanged(token)).is_err() {
                        break;
                    }
                }
                _ => {
                    let _ = tx.send(Message::Quit);
                    break;
                }
            }
        }
    });
}
