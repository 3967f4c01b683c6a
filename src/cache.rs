//! Best-effort cache for fetched chapter markup.
//!
//! Entries live under `.cache/` named by a hash of the request parameters,
//! so repeated visits to a chapter skip the network. All errors are
//! ignored; the cache must never block or fail the navigation path.

use crate::api::ChapterRequest;
use crate::model::BookId;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_DIR: &str = ".cache";

fn chapter_path(book_id: BookId, chapter: u32, request: &ChapterRequest) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(book_id.to_le_bytes());
    hasher.update(chapter.to_le_bytes());
    if let Some(verses) = &request.verses {
        hasher.update(verses.as_bytes());
    }
    hasher.update([u8::from(request.jst)]);
    let hash = format!("{:x}", hasher.finalize());
    Path::new(CACHE_DIR).join("chapters").join(format!("{hash}.html"))
}

/// Load cached markup for a chapter request, if present.
pub fn load_chapter(book_id: BookId, chapter: u32, request: &ChapterRequest) -> Option<String> {
    fs::read_to_string(chapter_path(book_id, chapter, request)).ok()
}

/// Persist fetched markup. Errors are ignored to keep navigation responsive.
pub fn save_chapter(book_id: BookId, chapter: u32, request: &ChapterRequest, markup: &str) {
    let path = chapter_path(book_id, chapter, request);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = fs::write(path, markup);
}
