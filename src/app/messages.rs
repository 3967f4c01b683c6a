use crate::model::BookId;
use crate::places::Place;
use crate::render::Region;

/// Messages consumed by the reducer. Location changes arrive from the
/// host's addressable-location mechanism; the chapter messages are the
/// completions of region fetches issued by earlier effects.
#[derive(Debug, Clone)]
pub enum Message {
    LocationChanged(String),
    ChapterLoaded {
        slot: Region,
        book_id: BookId,
        chapter: u32,
        request_id: u64,
        markup: String,
        places: Vec<Place>,
    },
    ChapterLoadFailed {
        slot: Region,
        request_id: u64,
        error: String,
    },
    Quit,
}
