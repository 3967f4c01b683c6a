//! Reference data for the scripture corpus.
//!
//! Volumes and books are fetched once at startup and frozen into a
//! [`Catalog`] snapshot. Everything downstream (navigation, rendering)
//! borrows the snapshot; it is replaced only by a full reload.

use serde::Deserialize;
use std::collections::BTreeMap;

pub type VolumeId = u32;
pub type BookId = u32;

/// Top-level grouping of books (e.g. a testament).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: VolumeId,
    pub full_name: String,
    pub min_book_id: BookId,
    pub max_book_id: BookId,
    /// Derived after load; ascending id order.
    #[serde(skip)]
    pub books: Vec<BookId>,
}

/// A named work within a volume. `num_chapters == 0` marks a
/// single-chapter work whose only addressable chapter is `0`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub parent_book_id: VolumeId,
    pub full_name: String,
    pub grid_name: String,
    pub toc_name: String,
    pub num_chapters: u32,
}

impl Book {
    /// Display title for a chapter of this book, used for link tooltips.
    pub fn chapter_title(&self, chapter: u32) -> String {
        if chapter > 0 {
            format!("{} {}", self.toc_name, chapter)
        } else {
            self.toc_name.clone()
        }
    }
}

/// Immutable session snapshot of the corpus structure.
#[derive(Debug, Clone)]
pub struct Catalog {
    volumes: Vec<Volume>,
    books: BTreeMap<BookId, Book>,
}

impl Catalog {
    /// Assemble the snapshot from the two fetched collections, deriving
    /// each volume's book list by scanning `[min_book_id, max_book_id]`
    /// inclusive.
    pub fn build(mut volumes: Vec<Volume>, books: BTreeMap<BookId, Book>) -> Self {
        volumes.sort_by_key(|volume| volume.id);
        for volume in &mut volumes {
            volume.books = (volume.min_book_id..=volume.max_book_id)
                .filter(|id| books.contains_key(id))
                .collect();
        }
        Catalog { volumes, books }
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn volume(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.iter().find(|volume| volume.id == id)
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn volume_for_book(&self, book: &Book) -> Option<&Volume> {
        self.volume(book.parent_book_id)
    }

    pub fn books_of<'a>(&'a self, volume: &'a Volume) -> impl Iterator<Item = &'a Book> {
        volume.books.iter().filter_map(|id| self.books.get(id))
    }

    /// Inclusive id range of known volumes, or `None` for an empty corpus.
    pub fn volume_id_range(&self) -> Option<(VolumeId, VolumeId)> {
        match (self.volumes.first(), self.volumes.last()) {
            (Some(first), Some(last)) => Some((first.id, last.id)),
            _ => None,
        }
    }

    /// A chapter is addressable iff `0 < chapter <= num_chapters`, or it
    /// is `0` for a book with no numbered chapters.
    pub fn chapter_valid(&self, book_id: BookId, chapter: u32) -> bool {
        let Some(book) = self.book(book_id) else {
            return false;
        };
        if book.num_chapters == 0 {
            chapter == 0
        } else {
            chapter >= 1 && chapter <= book.num_chapters
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::small_catalog;

    #[test]
    fn derives_volume_book_lists_in_id_order() {
        let catalog = small_catalog();
        let first = catalog.volume(1).expect("volume 1 should exist");
        assert_eq!(first.books, vec![5, 6]);
        let second = catalog.volume(2).expect("volume 2 should exist");
        assert_eq!(second.books, vec![7, 8]);
    }

    #[test]
    fn chapter_validity_truth_table() {
        let catalog = small_catalog();
        // Numbered book: 1..=num_chapters, zero excluded.
        assert!(!catalog.chapter_valid(5, 0));
        assert!(catalog.chapter_valid(5, 1));
        assert!(catalog.chapter_valid(5, 3));
        assert!(!catalog.chapter_valid(5, 4));
        // Chapterless book: only zero.
        assert!(catalog.chapter_valid(7, 0));
        assert!(!catalog.chapter_valid(7, 1));
        // Unknown book.
        assert!(!catalog.chapter_valid(99, 1));
    }

    #[test]
    fn chapter_title_omits_zero() {
        let catalog = small_catalog();
        let alpha = catalog.book(5).expect("book 5 should exist");
        assert_eq!(alpha.chapter_title(2), "Alpha 2");
        let gamma = catalog.book(7).expect("book 7 should exist");
        assert_eq!(gamma.chapter_title(0), "Gamma");
    }

    #[test]
    fn volume_id_range_spans_first_to_last() {
        let catalog = small_catalog();
        assert_eq!(catalog.volume_id_range(), Some((1, 2)));
    }
}
