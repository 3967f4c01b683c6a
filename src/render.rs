//! Declarative view documents.
//!
//! Instead of string-building markup with embedded handlers, each view is
//! described as structured render instructions whose links carry
//! [`LocationToken`]s. A host surface (terminal here, DOM in a browser
//! embedding) turns the instructions into whatever it renders.

use crate::model::{Book, BookId, Catalog, Volume, VolumeId};
use crate::navigation::LocationToken;
use crate::places::Place;

pub const HOME_LABEL: &str = "The Scriptures";

/// One breadcrumb level; the deepest level has no target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub target: Option<LocationToken>,
}

/// Home > Volume > Book > Chapter, each level except the deepest
/// navigable. Prefix-valid: a chapter crumb requires a book, a book crumb
/// a volume.
pub fn breadcrumbs(volume: Option<&Volume>, book: Option<&Book>, chapter: Option<u32>) -> Vec<Crumb> {
    let mut crumbs = Vec::new();
    let Some(volume) = volume else {
        crumbs.push(Crumb {
            label: HOME_LABEL.to_string(),
            target: None,
        });
        return crumbs;
    };
    crumbs.push(Crumb {
        label: HOME_LABEL.to_string(),
        target: Some(LocationToken::home()),
    });
    let Some(book) = book else {
        crumbs.push(Crumb {
            label: volume.full_name.clone(),
            target: None,
        });
        return crumbs;
    };
    crumbs.push(Crumb {
        label: volume.full_name.clone(),
        target: Some(LocationToken::volume(volume.id)),
    });
    match chapter {
        Some(chapter) if chapter > 0 => {
            crumbs.push(Crumb {
                label: book.toc_name.clone(),
                target: Some(LocationToken::book(volume.id, book.id)),
            });
            crumbs.push(Crumb {
                label: chapter.to_string(),
                target: None,
            });
        }
        _ => {
            crumbs.push(Crumb {
                label: book.toc_name.clone(),
                target: None,
            });
        }
    }
    crumbs
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLink {
    pub book_id: BookId,
    pub label: String,
    pub target: LocationToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSection {
    pub volume_id: VolumeId,
    pub title: String,
    pub books: Vec<BookLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub chapter: u32,
    pub target: LocationToken,
}

/// Slide hint for the host's transition animation; purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    None,
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewDocument {
    /// Per-volume grids of book links; the whole corpus, or one volume.
    VolumeGrid { sections: Vec<VolumeSection> },
    /// Numbered chapter links for one book.
    ChapterGrid { title: String, chapters: Vec<ChapterLink> },
    /// Fetched chapter markup with its structured places.
    ChapterText {
        title: String,
        markup: String,
        places: Vec<Place>,
        transition: Transition,
    },
    Empty,
}

/// The home view, or a single volume's slice of it.
pub fn volume_grid(catalog: &Catalog, only: Option<VolumeId>) -> ViewDocument {
    let sections = catalog
        .volumes()
        .iter()
        .filter(|volume| only.is_none_or(|id| volume.id == id))
        .map(|volume| VolumeSection {
            volume_id: volume.id,
            title: volume.full_name.clone(),
            books: catalog
                .books_of(volume)
                .map(|book| BookLink {
                    book_id: book.id,
                    label: book.grid_name.clone(),
                    target: LocationToken::book(volume.id, book.id),
                })
                .collect(),
        })
        .collect();
    ViewDocument::VolumeGrid { sections }
}

/// The chapter grid for a book with numbered chapters.
pub fn chapter_grid(catalog: &Catalog, book: &Book) -> ViewDocument {
    let volume_id = catalog
        .volume_for_book(book)
        .map(|volume| volume.id)
        .unwrap_or(book.parent_book_id);
    ViewDocument::ChapterGrid {
        title: book.full_name.clone(),
        chapters: (1..=book.num_chapters)
            .map(|chapter| ChapterLink {
                chapter,
                target: LocationToken::chapter(volume_id, book.id, chapter),
            })
            .collect(),
    }
}

/// A previous/next chapter link with its tooltip title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub title: String,
    pub target: LocationToken,
}

/// View regions of the host surface. `Previous` and `Next` hold the
/// prefetched adjacent chapters for instant transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Current,
    Previous,
    Next,
}

/// The rendering seam standing in for the DOM.
pub trait Surface {
    fn set_breadcrumbs(&mut self, crumbs: &[Crumb]);
    fn show(&mut self, region: Region, document: &ViewDocument);
    fn set_chapter_nav(&mut self, previous: Option<&NavLink>, next: Option<&NavLink>);
}
