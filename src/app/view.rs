//! Terminal implementations of the rendering seams.
//!
//! The browser embedding would back [`Surface`] with the DOM and
//! [`MapSurface`] with the map widget; the CLI backs them with stdout so
//! the whole navigation core runs headless.

use crate::map::{LatLngBounds, MapSurface, Marker};
use crate::render::{Crumb, NavLink, Region, Surface, ViewDocument};

/// Renders view documents as plain text.
#[derive(Default)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn set_breadcrumbs(&mut self, crumbs: &[Crumb]) {
        let trail = crumbs
            .iter()
            .map(|crumb| match &crumb.target {
                Some(target) => format!("{} [{}]", crumb.label, target),
                None => crumb.label.clone(),
            })
            .collect::<Vec<_>>()
            .join(" > ");
        println!("\n{trail}");
    }

    fn show(&mut self, region: Region, document: &ViewDocument) {
        match document {
            ViewDocument::VolumeGrid { sections } => {
                for section in sections {
                    println!("\n== {} ==", section.title);
                    for book in &section.books {
                        println!("  {}  [{}]", book.label, book.target);
                    }
                }
            }
            ViewDocument::ChapterGrid { title, chapters } => {
                println!("\n== {title} ==");
                let numbers = chapters
                    .iter()
                    .map(|link| link.chapter.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("  chapters: {numbers}");
            }
            ViewDocument::ChapterText { title, markup, places, .. } => {
                // Prefetched regions stay quiet; only the current chapter
                // is printed.
                if !matches!(region, Region::Current) {
                    return;
                }
                println!("\n== {title} ==");
                match html2text::from_read(markup.as_bytes(), 80) {
                    Ok(text) => println!("{text}"),
                    Err(_) => println!("{markup}"),
                }
                if !places.is_empty() {
                    println!("  ({} mapped places)", places.len());
                }
            }
            ViewDocument::Empty => {}
        }
    }

    fn set_chapter_nav(&mut self, previous: Option<&NavLink>, next: Option<&NavLink>) {
        if previous.is_none() && next.is_none() {
            return;
        }
        let describe = |link: Option<&NavLink>| {
            link.map(|l| format!("{} [{}]", l.title, l.target))
                .unwrap_or_else(|| "-".to_string())
        };
        println!("  prev: {}   next: {}", describe(previous), describe(next));
    }
}

/// A map widget stand-in that prints marker activity and tracks zoom.
pub struct ConsoleMap {
    zoom: u8,
    markers: Vec<Marker>,
}

impl ConsoleMap {
    pub fn new(initial_zoom: u8) -> Self {
        ConsoleMap {
            zoom: initial_zoom,
            markers: Vec::new(),
        }
    }
}

impl MapSurface for ConsoleMap {
    fn is_ready(&self) -> bool {
        true
    }

    fn add_marker(&mut self, marker: Marker) {
        println!(
            "  * {} ({:.4}, {:.4})",
            marker.label, marker.latitude, marker.longitude
        );
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        if !self.markers.is_empty() {
            tracing::debug!(cleared = self.markers.len(), "Cleared map markers");
        }
        self.markers.clear();
    }

    fn fit_bounds(&mut self, _bounds: &LatLngBounds) {}

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
    }
}
