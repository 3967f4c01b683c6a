//! Marker overlay over an abstract map surface.
//!
//! The real map widget lives outside this crate; it is consumed through
//! the [`MapSurface`] trait. The overlay clears and rebuilds the full
//! marker set on every chapter transition, fits the viewport over all
//! markers, and clamps zoom so the map never lands closer than the
//! configured ceiling. When the widget has not finished loading, the
//! overlay retries on a doubling schedule and then gives up silently.

use crate::places::Place;
use crate::retry::{CancellationToken, RetrySchedule};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Bounding viewport accumulated over marker positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLngBounds {
    extent: Option<Extent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl LatLngBounds {
    pub fn extend(&mut self, latitude: f64, longitude: f64) {
        self.extent = Some(match self.extent {
            None => Extent {
                south: latitude,
                north: latitude,
                west: longitude,
                east: longitude,
            },
            Some(extent) => Extent {
                south: extent.south.min(latitude),
                north: extent.north.max(latitude),
                west: extent.west.min(longitude),
                east: extent.east.max(longitude),
            },
        });
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.extent.is_some_and(|extent| {
            (extent.south..=extent.north).contains(&latitude)
                && (extent.west..=extent.east).contains(&longitude)
        })
    }
}

/// The map widget seam. `is_ready` reports whether the underlying
/// library has finished loading.
pub trait MapSurface {
    fn is_ready(&self) -> bool;
    fn add_marker(&mut self, marker: Marker);
    fn clear_markers(&mut self);
    fn fit_bounds(&mut self, bounds: &LatLngBounds);
    fn zoom(&self) -> u8;
    fn set_zoom(&mut self, zoom: u8);
}

/// Rebuild the marker set for one chapter and refit the viewport. With no
/// places the markers are cleared and the viewport is left untouched.
pub fn place_markers<M: MapSurface + ?Sized>(map: &mut M, places: &[Place], max_zoom: u8) {
    map.clear_markers();
    if places.is_empty() {
        return;
    }
    let mut bounds = LatLngBounds::default();
    for place in places {
        map.add_marker(Marker {
            label: place.name.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
        });
        bounds.extend(place.latitude, place.longitude);
    }
    map.fit_bounds(&bounds);
    if map.zoom() > max_zoom {
        map.set_zoom(max_zoom);
    }
}

pub type SharedMap = Arc<Mutex<dyn MapSurface + Send>>;

/// Drive [`place_markers`] against a surface that may still be loading.
/// Each attempt that finds the surface unready sleeps the next delay in
/// the schedule; exhausting the schedule abandons the overlay without
/// surfacing an error.
pub async fn overlay_with_retry(
    map: SharedMap,
    places: Vec<Place>,
    max_zoom: u8,
    schedule: RetrySchedule,
    cancel: CancellationToken,
) {
    let mut delays = schedule.delays();
    loop {
        if cancel.is_cancelled() {
            debug!("Marker overlay cancelled by a newer navigation");
            return;
        }
        {
            let mut surface = match map.lock() {
                Ok(surface) => surface,
                Err(_) => return,
            };
            if surface.is_ready() {
                place_markers(&mut *surface, &places, max_zoom);
                debug!(markers = places.len(), "Placed chapter markers");
                return;
            }
        }
        match delays.next() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => {
                debug!("Map surface never became ready; abandoning overlay");
                return;
            }
        }
    }
}
