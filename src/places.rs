//! Extraction of geocoded place annotations from chapter markup.
//!
//! The scripture server embeds each place as an eleven-argument
//! `showLocation(...)` literal inside the chapter markup. Only the place
//! name, latitude, longitude, and the trailing flag/region code are
//! meaningful here; the rest are viewer parameters this client ignores.
//! Places are extracted once, when the markup arrives, and carried as
//! structured data next to it.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACE_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"showLocation\((.*?),'(.*?)',(.*?),(.*?),(.*?),(.*?),(.*?),(.*?),(.*?),(.*?),(.*?)\)",
    )
    .unwrap()
});

/// A named geographic point referenced by a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Scan chapter markup for place literals. Malformed literals are
/// skipped; this never fails.
pub fn extract_places(markup: &str) -> Vec<Place> {
    PLACE_LITERAL
        .captures_iter(markup)
        .filter_map(|captures| {
            let latitude: f64 = captures[3].trim().parse().ok()?;
            let longitude: f64 = captures[4].trim().parse().ok()?;
            let mut name = captures[2].to_string();
            if let Some(flag) = strip_quotes(captures[11].trim()) {
                if !flag.is_empty() {
                    name.push(' ');
                    name.push_str(flag);
                }
            }
            Some(Place { name, latitude, longitude })
        })
        .collect()
}

/// The flag argument arrives quoted (`'...'`); anything else is noise.
fn strip_quotes(raw: &str) -> Option<&str> {
    raw.strip_prefix('\'')?.strip_suffix('\'')
}
