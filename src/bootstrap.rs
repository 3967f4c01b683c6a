//! Two-phase startup: fetch the book and volume collections concurrently,
//! then freeze them into a [`Catalog`].
//!
//! The two fetches are independent and may complete in either order; the
//! join makes the "both must arrive" contract explicit, and the per-volume
//! book index is derived exactly once, after the join. Either fetch
//! failing is fatal to initialization — there is no retry on this path.

use crate::api::ScriptureApi;
use crate::model::{Book, BookId, Catalog, Volume};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::info;

/// Seam over the metadata endpoints so the join can be exercised under
/// controlled completion orderings.
pub trait MetadataSource {
    fn volumes(&self) -> impl Future<Output = Result<Vec<Volume>>> + Send;
    fn books(&self) -> impl Future<Output = Result<BTreeMap<BookId, Book>>> + Send;
}

impl MetadataSource for ScriptureApi {
    fn volumes(&self) -> impl Future<Output = Result<Vec<Volume>>> + Send {
        self.fetch_volumes()
    }

    fn books(&self) -> impl Future<Output = Result<BTreeMap<BookId, Book>>> + Send {
        self.fetch_books()
    }
}

pub async fn load_catalog<S: MetadataSource>(source: &S) -> Result<Catalog> {
    let (volumes, books) = tokio::try_join!(source.volumes(), source.books())
        .context("Catalog bootstrap failed")?;
    let catalog = Catalog::build(volumes, books);
    info!(
        volumes = catalog.volumes().len(),
        "Catalog loaded and book index derived"
    );
    Ok(catalog)
}
