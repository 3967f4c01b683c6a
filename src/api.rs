//! HTTP client for the scripture metadata and content endpoints.
//!
//! The metadata endpoints return JSON (a volume array and a book map keyed
//! by id); the content endpoint returns chapter markup as raw text. URLs
//! and the request timeout come from configuration.

use crate::config::AppConfig;
use crate::model::{Book, BookId, Volume};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::time::Duration;

pub struct ScriptureApi {
    client: reqwest::Client,
    volumes_url: String,
    books_url: String,
    chapter_url: String,
}

/// Optional content-request parameters: a verse range narrows the markup,
/// `jst` selects the alternate translation.
#[derive(Debug, Clone, Default)]
pub struct ChapterRequest {
    pub verses: Option<String>,
    pub jst: bool,
}

impl ScriptureApi {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build the HTTP client")?;
        Ok(ScriptureApi {
            client,
            volumes_url: config.volumes_url.clone(),
            books_url: config.books_url.clone(),
            chapter_url: config.chapter_url.clone(),
        })
    }

    pub async fn fetch_volumes(&self) -> Result<Vec<Volume>> {
        self.client
            .get(&self.volumes_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context("Volume list request failed")?
            .json()
            .await
            .context("Volume list was not valid JSON")
    }

    pub async fn fetch_books(&self) -> Result<BTreeMap<BookId, Book>> {
        self.client
            .get(&self.books_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context("Book list request failed")?
            .json()
            .await
            .context("Book list was not valid JSON")
    }

    /// Fetch one chapter's markup. Not JSON; returned verbatim.
    pub async fn fetch_chapter(
        &self,
        book_id: BookId,
        chapter: u32,
        request: &ChapterRequest,
    ) -> Result<String> {
        let url = self.chapter_query(book_id, chapter, request);
        self.client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Chapter request failed for book {book_id} chapter {chapter}"))?
            .text()
            .await
            .context("Chapter body could not be read")
    }

    fn chapter_query(&self, book_id: BookId, chapter: u32, request: &ChapterRequest) -> String {
        let mut url = format!("{}?book={book_id}&chap={chapter}", self.chapter_url);
        if let Some(verses) = &request.verses {
            url.push_str("&verses=");
            url.push_str(verses);
        }
        if request.jst {
            url.push_str("&jst=JST");
        }
        url
    }
}
