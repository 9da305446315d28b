// Dialog content loader: inline text is fetched and wrapped, framed documents
// are handed to the page untouched

pub mod fetch;

pub use fetch::{Fetch, HttpFetcher};

use crate::config::ContentConfig;
use crate::state::dialog::{Activation, ContentKind, DialogContent};

pub struct ContentLoader<F> {
    fetcher: F,
    text_style: String,
    error_style: String,
}

impl<F: Fetch> ContentLoader<F> {
    pub fn new(fetcher: F, config: &ContentConfig) -> Self {
        Self {
            fetcher,
            text_style: config.text_style.clone(),
            error_style: config.error_style.clone(),
        }
    }

    /// Content to mount immediately. Framed documents are already final.
    pub fn placeholder(&self, activation: &Activation) -> DialogContent {
        match activation.kind {
            ContentKind::InlineText => DialogContent::Loading,
            ContentKind::FramedDocument => DialogContent::Frame {
                src: activation.locator.clone(),
            },
        }
    }

    /// Whether the content still needs [`ContentLoader::load`]
    pub fn needs_fetch(&self, activation: &Activation) -> bool {
        activation.kind == ContentKind::InlineText
    }

    /// Final content for an activation. A failed fetch is rendered as the
    /// error state, never returned as an error.
    pub async fn load(&self, activation: &Activation) -> DialogContent {
        if !self.needs_fetch(activation) {
            return self.placeholder(activation);
        }

        match self.fetcher.fetch_text(&activation.locator).await {
            Ok(text) => DialogContent::Text {
                text,
                style: self.text_style.clone(),
            },
            Err(e) => {
                log::warn!("[Content] Failed to load {}: {}", activation.locator, e);
                DialogContent::Error {
                    message: format!("Could not load {}: {}", activation.title, e),
                    style: self.error_style.clone(),
                }
            }
        }
    }
}
