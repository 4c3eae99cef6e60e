//! Publications list: a pre-rendered fragment authored by the site owner.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use crate::application::source::{FetchError, ResourceSource};
use crate::infra::telemetry::SECTION_FALLBACK_TOTAL;
use crate::presentation::dom::Container;
use crate::presentation::views::render_section_notice;

pub const DEFAULT_PUBLICATIONS_PATH: &str = "publications_generated.html";
pub const DEFAULT_PUBLICATIONS_UNAVAILABLE_MESSAGE: &str = "Publications are unavailable right now";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationsOutcome {
    Loaded { bytes: usize },
    Unavailable,
}

#[derive(Clone)]
pub struct PublicationsLoader {
    source: Arc<dyn ResourceSource>,
    path: String,
    unavailable_message: String,
}

impl PublicationsLoader {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            source,
            path: DEFAULT_PUBLICATIONS_PATH.to_string(),
            unavailable_message: DEFAULT_PUBLICATIONS_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_unavailable_message(mut self, message: impl Into<String>) -> Self {
        self.unavailable_message = message.into();
        self
    }

    pub async fn fetch(&self) -> Result<String, FetchError> {
        self.source.fetch_text(&self.path).await
    }

    /// Inject the fragment verbatim, or a placeholder when it cannot be fetched.
    pub async fn load(&self, container: &mut dyn Container) -> PublicationsOutcome {
        match self.fetch().await {
            Ok(fragment) => {
                let bytes = fragment.len();
                container.replace_html(fragment);
                info!(bytes, path = %self.path, "loaded publications fragment");
                PublicationsOutcome::Loaded { bytes }
            }
            Err(err) => {
                warn!(
                    error = %err,
                    source = %self.source.location(),
                    path = %self.path,
                    "publications fragment unavailable; showing placeholder"
                );
                counter!(SECTION_FALLBACK_TOTAL, "section" => "publications").increment(1);
                self.render_unavailable(container);
                PublicationsOutcome::Unavailable
            }
        }
    }

    pub fn render_unavailable(&self, container: &mut dyn Container) {
        container.replace_html(render_section_notice(&self.unavailable_message));
    }
}
