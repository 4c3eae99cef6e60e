//! Blog index: fetch the post records, order them newest-first and render one block per post.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::source::{FetchError, ResourceSource};
use crate::domain::posts::{LinkTarget, PostRecord, sort_descending_by_date};
use crate::infra::telemetry::{POSTS_RENDERED_TOTAL, SECTION_FALLBACK_TOTAL};
use crate::presentation::dom::Container;
use crate::presentation::views::{
    BlogPostTemplate, BlogPostView, TemplateRenderError, render_section_notice, render_template,
};

pub const DEFAULT_BLOG_INDEX_PATH: &str = "blog_index.json";
pub const DEFAULT_BLOG_EMPTY_MESSAGE: &str = "Blog posts coming soon";

#[derive(Debug, Error)]
pub enum BlogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("blog index `{path}` is malformed: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Template(#[from] TemplateRenderError),
}

/// What ended up in the blog container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogOutcome {
    Rendered { posts: usize },
    Empty,
    Unavailable,
}

#[derive(Clone)]
pub struct BlogRenderer {
    source: Arc<dyn ResourceSource>,
    index_path: String,
    empty_message: String,
}

impl BlogRenderer {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            source,
            index_path: DEFAULT_BLOG_INDEX_PATH.to_string(),
            empty_message: DEFAULT_BLOG_EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn with_index_path(mut self, path: impl Into<String>) -> Self {
        self.index_path = path.into();
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    pub async fn fetch_posts(&self) -> Result<Vec<PostRecord>, BlogError> {
        let body = self.source.fetch_text(&self.index_path).await?;
        serde_json::from_str(&body).map_err(|source| BlogError::Parse {
            path: self.index_path.clone(),
            source,
        })
    }

    /// Fetch and render the index, falling back to the empty state on any failure.
    pub async fn load(&self, container: &mut dyn Container) -> BlogOutcome {
        let posts = match self.fetch_posts().await {
            Ok(posts) => posts,
            Err(err) => {
                warn!(
                    error = %err,
                    source = %self.source.location(),
                    path = %self.index_path,
                    "blog index unavailable; showing placeholder"
                );
                counter!(SECTION_FALLBACK_TOTAL, "section" => "blog").increment(1);
                self.render_empty_state(container);
                return BlogOutcome::Unavailable;
            }
        };

        match self.render(posts, container) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "failed to render blog posts; showing placeholder");
                counter!(SECTION_FALLBACK_TOTAL, "section" => "blog").increment(1);
                self.render_empty_state(container);
                BlogOutcome::Unavailable
            }
        }
    }

    /// Render `posts` newest-first into `container`, replacing what was there.
    pub fn render(
        &self,
        posts: Vec<PostRecord>,
        container: &mut dyn Container,
    ) -> Result<BlogOutcome, BlogError> {
        if posts.is_empty() {
            self.render_empty_state(container);
            return Ok(BlogOutcome::Empty);
        }

        let sorted = sort_descending_by_date(posts);
        let mut blocks = Vec::with_capacity(sorted.len());
        for record in &sorted {
            if let LinkTarget::Rejected(link) = record.link_target() {
                warn!(title = %record.title, link = %link, "dropping unsafe post link");
            }
            if record.published_on().is_none() {
                debug!(title = %record.title, date = %record.date, "post date does not parse");
            }
            let view = BlogPostView::from_record(record);
            blocks.push(render_template(BlogPostTemplate { post: &view })?);
        }

        container.replace_html(String::new());
        for block in &blocks {
            container.append_html(block);
        }

        let count = blocks.len();
        counter!(POSTS_RENDERED_TOTAL).increment(count as u64);
        info!(posts = count, "rendered blog index");
        Ok(BlogOutcome::Rendered { posts: count })
    }

    pub fn render_empty_state(&self, container: &mut dyn Container) {
        container.replace_html(render_section_notice(&self.empty_message));
    }
}
