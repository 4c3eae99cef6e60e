use askama::{Error as AskamaError, Template};
use thiserror::Error;
use tracing::warn;

use crate::domain::posts::{ISO_DATE_FORMAT, PostRecord};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }

    pub fn origin(&self) -> &'static str {
        self.source
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

/// Display data for one blog post; every field is escaped by the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogPostView {
    pub title: String,
    pub published: String,
    pub iso_date: Option<String>,
    pub excerpt: String,
    pub href: Option<String>,
    pub tags: Vec<String>,
}

impl BlogPostView {
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            title: record.title.clone(),
            published: record.display_date(),
            iso_date: record
                .published_on()
                .and_then(|date| date.format(ISO_DATE_FORMAT).ok()),
            excerpt: record.excerpt.clone(),
            href: record.link_target().href().map(str::to_string),
            tags: record.tags().to_vec(),
        }
    }
}

#[derive(Template)]
#[template(path = "sections/blog_post.html")]
pub struct BlogPostTemplate<'a> {
    pub post: &'a BlogPostView,
}

/// Informational placeholder shown in place of a section's content.
#[derive(Template)]
#[template(path = "sections/notice.html")]
pub struct SectionNoticeTemplate<'a> {
    pub message: &'a str,
}

/// Render a section placeholder, degrading to hand-escaped markup if the template fails.
pub fn render_section_notice(message: &str) -> String {
    render_template(SectionNoticeTemplate { message }).unwrap_or_else(|err| {
        warn!(error = %err, origin = err.origin(), "notice template failed");
        format!("<p class=\"section-intro\">{}</p>", escape_text(message))
    })
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
