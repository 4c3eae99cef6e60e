//! Smooth scrolling for in-page navigation anchors.

use std::collections::BTreeSet;

use tracing::debug;

use crate::presentation::page::{PageError, mark_fragment_links, outline};

pub const SMOOTH_SCROLL_STYLE: &str =
    r#"<style data-vitae="smooth-scroll">html { scroll-behavior: smooth; }</style>"#;

const SCROLL_ATTRIBUTES: [(&str, &str); 2] =
    [("data-scroll", "smooth"), ("data-scroll-block", "start")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub html: String,
    pub marked: usize,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothScroll;

impl SmoothScroll {
    /// Mark every `#fragment` anchor whose target exists; a bare `#` has no target.
    pub fn apply(&self, page: &str) -> Result<ScrollOutcome, PageError> {
        let outline = outline(page)?;

        let mut targets = BTreeSet::new();
        let mut marked = 0;
        let mut unresolved = Vec::new();
        for href in &outline.fragment_links {
            let id = href.strip_prefix('#').unwrap_or(href);
            if !id.is_empty() && outline.ids.contains(id) {
                targets.insert(id.to_string());
                marked += 1;
            } else {
                debug!(href = %href, "in-page link has no target");
                unresolved.push(href.clone());
            }
        }

        if targets.is_empty() {
            return Ok(ScrollOutcome {
                html: page.to_string(),
                marked,
                unresolved,
            });
        }

        let head = outline.has_head.then_some(SMOOTH_SCROLL_STYLE);
        let html = mark_fragment_links(page, &targets, &SCROLL_ATTRIBUTES, head)?;

        Ok(ScrollOutcome {
            html,
            marked,
            unresolved,
        })
    }
}
