//! Markup containers: the "manipulate an element's contents" capability.

use std::cell::Cell;

use lol_html::{RewriteStrSettings, Selector, element, rewrite_str};

use super::page::PageError;

/// Something whose inner markup can be replaced or extended.
pub trait Container {
    /// Replace everything inside the container.
    fn replace_html(&mut self, html: String);

    fn append_html(&mut self, html: &str);

    fn html(&self) -> &str;
}

/// In-memory container whose contents are later written into the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupBuffer {
    html: String,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl Container for MarkupBuffer {
    fn replace_html(&mut self, html: String) {
        self.html = html;
    }

    fn append_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    fn html(&self) -> &str {
        &self.html
    }
}

/// Count the elements of `html` matching a CSS selector.
pub fn count_elements(html: &str, selector: &str) -> Result<usize, PageError> {
    selector
        .parse::<Selector>()
        .map_err(|err| PageError::selector(selector, err))?;

    let count = Cell::new(0usize);
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |_el| {
                count.set(count.get() + 1);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(PageError::rewrite)?;

    Ok(count.get())
}
