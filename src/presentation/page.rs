//! Id-addressed edits applied to the host page with a streaming rewriter.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use lol_html::{RewriteStrSettings, element, html_content::ContentType, rewrite_str};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
    #[error("failed to rewrite page markup: {message}")]
    Rewrite { message: String },
}

impl PageError {
    pub fn selector(selector: &str, err: impl Display) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            message: err.to_string(),
        }
    }

    pub fn rewrite(err: impl Display) -> Self {
        Self::Rewrite {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ElementEdit {
    inner_html: Option<String>,
    text: Option<String>,
    attributes: Vec<(String, String)>,
}

/// Pending mutations keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct PageEdits {
    elements: BTreeMap<String, ElementEdit>,
}

impl PageEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_inner_html(&mut self, id: &str, html: impl Into<String>) -> &mut Self {
        let edit = self.entry(id);
        edit.inner_html = Some(html.into());
        edit.text = None;
        self
    }

    /// Replace the element's contents with escaped text.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> &mut Self {
        let edit = self.entry(id);
        edit.text = Some(text.into());
        edit.inner_html = None;
        self
    }

    pub fn set_attribute(
        &mut self,
        id: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        let value = value.into();
        let edit = self.entry(id);
        match edit.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, current)) => *current = value,
            None => edit.attributes.push((name, value)),
        }
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    fn entry(&mut self, id: &str) -> &mut ElementEdit {
        self.elements.entry(id.to_string()).or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedPage {
    pub html: String,
    /// Ids that had edits but no matching element.
    pub missing: Vec<String>,
}

/// Apply `edits` to the first element carrying each id, as `getElementById` would.
pub fn apply_edits(page: &str, edits: &PageEdits) -> Result<EditedPage, PageError> {
    let applied = RefCell::new(BTreeSet::new());

    let html = rewrite_str(
        page,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[id]", |el| {
                let Some(id) = el.get_attribute("id") else {
                    return Ok(());
                };
                let Some(edit) = edits.elements.get(&id) else {
                    return Ok(());
                };
                if !applied.borrow_mut().insert(id) {
                    return Ok(());
                }

                for (name, value) in &edit.attributes {
                    el.set_attribute(name, value)?;
                }
                if let Some(html) = edit.inner_html.as_deref() {
                    el.set_inner_content(html, ContentType::Html);
                } else if let Some(text) = edit.text.as_deref() {
                    el.set_inner_content(text, ContentType::Text);
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(PageError::rewrite)?;

    let applied = applied.into_inner();
    let missing = edits
        .ids()
        .filter(|id| !applied.contains(*id))
        .map(str::to_string)
        .collect();

    Ok(EditedPage { html, missing })
}

/// Ids of every element plus the `href` of every in-page anchor, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutline {
    pub ids: BTreeSet<String>,
    pub fragment_links: Vec<String>,
    pub has_head: bool,
}

pub fn outline(page: &str) -> Result<PageOutline, PageError> {
    let outline = RefCell::new(PageOutline::default());

    rewrite_str(
        page,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("[id]", |el| {
                    if let Some(id) = el.get_attribute("id") {
                        outline.borrow_mut().ids.insert(id);
                    }
                    Ok(())
                }),
                element!(r##"a[href^="#"]"##, |el| {
                    if let Some(href) = el.get_attribute("href") {
                        outline.borrow_mut().fragment_links.push(href);
                    }
                    Ok(())
                }),
                element!("head", |_el| {
                    outline.borrow_mut().has_head = true;
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(PageError::rewrite)?;

    Ok(outline.into_inner())
}

/// Set `attributes` on every in-page anchor whose fragment is in `targets`,
/// and append `head_html` to the document head when given.
pub fn mark_fragment_links(
    page: &str,
    targets: &BTreeSet<String>,
    attributes: &[(&str, &str)],
    head_html: Option<&str>,
) -> Result<String, PageError> {
    rewrite_str(
        page,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(r##"a[href^="#"]"##, |el| {
                    let Some(href) = el.get_attribute("href") else {
                        return Ok(());
                    };
                    if href.strip_prefix('#').is_some_and(|id| targets.contains(id)) {
                        for (name, value) in attributes {
                            el.set_attribute(name, value)?;
                        }
                    }
                    Ok(())
                }),
                element!("head", |el| {
                    if let Some(html) = head_html {
                        el.append(html, ContentType::Html);
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(PageError::rewrite)
}
