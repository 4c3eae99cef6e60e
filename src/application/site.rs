//! Page assembly entry point: loads every dynamic section and writes it into the host page.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::blog::{BlogOutcome, BlogRenderer};
use crate::application::contact::ContactWiring;
use crate::application::navigation::SmoothScroll;
use crate::application::publications::{PublicationsLoader, PublicationsOutcome};
use crate::presentation::dom::MarkupBuffer;
use crate::presentation::page::{PageEdits, PageError, apply_edits};

pub const DEFAULT_PUBLICATIONS_CONTAINER_ID: &str = "publications-list";
pub const DEFAULT_BLOG_CONTAINER_ID: &str = "blog-list";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Element ids of the page's dynamic sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionIds {
    pub publications: String,
    pub blog: String,
}

impl Default for SectionIds {
    fn default() -> Self {
        Self {
            publications: DEFAULT_PUBLICATIONS_CONTAINER_ID.to_string(),
            blog: DEFAULT_BLOG_CONTAINER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPage {
    pub html: String,
    pub blog: BlogOutcome,
    pub publications: PublicationsOutcome,
    /// Ids that were supposed to receive content but are absent from the page.
    pub missing_elements: Vec<String>,
    pub smooth_scroll_links: usize,
}

#[derive(Clone)]
pub struct SiteAssembler {
    blog: BlogRenderer,
    publications: PublicationsLoader,
    contact: Option<ContactWiring>,
    sections: SectionIds,
    scroll: SmoothScroll,
}

impl SiteAssembler {
    pub fn new(blog: BlogRenderer, publications: PublicationsLoader) -> Self {
        Self {
            blog,
            publications,
            contact: None,
            sections: SectionIds::default(),
            scroll: SmoothScroll,
        }
    }

    pub fn with_contact(mut self, contact: Option<ContactWiring>) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_sections(mut self, sections: SectionIds) -> Self {
        self.sections = sections;
        self
    }

    pub fn blog(&self) -> &BlogRenderer {
        &self.blog
    }

    /// Run once per page: fetch both sections, apply all element edits, then wire navigation.
    ///
    /// Section failures degrade to placeholders; only a page the rewriter cannot process fails.
    pub async fn initialize(&self, page: &str) -> Result<AssembledPage, SiteError> {
        let mut publications_buffer = MarkupBuffer::new();
        let mut blog_buffer = MarkupBuffer::new();

        let (publications, blog) = tokio::join!(
            self.publications.load(&mut publications_buffer),
            self.blog.load(&mut blog_buffer),
        );

        let mut edits = PageEdits::new();
        edits
            .set_inner_html(&self.sections.publications, publications_buffer.into_html())
            .set_inner_html(&self.sections.blog, blog_buffer.into_html());
        if let Some(contact) = &self.contact {
            contact.apply(&mut edits);
        }

        let edited = apply_edits(page, &edits)?;
        for id in &edited.missing {
            if *id == self.sections.publications || *id == self.sections.blog {
                warn!(id = %id, "page has no element with this id; skipping its content");
            } else {
                debug!(id = %id, "contact element missing from page");
            }
        }

        let scrolled = self.scroll.apply(&edited.html)?;

        info!(
            blog = ?blog,
            publications = ?publications,
            smooth_scroll_links = scrolled.marked,
            "page assembled"
        );

        Ok(AssembledPage {
            html: scrolled.html,
            blog,
            publications,
            missing_elements: edited.missing,
            smooth_scroll_links: scrolled.marked,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::blog::DEFAULT_BLOG_INDEX_PATH;
    use crate::application::blog::tests::StaticSource;
    use crate::application::publications::DEFAULT_PUBLICATIONS_PATH;
    use crate::domain::contact::EmailAddress;
    use crate::presentation::dom::count_elements;

    const PAGE: &str = r##"<!DOCTYPE html>
<html><head><title>Home</title></head>
<body>
<nav><a href="#publications">Publications</a> <a href="#blog">Blog</a></nav>
<section id="publications"><div id="publications-list"></div></section>
<section id="blog"><div id="blog-list"></div></section>
<footer><a id="email-link" href="#">mail</a> <a id="email-contact" href="#">hidden</a></footer>
</body></html>"##;

    const INDEX: &str = r##"[
        {"title": "Older", "date": "2023-11-02", "excerpt": "one", "link": "#", "tags": []},
        {"title": "Newer", "date": "2024-03-15", "excerpt": "two", "link": "blog/newer.html", "tags": ["ml", "notes"]}
    ]"##;

    const FRAGMENT: &str = "<ol><li>Paper</li></ol>";

    fn assembler(source: StaticSource) -> SiteAssembler {
        let source = Arc::new(source);
        let email = EmailAddress::new("jdoe", "example.edu").expect("valid email");
        SiteAssembler::new(
            BlogRenderer::new(source.clone()),
            PublicationsLoader::new(source),
        )
        .with_contact(Some(ContactWiring::new(email)))
    }

    #[tokio::test]
    async fn assembles_every_section() {
        let assembler = assembler(
            StaticSource::default()
                .with(DEFAULT_BLOG_INDEX_PATH, INDEX)
                .with(DEFAULT_PUBLICATIONS_PATH, FRAGMENT),
        );

        let page = assembler.initialize(PAGE).await.expect("assembled");

        assert_eq!(page.blog, BlogOutcome::Rendered { posts: 2 });
        assert_eq!(
            page.publications,
            PublicationsOutcome::Loaded {
                bytes: FRAGMENT.len()
            }
        );
        assert!(page.missing_elements.is_empty());
        assert_eq!(page.smooth_scroll_links, 2);

        let html = &page.html;
        assert!(html.contains(r#"<div id="publications-list"><ol><li>Paper</li></ol></div>"#));
        assert_eq!(count_elements(html, "#blog-list div.blog-post").unwrap(), 2);
        assert!(html.find("Newer").unwrap() < html.find("Older").unwrap());
        assert!(html.contains(r#"<a id="email-contact" href="mailto:jdoe@example.edu">jdoe@example.edu</a>"#));
        assert_eq!(count_elements(html, r#"a[data-scroll="smooth"]"#).unwrap(), 2);
        assert_eq!(count_elements(html, "head style").unwrap(), 1);
    }

    #[tokio::test]
    async fn unreachable_source_degrades_to_placeholders() {
        let assembler = assembler(StaticSource::default());

        let page = assembler.initialize(PAGE).await.expect("assembled");

        assert_eq!(page.blog, BlogOutcome::Unavailable);
        assert_eq!(page.publications, PublicationsOutcome::Unavailable);
        assert!(page.html.contains("Blog posts coming soon"));
        assert!(page.html.contains("Publications are unavailable right now"));
        assert_eq!(count_elements(&page.html, "div.blog-post").unwrap(), 0);
        assert!(page.html.contains("mailto:jdoe@example.edu"));
    }

    #[tokio::test]
    async fn missing_containers_are_reported() {
        let assembler = assembler(StaticSource::default().with(DEFAULT_BLOG_INDEX_PATH, "[]"))
            .with_contact(None)
            .with_sections(SectionIds {
                publications: "pubs".to_string(),
                blog: "blog-list".to_string(),
            });

        let page = assembler.initialize(PAGE).await.expect("assembled");

        assert_eq!(page.missing_elements, ["pubs".to_string()]);
        assert_eq!(page.blog, BlogOutcome::Empty);
        assert!(page.html.contains(r##"<a id="email-link" href="#">mail</a>"##));
    }
}
