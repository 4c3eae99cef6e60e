use std::path::Path;

use tempfile::TempDir;
use vitae::{
    application::{
        blog::{BlogOutcome, BlogRenderer},
        publications::{PublicationsLoader, PublicationsOutcome},
        site::SiteAssembler,
        source::FetchError,
    },
    config::SourceSettings,
    domain::posts::sort_descending_by_date,
    infra::resource_source,
    presentation::dom::count_elements,
};

const PAGE: &str = include_str!("fixtures/index.html");
const BLOG_INDEX: &str = include_str!("fixtures/blog_index.json");
const PUBLICATIONS: &str = include_str!("fixtures/publications_generated.html");

fn site_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("blog_index.json"), BLOG_INDEX).expect("write index");
    std::fs::write(dir.path().join("publications_generated.html"), PUBLICATIONS)
        .expect("write publications");
    dir
}

fn assembler(root: &Path) -> SiteAssembler {
    let source = resource_source(&SourceSettings::Directory {
        root: root.to_path_buf(),
    })
    .expect("directory source");
    SiteAssembler::new(
        BlogRenderer::new(source.clone()),
        PublicationsLoader::new(source),
    )
}

#[tokio::test]
async fn assembles_page_from_directory() {
    let dir = site_dir();

    let page = assembler(dir.path()).initialize(PAGE).await.expect("assembled");

    assert_eq!(page.blog, BlogOutcome::Rendered { posts: 3 });
    assert_eq!(
        page.publications,
        PublicationsOutcome::Loaded {
            bytes: PUBLICATIONS.len()
        }
    );
    assert_eq!(count_elements(&page.html, "div.blog-post").unwrap(), 3);
    // Without contact settings the placeholders stay untouched.
    assert!(page.html.contains(r##"<a id="email-link" href="#">Email</a>"##));
}

#[tokio::test]
async fn missing_files_fall_back() {
    let dir = TempDir::new().expect("temp dir");

    let page = assembler(dir.path()).initialize(PAGE).await.expect("assembled");

    assert_eq!(page.blog, BlogOutcome::Unavailable);
    assert_eq!(page.publications, PublicationsOutcome::Unavailable);
}

#[tokio::test]
async fn posts_listing_is_sorted() {
    let dir = site_dir();
    let assembler = assembler(dir.path());

    let posts = sort_descending_by_date(assembler.blog().fetch_posts().await.expect("posts"));
    let titles: Vec<&str> = posts.iter().map(|post| post.title.as_str()).collect();

    assert_eq!(
        titles,
        [
            "Effect handlers in practice",
            "Notes on gradual typing",
            "Draft without a date"
        ]
    );
}

#[tokio::test]
async fn traversal_outside_root_is_rejected() {
    let dir = site_dir();
    let renderer = BlogRenderer::new(
        resource_source(&SourceSettings::Directory {
            root: dir.path().to_path_buf(),
        })
        .expect("directory source"),
    )
    .with_index_path("../blog_index.json");

    let err = renderer.fetch_posts().await.expect_err("traversal");
    assert!(matches!(
        err,
        vitae::application::blog::BlogError::Fetch(FetchError::InvalidPath { .. })
    ));
}
