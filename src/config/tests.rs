use std::path::Path;

use super::*;

fn render_args(extra: &[&str]) -> CliArgs {
    let mut args = vec!["vitae", "render", "index.html"];
    args.extend_from_slice(extra);
    CliArgs::parse_from(args)
}

#[test]
fn defaults_read_from_current_directory() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(
        settings.source,
        SourceSettings::Directory {
            root: PathBuf::from(".")
        }
    );
    assert_eq!(settings.content.blog_index, "blog_index.json");
    assert_eq!(settings.content.publications, "publications_generated.html");
    assert_eq!(settings.page.blog_container, "blog-list");
    assert_eq!(settings.page.publications_container, "publications-list");
    assert_eq!(settings.page.email_link, "email-link");
    assert_eq!(settings.page.email_contact, "email-contact");
    assert_eq!(settings.messages.blog_empty, "Blog posts coming soon");
    assert!(settings.contact.is_none());
    assert_eq!(settings.logging.level, LevelFilter::INFO);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.source.directory = Some(PathBuf::from("/srv/site"));
    raw.logging.level = Some("info".to_string());
    raw.content.blog_index = Some("posts.json".to_string());

    let overrides = SourceOverrides {
        source_url: Some("https://example.org/~jdoe/".to_string()),
        log_level: Some("debug".to_string()),
        blog_index: Some("data/blog.json".to_string()),
        ..Default::default()
    };

    raw.apply_source_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.source,
        SourceSettings::Http {
            base_url: Url::parse("https://example.org/~jdoe/").unwrap()
        }
    );
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.content.blog_index, "data/blog.json");
}

#[test]
fn cli_source_dir_replaces_configured_url() {
    let mut raw = RawSettings::default();
    raw.source.base_url = Some("https://example.org/".to_string());

    let overrides = SourceOverrides {
        source_dir: Some(PathBuf::from("public")),
        ..Default::default()
    };

    raw.apply_source_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.source,
        SourceSettings::Directory {
            root: PathBuf::from("public")
        }
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = SourceOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_source_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn rejects_both_source_kinds() {
    let mut raw = RawSettings::default();
    raw.source.base_url = Some("https://example.org/".to_string());
    raw.source.directory = Some(PathBuf::from("public"));

    let err = Settings::from_raw(raw).expect_err("conflicting sources");
    assert!(matches!(err, LoadError::Invalid { key: "source", .. }));
}

#[test]
fn rejects_non_http_base_url() {
    let mut raw = RawSettings::default();
    raw.source.base_url = Some("ftp://example.org/".to_string());

    let err = Settings::from_raw(raw).expect_err("unsupported scheme");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "source.base_url",
            ..
        }
    ));
}

#[test]
fn rejects_invalid_element_ids() {
    let mut raw = RawSettings::default();
    raw.page.blog_container = Some("blog list".to_string());
    let err = Settings::from_raw(raw).expect_err("whitespace id");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "page.blog_container",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.page.blog_container = Some("publications-list".to_string());
    let err = Settings::from_raw(raw).expect_err("shared container");
    assert!(matches!(err, LoadError::Invalid { .. }));
}

#[test]
fn contact_requires_both_parts() {
    let mut raw = RawSettings::default();
    raw.contact.user = Some("jdoe".to_string());
    let err = Settings::from_raw(raw).expect_err("half a contact");
    assert!(matches!(err, LoadError::Invalid { key: "contact", .. }));

    let mut raw = RawSettings::default();
    raw.contact.user = Some("jdoe".to_string());
    raw.contact.domain = Some("example.edu".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.contact.map(|email| email.to_string()).as_deref(),
        Some("jdoe@example.edu")
    );
}

#[test]
fn rejects_unknown_log_level() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn parse_render_arguments() {
    let args = render_args(&[
        "--source-url",
        "https://example.org/",
        "--output",
        "/tmp/out.html",
        "--log-json",
        "yes",
    ]);

    match args.command {
        Command::Render(render) => {
            assert_eq!(render.page, Path::new("index.html"));
            assert_eq!(render.output.as_deref(), Some(Path::new("/tmp/out.html")));
            assert_eq!(
                render.overrides.source_url.as_deref(),
                Some("https://example.org/")
            );
            assert_eq!(render.overrides.log_json, Some(true));
        }
        Command::Posts(_) => panic!("wrong command parsed"),
    }
}

#[test]
fn source_url_conflicts_with_source_dir() {
    let result = CliArgs::try_parse_from([
        "vitae",
        "render",
        "index.html",
        "--source-url",
        "https://example.org/",
        "--source-dir",
        "public",
    ]);
    assert!(result.is_err());
}

#[test]
fn parse_posts_arguments() {
    let args = CliArgs::parse_from(["vitae", "posts", "--blog-index", "data/blog.json"]);

    match args.command {
        Command::Posts(posts) => {
            assert_eq!(posts.overrides.blog_index.as_deref(), Some("data/blog.json"));
        }
        Command::Render(_) => panic!("wrong command parsed"),
    }
}

#[test]
fn load_reads_explicit_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    std::io::Write::write_all(
        &mut file,
        br#"
[source]
base_url = "https://example.org/site"

[contact]
user = "jdoe"
domain = "example.edu"

[messages]
blog_empty = "Writing in progress"
"#,
    )
    .expect("write config");

    let args = CliArgs::parse_from([
        "vitae",
        "--config-file",
        file.path().to_str().expect("utf8 path"),
        "posts",
    ]);
    let settings = load(&args).expect("valid settings");

    assert_eq!(
        settings.source,
        SourceSettings::Http {
            base_url: Url::parse("https://example.org/site").unwrap()
        }
    );
    assert_eq!(settings.messages.blog_empty, "Writing in progress");
    assert!(settings.contact.is_some());
}
