//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, PostsArgs, RenderArgs, SourceOverrides};

use crate::application::{
    blog::{DEFAULT_BLOG_EMPTY_MESSAGE, DEFAULT_BLOG_INDEX_PATH},
    contact::{DEFAULT_EMAIL_CONTACT_ID, DEFAULT_EMAIL_LINK_ID},
    publications::{DEFAULT_PUBLICATIONS_PATH, DEFAULT_PUBLICATIONS_UNAVAILABLE_MESSAGE},
    site::{DEFAULT_BLOG_CONTAINER_ID, DEFAULT_PUBLICATIONS_CONTAINER_ID},
};
use crate::domain::contact::EmailAddress;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vitae";
const ENV_PREFIX: &str = "VITAE";
const DEFAULT_SOURCE_DIR: &str = ".";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub source: SourceSettings,
    pub content: ContentSettings,
    pub page: PageSettings,
    pub contact: Option<EmailAddress>,
    pub messages: MessageSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Where the blog index and publications fragment come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Http { base_url: Url },
    Directory { root: PathBuf },
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub blog_index: String,
    pub publications: String,
}

#[derive(Debug, Clone)]
pub struct PageSettings {
    pub publications_container: String,
    pub blog_container: String,
    pub email_link: String,
    pub email_contact: String,
}

#[derive(Debug, Clone)]
pub struct MessageSettings {
    pub blog_empty: String,
    pub publications_unavailable: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => raw.apply_source_overrides(&args.overrides),
        Command::Posts(args) => raw.apply_source_overrides(&args.overrides),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    source: RawSourceSettings,
    content: RawContentSettings,
    page: RawPageSettings,
    contact: RawContactSettings,
    messages: RawMessageSettings,
}

impl RawSettings {
    fn apply_source_overrides(&mut self, overrides: &SourceOverrides) {
        if let Some(url) = overrides.source_url.as_ref() {
            self.source.base_url = Some(url.clone());
            self.source.directory = None;
        }
        if let Some(dir) = overrides.source_dir.as_ref() {
            self.source.directory = Some(dir.clone());
            self.source.base_url = None;
        }
        if let Some(path) = overrides.blog_index.as_ref() {
            self.content.blog_index = Some(path.clone());
        }
        if let Some(path) = overrides.publications.as_ref() {
            self.content.publications = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            source,
            content,
            page,
            contact,
            messages,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            source: build_source_settings(source)?,
            content: build_content_settings(content)?,
            page: build_page_settings(page)?,
            contact: build_contact(contact)?,
            messages: build_message_settings(messages),
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_source_settings(source: RawSourceSettings) -> Result<SourceSettings, LoadError> {
    let base_url = non_blank(source.base_url);
    match (base_url, source.directory) {
        (Some(_), Some(_)) => Err(LoadError::invalid(
            "source",
            "set either `base_url` or `directory`, not both",
        )),
        (Some(raw), None) => {
            let base_url = Url::parse(&raw)
                .map_err(|err| LoadError::invalid("source.base_url", format!("`{raw}`: {err}")))?;
            if !matches!(base_url.scheme(), "http" | "https") {
                return Err(LoadError::invalid(
                    "source.base_url",
                    format!("unsupported scheme `{}`", base_url.scheme()),
                ));
            }
            Ok(SourceSettings::Http { base_url })
        }
        (None, directory) => Ok(SourceSettings::Directory {
            root: directory.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
        }),
    }
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    Ok(ContentSettings {
        blog_index: resource_path(
            content.blog_index,
            DEFAULT_BLOG_INDEX_PATH,
            "content.blog_index",
        )?,
        publications: resource_path(
            content.publications,
            DEFAULT_PUBLICATIONS_PATH,
            "content.publications",
        )?,
    })
}

fn build_page_settings(page: RawPageSettings) -> Result<PageSettings, LoadError> {
    let settings = PageSettings {
        publications_container: element_id(
            page.publications_container,
            DEFAULT_PUBLICATIONS_CONTAINER_ID,
            "page.publications_container",
        )?,
        blog_container: element_id(
            page.blog_container,
            DEFAULT_BLOG_CONTAINER_ID,
            "page.blog_container",
        )?,
        email_link: element_id(page.email_link, DEFAULT_EMAIL_LINK_ID, "page.email_link")?,
        email_contact: element_id(
            page.email_contact,
            DEFAULT_EMAIL_CONTACT_ID,
            "page.email_contact",
        )?,
    };

    if settings.publications_container == settings.blog_container {
        return Err(LoadError::invalid(
            "page.blog_container",
            "must differ from `page.publications_container`",
        ));
    }

    Ok(settings)
}

fn build_contact(contact: RawContactSettings) -> Result<Option<EmailAddress>, LoadError> {
    match (non_blank(contact.user), non_blank(contact.domain)) {
        (Some(user), Some(domain)) => EmailAddress::new(user, domain)
            .map(Some)
            .map_err(|err| LoadError::invalid("contact", err.to_string())),
        (None, None) => Ok(None),
        _ => Err(LoadError::invalid(
            "contact",
            "`user` and `domain` must be configured together",
        )),
    }
}

fn build_message_settings(messages: RawMessageSettings) -> MessageSettings {
    MessageSettings {
        blog_empty: non_blank(messages.blog_empty)
            .unwrap_or_else(|| DEFAULT_BLOG_EMPTY_MESSAGE.to_string()),
        publications_unavailable: non_blank(messages.publications_unavailable)
            .unwrap_or_else(|| DEFAULT_PUBLICATIONS_UNAVAILABLE_MESSAGE.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSourceSettings {
    base_url: Option<String>,
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    blog_index: Option<String>,
    publications: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPageSettings {
    publications_container: Option<String>,
    blog_container: Option<String>,
    email_link: Option<String>,
    email_contact: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContactSettings {
    user: Option<String>,
    domain: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMessageSettings {
    blog_empty: Option<String>,
    publications_unavailable: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn resource_path(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    let Some(path) = value else {
        return Ok(default.to_string());
    };
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LoadError::invalid(key, "path must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn element_id(value: Option<String>, default: &str, key: &'static str) -> Result<String, LoadError> {
    let Some(id) = value else {
        return Ok(default.to_string());
    };
    if id.is_empty() {
        return Err(LoadError::invalid(key, "element id must not be empty"));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(LoadError::invalid(
            key,
            format!("element id `{id}` must not contain whitespace"),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests;
