use std::cmp::Reverse;

use serde::{Deserialize, Deserializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use url::Url;

/// Placeholder link meaning "no destination yet".
pub const NO_LINK_SENTINEL: &str = "#";

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const LOCAL_DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const LOCAL_DATETIME_SECONDS_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const SAFE_LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// One blog entry as published in the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRecord {
    pub title: String,
    /// Raw date text; absent or `null` is kept as an empty string and never parses.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Where a post's link points after filtering out placeholders and unsafe schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    None,
    Rejected(&'a str),
    Href(&'a str),
}

impl LinkTarget<'_> {
    pub fn href(&self) -> Option<&str> {
        match self {
            LinkTarget::Href(href) => Some(href),
            LinkTarget::None | LinkTarget::Rejected(_) => None,
        }
    }
}

impl PostRecord {
    /// Calendar date as written, used for display.
    pub fn published_on(&self) -> Option<Date> {
        parse_post_date(&self.date)
    }

    /// Instant used for ordering.
    pub fn published_at(&self) -> Option<OffsetDateTime> {
        parse_post_instant(&self.date)
    }

    /// Long-form date, or the raw value when it does not parse.
    pub fn display_date(&self) -> String {
        self.published_on()
            .and_then(|date| date.format(HUMAN_DATE_FORMAT).ok())
            .unwrap_or_else(|| self.date.trim().to_string())
    }

    pub fn link_target(&self) -> LinkTarget<'_> {
        let Some(link) = self.link.as_deref().map(str::trim) else {
            return LinkTarget::None;
        };
        if link.is_empty() || link == NO_LINK_SENTINEL {
            return LinkTarget::None;
        }
        if is_safe_link(link) {
            LinkTarget::Href(link)
        } else {
            LinkTarget::Rejected(link)
        }
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Parse the calendar date of a post.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times and offset-less `YYYY-MM-DDTHH:MM[:SS]`.
/// The date is kept as written; no time-zone conversion happens.
pub fn parse_post_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(datetime) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(datetime.date());
    }
    parse_local_datetime(raw).map(PrimitiveDateTime::date)
}

/// Parse the point in time a post was published.
///
/// Bare dates mean midnight UTC and offset-less date-times are read as UTC.
pub fn parse_post_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(datetime) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(datetime);
    }
    parse_local_datetime(raw).map(PrimitiveDateTime::assume_utc)
}

fn parse_local_datetime(raw: &str) -> Option<PrimitiveDateTime> {
    if let Ok(date) = Date::parse(raw, ISO_DATE_FORMAT) {
        return Some(date.midnight());
    }
    [LOCAL_DATETIME_SECONDS_FORMAT, LOCAL_DATETIME_FORMAT]
        .into_iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
}

/// Newest first by publication instant. Posts without a parseable date count as the
/// earliest possible value, and equal instants keep their input order.
pub fn sort_descending_by_date(mut posts: Vec<PostRecord>) -> Vec<PostRecord> {
    posts.sort_by_cached_key(|post| Reverse(post.published_at()));
    posts
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_safe_link(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => SAFE_LINK_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
