// ABOUTME: Renders PostRecords into a WordPress eXtended RSS (WXR 1.2) import document.
// ABOUTME: Handles CDATA wrapping, title escaping, publish-date resolution and per-item defaults.

//! WXR serializer.
//!
//! Output shape:
//! - XML declaration, then `<rss version="2.0">` declaring the `excerpt`,
//!   `content`, `wfw`, `dc` and `wp` namespaces.
//! - One `<channel>` with title, description, generation date, language and
//!   `wp:wxr_version`.
//! - One `<item>` per record, in input order, numbered from 1.
//!
//! Free text goes into CDATA sections. A literal `]]>` is split across two
//! sections so it can never close one early.

use std::io::Write;

use blogport_extract::{PostRecord, PublishDate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ExportError;
use crate::slug::SlugAllocator;

pub const WXR_VERSION: &str = "1.2";

/// Namespace prefixes and URIs declared on the root element.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:excerpt", "http://wordpress.org/export/1.2/excerpt/"),
    ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
    ("xmlns:wfw", "http://wellformedweb.org/CommentAPI/"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:wp", "http://wordpress.org/export/1.2/"),
];

const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";
const WP_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Channel-level settings and item defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub site_title: String,
    pub description: String,
    pub language: String,
    pub creator: String,
    pub status: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            site_title: "Blog Import".to_string(),
            description: "Migrated blog posts".to_string(),
            language: "en-US".to_string(),
            creator: "admin".to_string(),
            status: "publish".to_string(),
        }
    }
}

impl ExportOptions {
    pub fn site_title(mut self, title: impl Into<String>) -> Self {
        self.site_title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Post status for every item, e.g. `publish` or `draft`.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Renders `records` under the channel title `title`, stamped with the
/// current time.
pub fn serialize(records: &[PostRecord], title: &str) -> Result<String, ExportError> {
    let opts = ExportOptions::default().site_title(title);
    serialize_at(records, &opts, Utc::now())
}

/// Renders `records` with explicit options and generation time.
///
/// `now` is also the publish date of any record whose date is missing or
/// unreadable.
pub fn serialize_at(
    records: &[PostRecord],
    opts: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    for &(name, uri) in NAMESPACES {
        rss.push_attribute((name, uri));
    }
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &opts.site_title)?;
    write_text_element(&mut writer, "description", &opts.description)?;
    write_text_element(&mut writer, "pubDate", &now.format(RFC822_FORMAT).to_string())?;
    write_text_element(&mut writer, "language", &opts.language)?;
    write_text_element(&mut writer, "wp:wxr_version", WXR_VERSION)?;

    let mut slugs = SlugAllocator::new();
    for (index, record) in records.iter().enumerate() {
        let post_id = index + 1;
        let slug = slugs.allocate(&record.title, post_id);
        write_item(&mut writer, record, post_id, &slug, opts, now)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    tracing::info!(items = records.len(), "rendered export document");
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_item<W: Write>(
    writer: &mut Writer<W>,
    record: &PostRecord,
    post_id: usize,
    slug: &str,
    opts: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<(), ExportError> {
    let published = resolve_publish_time(record.publish_timestamp.as_ref()).unwrap_or_else(|| {
        tracing::debug!(post_id, "no usable publish date, using generation time");
        now
    });
    let wp_date = published.format(WP_DATE_FORMAT).to_string();

    writer.write_event(Event::Start(BytesStart::new("item")))?;
    write_cdata_element(writer, "title", &escape_title(&record.title))?;
    write_text_element(writer, "pubDate", &published.format(RFC822_FORMAT).to_string())?;
    write_cdata_element(writer, "dc:creator", &opts.creator)?;
    write_cdata_element(writer, "content:encoded", record.body.trim())?;
    write_text_element(writer, "wp:post_id", &post_id.to_string())?;
    write_cdata_element(writer, "wp:post_date", &wp_date)?;
    write_cdata_element(writer, "wp:post_date_gmt", &wp_date)?;
    write_cdata_element(writer, "wp:comment_status", "open")?;
    write_cdata_element(writer, "wp:ping_status", "open")?;
    write_cdata_element(writer, "wp:post_name", slug)?;
    write_cdata_element(writer, "wp:status", &opts.status)?;
    write_cdata_element(writer, "wp:post_type", "post")?;

    let nicename = record.category.to_lowercase();
    let mut category = BytesStart::new("category");
    category.push_attribute(("domain", "category"));
    category.push_attribute(("nicename", nicename.as_str()));
    writer.write_event(Event::Start(category))?;
    write_cdata(writer, &record.category)?;
    writer.write_event(Event::End(BytesEnd::new("category")))?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Best-effort publish time for a record.
///
/// Parsed dates are used as-is. Raw strings are tried as an ISO timestamp
/// (with zone, then without, taken as UTC) and then as a plain `YYYY-MM-DD`.
pub fn resolve_publish_time(date: Option<&PublishDate>) -> Option<DateTime<Utc>> {
    match date? {
        PublishDate::Parsed(instant) => Some(*instant),
        PublishDate::Raw(raw) => parse_raw_date(raw.trim()),
    }
}

fn parse_raw_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.contains('T') {
        let zoned = raw.replace('Z', "+00:00");
        if let Ok(dt) = DateTime::parse_from_rfc3339(&zoned) {
            return Some(dt.with_timezone(&Utc));
        }
        return NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Escapes `&`, `<` and `>` in a title.
pub fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_cdata_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    write_cdata(writer, text)?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Writes `text` as one or more CDATA sections, splitting at every `]]>`.
fn write_cdata<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), ExportError> {
    writer.write_event(Event::Text(BytesText::from_escaped(cdata(text))))?;
    Ok(())
}

/// Wraps `text` in CDATA. A `]]>` inside ends one section after `]]` and
/// starts the next with `>`.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
