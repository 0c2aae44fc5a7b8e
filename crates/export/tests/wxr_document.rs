// ABOUTME: Integration tests that read rendered export documents back with an XML reader.
// ABOUTME: Verifies well-formedness, item order and that CDATA content survives intact.

use blogport_export::{serialize, serialize_at, ExportOptions};
use blogport_extract::{PostRecord, PublishDate};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::Reader;

fn record(n: usize, title: &str, body: &str) -> PostRecord {
    PostRecord {
        source_locator: format!("https://site.test/post/{n}"),
        title: title.to_string(),
        publish_timestamp: Some(PublishDate::Raw(format!("2020-01-{:02}", n))),
        category: "Recipes".to_string(),
        body: body.to_string(),
    }
}

/// Collects the text (CDATA sections joined) of every element named `tag`.
fn element_texts(xml: &str, tag: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    let mut current: Option<String> = None;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == tag.as_bytes() => {
                current = Some(String::new());
            }
            Event::CData(e) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(std::str::from_utf8(&e).unwrap());
                }
            }
            Event::End(e) if e.name().as_ref() == tag.as_bytes() => {
                if let Some(buf) = current.take() {
                    out.push(buf);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

#[test]
fn items_keep_input_order_and_numbering() {
    let records = vec![
        record(1, "First Loaf", "<p>one</p>"),
        record(2, "Second Loaf", "<p>two</p>"),
        record(3, "Third Loaf", "<p>three</p>"),
    ];
    let doc = serialize(&records, "Bakery").unwrap();

    assert_eq!(
        element_texts(&doc, "wp:post_name"),
        vec!["first-loaf", "second-loaf", "third-loaf"]
    );
    assert_eq!(
        element_texts(&doc, "wp:post_date"),
        vec!["2020-01-01 00:00:00", "2020-01-02 00:00:00", "2020-01-03 00:00:00"]
    );
    let ids: Vec<usize> = doc
        .match_indices("<wp:post_id>")
        .map(|(i, _)| {
            let rest = &doc[i + "<wp:post_id>".len()..];
            rest[..rest.find('<').unwrap()].parse().unwrap()
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn cdata_terminators_round_trip() {
    let body = "<p>array[index[0]]> 1</p>";
    let doc = serialize(&[record(1, "Tricky ]]> Title", body)], "Site").unwrap();

    assert_eq!(element_texts(&doc, "content:encoded"), vec![body]);
    let titles = element_texts(&doc, "title");
    assert_eq!(titles.last().map(String::as_str), Some("Tricky ]]&gt; Title"));
}

#[test]
fn duplicate_titles_get_distinct_slugs() {
    let records = vec![
        record(1, "Weekly Update", "<p>a</p>"),
        record(2, "Weekly Update", "<p>b</p>"),
        record(3, "???", "<p>c</p>"),
    ];
    let doc = serialize_at(
        &records,
        &ExportOptions::default(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();
    assert_eq!(
        element_texts(&doc, "wp:post_name"),
        vec!["weekly-update", "weekly-update-2", "post-3"]
    );
}

#[test]
fn unreadable_dates_fall_back_to_generation_time() {
    let mut rec = record(1, "Undated", "<p>x</p>");
    rec.publish_timestamp = Some(PublishDate::Raw("sometime last spring".to_string()));
    let now = Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap();
    let doc = serialize_at(&[rec], &ExportOptions::default(), now).unwrap();
    assert_eq!(element_texts(&doc, "wp:post_date_gmt"), vec!["2024-02-29 18:30:00"]);
}
