//! RSS feed parsing for tide predictions.
//!
//! The feed carries one `<item>` per day; the item's `pubDate` gives
//! the date and its description lists that day's tides as lines like
//! `09:12 - High Tide &#x28;7.8m&#x29;` between HTML tags. Parsing is
//! deliberately line-oriented: unrecognized lines are skipped, never
//! fatal, so feed layout drift degrades to fewer events rather than an
//! empty board.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item>(.*?)</item>").unwrap());

static PUB_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pubDate>(.*?)</pubDate>").unwrap());

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<description>(.*?)</description>").unwrap());

/// HTML tags become line breaks, turning `<br/>`-separated tides into
/// one line each.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());

/// One tide line: time, type, height. The feed hex-encodes the
/// parentheses around the height; both forms are accepted.
static TIDE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2})\s+-\s+(High|Low)\s+Tide\s+(?:&#x28;|\()([\d.]+)m(?:&#x29;|\))")
        .unwrap()
});

/// High or low water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideType {
    High,
    Low,
}

/// One predicted tide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    /// Event time, RFC 3339 with the local UTC offset.
    pub tide_time: String,
    pub tide_type: TideType,
    /// Predicted height in metres, two decimals.
    pub height_m: f64,
}

/// Payload stored under the tides key and served by the tides endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidesPayload {
    pub events: Vec<TideEvent>,
}

/// Parse the feed XML into chronologically sorted tide events.
///
/// Days in the feed overlap between fetches; when the same timestamp
/// appears more than once the last occurrence wins, so a corrected
/// prediction replaces an earlier one.
pub fn parse_feed(xml: &str, tz: Tz) -> Vec<TideEvent> {
    let mut records: Vec<(DateTime<Tz>, TideEvent)> = Vec::new();

    for item in ITEM_RE.captures_iter(xml) {
        let body = &item[1];

        let Some(date) = item_date(body) else {
            continue;
        };
        let Some(text) = description_text(body) else {
            continue;
        };

        for line in text.lines() {
            let Some((time, tide_type, height_m)) = parse_line(line.trim()) else {
                continue;
            };

            // A time falling in a DST gap has no local representation;
            // the line is dropped like any other unparseable one.
            let Some(local) = tz.from_local_datetime(&date.and_time(time)).earliest() else {
                continue;
            };

            records.push((
                local,
                TideEvent {
                    tide_time: local.to_rfc3339(),
                    tide_type,
                    height_m,
                },
            ));
        }
    }

    let mut unique: HashMap<String, (DateTime<Tz>, TideEvent)> = HashMap::new();
    for (at, event) in records {
        unique.insert(event.tide_time.clone(), (at, event));
    }

    let mut events: Vec<(DateTime<Tz>, TideEvent)> = unique.into_values().collect();
    events.sort_by(|a, b| a.0.cmp(&b.0));
    events.into_iter().map(|(_, event)| event).collect()
}

/// Date of an item, from its RFC 2822 `pubDate`.
fn item_date(item: &str) -> Option<NaiveDate> {
    let raw = PUB_DATE_RE.captures(item)?.get(1)?.as_str().trim();
    DateTime::parse_from_rfc2822(raw).ok().map(|dt| dt.date_naive())
}

/// Description content with CDATA unwrapped and tags flattened to
/// line breaks.
fn description_text(item: &str) -> Option<String> {
    let raw = DESCRIPTION_RE.captures(item)?.get(1)?.as_str().trim();
    let raw = raw.strip_prefix("<![CDATA[").unwrap_or(raw);
    let raw = raw.strip_suffix("]]>").unwrap_or(raw);
    Some(TAG_RE.replace_all(raw, "\n").into_owned())
}

fn parse_line(line: &str) -> Option<(NaiveTime, TideType, f64)> {
    let caps = TIDE_LINE_RE.captures(line)?;

    let hour = caps[1][..2].parse().ok()?;
    let minute = caps[1][3..].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    let tide_type = match &caps[2] {
        "High" => TideType::High,
        _ => TideType::Low,
    };

    let height: f64 = caps[3].parse().ok()?;

    Some((time, tide_type, (height * 100.0).round() / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> Tz {
        chrono_tz::Europe::London
    }

    fn item(pub_date: &str, description: &str) -> String {
        format!(
            "<item>\n<title>Burry Port Tide Times</title>\n\
             <link>https://www.tidetimes.org.uk/burry-port-tide-times</link>\n\
             <description><![CDATA[{}]]></description>\n\
             <pubDate>{}</pubDate>\n</item>",
            description, pub_date
        )
    }

    fn feed(items: &[String]) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n\
             <title>Burry Port Tide Times</title>\n{}\n</channel>\n</rss>",
            items.join("\n")
        )
    }

    #[test]
    fn parses_a_realistic_day() {
        let xml = feed(&[item(
            "Tue, 10 Mar 2026 00:00:00 GMT",
            "03:23 - Low Tide &#x28;2.14m&#x29;<br/>09:12 - High Tide &#x28;7.8m&#x29;<br/>\
             15:47 - Low Tide &#x28;2.31m&#x29;<br/>21:34 - High Tide &#x28;7.62m&#x29;<br/>\
             <a href=\"https://www.tidetimes.org.uk\">Burry Port tide times</a>",
        )]);

        let events = parse_feed(&xml, london());

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].tide_time, "2026-03-10T03:23:00+00:00");
        assert_eq!(events[0].tide_type, TideType::Low);
        assert_eq!(events[0].height_m, 2.14);
        assert_eq!(events[1].tide_time, "2026-03-10T09:12:00+00:00");
        assert_eq!(events[1].tide_type, TideType::High);
        assert_eq!(events[3].height_m, 7.62);
    }

    #[test]
    fn multiple_days_sort_chronologically() {
        let xml = feed(&[
            // Later day first in the feed
            item(
                "Wed, 11 Mar 2026 00:00:00 GMT",
                "04:02 - Low Tide &#x28;2.2m&#x29;",
            ),
            item(
                "Tue, 10 Mar 2026 00:00:00 GMT",
                "21:34 - High Tide &#x28;7.6m&#x29;",
            ),
        ]);

        let events = parse_feed(&xml, london());

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tide_time, "2026-03-10T21:34:00+00:00");
        assert_eq!(events[1].tide_time, "2026-03-11T04:02:00+00:00");
    }

    #[test]
    fn summer_dates_carry_bst_offset() {
        let xml = feed(&[item(
            "Wed, 15 Jul 2026 00:00:00 GMT",
            "06:45 - High Tide &#x28;8.1m&#x29;",
        )]);

        let events = parse_feed(&xml, london());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tide_time, "2026-07-15T06:45:00+01:00");
    }

    #[test]
    fn duplicate_times_keep_the_last_occurrence() {
        let xml = feed(&[
            item(
                "Tue, 10 Mar 2026 00:00:00 GMT",
                "09:12 - High Tide &#x28;7.8m&#x29;",
            ),
            item(
                "Tue, 10 Mar 2026 00:00:00 GMT",
                "09:12 - High Tide &#x28;7.9m&#x29;",
            ),
        ]);

        let events = parse_feed(&xml, london());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].height_m, 7.9);
    }

    #[test]
    fn plain_parentheses_are_accepted() {
        let xml = feed(&[item(
            "Tue, 10 Mar 2026 00:00:00 GMT",
            "09:12 - High Tide (7.8m)",
        )]);

        let events = parse_feed(&xml, london());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].height_m, 7.8);
    }

    #[test]
    fn unrecognized_lines_are_skipped() {
        let xml = feed(&[item(
            "Tue, 10 Mar 2026 00:00:00 GMT",
            "Sunrise: 06:31<br/>09:12 - High Tide &#x28;7.8m&#x29;<br/>Moon phase: waxing",
        )]);

        let events = parse_feed(&xml, london());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn item_without_pub_date_is_skipped() {
        let xml = feed(&[
            "<item><description><![CDATA[09:12 - High Tide (7.8m)]]></description></item>"
                .to_string(),
        ]);

        assert!(parse_feed(&xml, london()).is_empty());
    }

    #[test]
    fn empty_feed_yields_no_events() {
        let xml = feed(&[]);
        assert!(parse_feed(&xml, london()).is_empty());
    }

    #[test]
    fn times_inside_a_dst_gap_are_dropped() {
        // London springs forward 01:00 -> 02:00 on 29 March 2026;
        // 01:30 does not exist that day.
        let xml = feed(&[item(
            "Sun, 29 Mar 2026 00:00:00 GMT",
            "01:30 - Low Tide &#x28;2.0m&#x29;<br/>08:15 - High Tide &#x28;7.4m&#x29;",
        )]);

        let events = parse_feed(&xml, london());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tide_time, "2026-03-29T08:15:00+01:00");
    }

    #[test]
    fn heights_round_to_two_decimals() {
        let xml = feed(&[item(
            "Tue, 10 Mar 2026 00:00:00 GMT",
            "09:12 - High Tide &#x28;7.8567m&#x29;",
        )]);

        let events = parse_feed(&xml, london());
        assert_eq!(events[0].height_m, 7.86);
    }

    #[test]
    fn payload_serializes_with_string_tide_types() {
        let payload = TidesPayload {
            events: vec![TideEvent {
                tide_time: "2026-03-10T09:12:00+00:00".to_string(),
                tide_type: TideType::High,
                height_m: 7.8,
            }],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "events": [{
                    "tide_time": "2026-03-10T09:12:00+00:00",
                    "tide_type": "High",
                    "height_m": 7.8
                }]
            })
        );
    }
}
