use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use regex::Regex;

use crate::parser::traits::{LogParser, ParseError, RequestFields, RequestLog};

/// Access-log shape recognised anywhere in a line:
///
/// `<ip> - <ident>- [<date>] "<method> <path> <HTTP/x>" <status> - "<referrer>" "<agent>"<rest>`
///
/// Character classes are ASCII-only.
const ACCESS_LOG_PATTERN: &str = concat!(
    r"(?P<clientip>[0-9.]+)[[:space:]]-[[:space:]][[:word:]]*-[[:space:]]",
    r"\[(?P<datetime>[[:word:]./: +]+)\][[:space:]]",
    r#""(?P<method>[[:word:]]+)[[:space:]](?P<path>.+?)[[:space:]](?P<http_version>HTTP/[[:word:].]+)"[[:space:]]"#,
    r"(?P<status>[0-9]+)[[:space:]]-[[:space:]]",
    r#""(?P<referrer>.*?)"[[:space:]]"(?P<user_agent>.*?)""#,
    r"(?P<message_rest>.*)",
);

/// `29/Oct/2021:12:39:45 +0000`
const ACCESS_LOG_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Date part alone, for lines that name their zone (`29/Oct/2021:12:39:45 UTC`).
const ACCESS_LOG_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Zone abbreviations accepted in place of a numeric offset, in hours east.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("UT", 0),
    ("Z", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
];

fn access_log_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(ACCESS_LOG_PATTERN).expect("access log pattern compiles"))
}

/// Parser for request lines written by Rack/WEBrick style access loggers.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpLogParser;

impl LogParser for HttpLogParser {
    fn parse(&self, line: &str) -> Result<Option<RequestLog>, ParseError> {
        let caps = match access_log_regex().captures(line) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let datetime = &caps["datetime"];
        let timestamp = parse_timestamp(datetime)?;

        let method = &caps["method"];
        let path = &caps["path"];
        let status = &caps["status"];
        let rest = &caps["message_rest"];

        let fields = RequestFields {
            method: method.to_string(),
            path: path.to_string(),
            status: status.to_string(),
            clientip: caps["clientip"].to_string(),
            referrer: caps["referrer"].to_string(),
            user_agent: format!("{} {}", &caps["user_agent"], &caps["http_version"]),
        };

        Ok(Some(RequestLog {
            timestamp,
            message: format!("{} - {} {} {}", status, method, path, rest),
            fields,
        }))
    }
}

/// Numeric offset first, then a named zone. A failure reports the
/// numeric-offset error.
fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    match DateTime::parse_from_str(value, ACCESS_LOG_TIME_FORMAT) {
        Ok(timestamp) => Ok(timestamp),
        Err(source) => match with_named_zone(value) {
            Some(timestamp) => Ok(timestamp),
            None => Err(ParseError::invalid_timestamp(value, source)),
        },
    }
}

fn with_named_zone(value: &str) -> Option<DateTime<FixedOffset>> {
    let (local, zone) = value.rsplit_once(' ')?;
    let hours = NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map(|(_, hours)| *hours)?;
    let offset = FixedOffset::east_opt(hours * 3600)?;
    let naive = NaiveDateTime::parse_from_str(local, ACCESS_LOG_LOCAL_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.54 Safari/537.36";

    fn parse(line: &str) -> Result<Option<RequestLog>, ParseError> {
        HttpLogParser.parse(line)
    }

    #[test]
    fn test_pattern_compiles() {
        assert!(access_log_regex().captures_len() > 10);
    }

    #[test]
    fn test_parse_root_request() {
        let line = format!(
            "128.0.0.1 - - [29/Oct/2021:12:39:45 +0000] \"GET / HTTP/1.1\" 200 - \"\" \"{}\"",
            CHROME
        );
        let log = parse(&line).unwrap().expect("access log should match");
        assert_eq!(log.timestamp.to_rfc3339(), "2021-10-29T12:39:45+00:00");
        assert_eq!(log.message, "200 - GET / ");
        assert_eq!(log.fields.method, "GET");
        assert_eq!(log.fields.path, "/");
        assert_eq!(log.fields.status, "200");
        assert_eq!(log.fields.clientip, "128.0.0.1");
        assert_eq!(log.fields.referrer, "");
        assert_eq!(log.fields.user_agent, format!("{} HTTP/1.1", CHROME));
    }

    #[test]
    fn test_parse_with_referrer() {
        let line = format!(
            "128.0.0.1 - - [29/Oct/2021:12:39:45 +0000] \"GET /favicon.ico HTTP/1.1\" 404 - \"http://localhost:7036/\" \"{}\"",
            CHROME
        );
        let log = parse(&line).unwrap().unwrap();
        assert_eq!(log.fields.path, "/favicon.ico");
        assert_eq!(log.fields.status, "404");
        assert_eq!(log.fields.referrer, "http://localhost:7036/");
        assert_eq!(log.message, "404 - GET /favicon.ico ");
    }

    #[test]
    fn test_path_is_not_greedy() {
        let line = "127.0.0.1 - - [29/Oct/2021:13:35:18 +0000] \"GET /one HTTP/1.1\" 200 - \"\" \"Ruby\"";
        let log = parse(line).unwrap().unwrap();
        assert_eq!(log.fields.path, "/one");
        assert_eq!(log.fields.user_agent, "Ruby HTTP/1.1");
    }

    #[test]
    fn test_trailing_text_kept_with_leading_space() {
        let line = "10.0.0.1 - - [01/Feb/2026:12:00:00 +0000] \"POST /api HTTP/1.0\" 201 - \"\" \"curl/8.0\" 0.0123";
        let log = parse(line).unwrap().unwrap();
        assert_eq!(log.message, "201 - POST /api  0.0123");
        assert_eq!(log.fields.user_agent, "curl/8.0 HTTP/1.0");
    }

    #[test]
    fn test_match_anywhere_in_line() {
        let line = "web.1 | 10.0.0.1 - - [01/Feb/2026:12:00:00 +0000] \"GET /x HTTP/1.1\" 200 - \"\" \"a\"";
        let log = parse(line).unwrap().unwrap();
        assert_eq!(log.fields.clientip, "10.0.0.1");
    }

    #[test]
    fn test_positive_offset_preserved() {
        let line = "10.0.0.1 - - [01/Feb/2026:12:00:00 +0530] \"GET /x HTTP/1.1\" 200 - \"\" \"a\"";
        let log = parse(line).unwrap().unwrap();
        assert_eq!(log.timestamp.to_rfc3339(), "2026-02-01T12:00:00+05:30");
    }

    #[test]
    fn test_plain_line_does_not_match() {
        assert!(parse("Listening on port 3000").unwrap().is_none());
        assert!(parse("").unwrap().is_none());
    }

    #[test]
    fn test_bracketed_line_without_request_does_not_match() {
        let line = "127.0.0.1 - - [26/Jul/2021:01:56:48 -0500] other log message";
        assert!(parse(line).unwrap().is_none());
    }

    #[test]
    fn test_negative_offset_is_outside_the_grammar() {
        let line = "127.0.0.1 - - [26/Jul/2021:01:56:48 -0500] \"GET /unexistent HTTP/1.1\" 404 - \"\" \"curl/7.64.0\"";
        assert!(parse(line).unwrap().is_none());
    }

    #[test]
    fn test_named_ident_does_not_match() {
        let line = "127.0.0.1 - frank [10/Oct/2000:13:55:36 +0000] \"GET /a.gif HTTP/1.0\" 200 - \"\" \"x\"";
        assert!(parse(line).unwrap().is_none());
    }

    #[test]
    fn test_bad_datetime_is_an_error() {
        let line = "127.0.0.1 - - [2021.10.10:13:35:18 +0000] \"GET /one HTTP/1.1\" 200 - \"\" \"Ruby\"";
        match parse(line) {
            Err(ParseError::InvalidTimestamp { value, .. }) => {
                assert_eq!(value, "2021.10.10:13:35:18 +0000");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_utc_zone_name() {
        let line = "127.0.0.1 - - [29/Oct/2021:13:35:18 UTC] \"GET /one HTTP/1.1\" 200 - \"\" \"Ruby\"";
        let log = parse(line).unwrap().expect("named zone should be accepted");
        assert_eq!(
            crate::parser::model::format_timestamp(&log.timestamp),
            "2021-10-29T13:35:18.000+00:00"
        );
        assert_eq!(log.fields.path, "/one");
    }

    #[test]
    fn test_zero_offset_zone_names() {
        for zone in ["GMT", "Z", "utc"] {
            let value = format!("29/Oct/2021:13:35:18 {}", zone);
            let ts = parse_timestamp(&value).unwrap();
            assert_eq!(ts.to_rfc3339(), "2021-10-29T13:35:18+00:00", "zone {}", zone);
        }
    }

    #[test]
    fn test_us_zone_name_keeps_offset() {
        let ts = parse_timestamp("29/Oct/2021:13:35:18 PST").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-10-29T13:35:18-08:00");
        let ts = parse_timestamp("29/Oct/2021:13:35:18 EDT").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-10-29T13:35:18-04:00");
    }

    #[test]
    fn test_unknown_zone_name_is_an_error() {
        let line = "127.0.0.1 - - [29/Oct/2021:13:35:18 XYZ] \"GET /one HTTP/1.1\" 200 - \"\" \"Ruby\"";
        match parse(line) {
            Err(ParseError::InvalidTimestamp { value, .. }) => {
                assert_eq!(value, "29/Oct/2021:13:35:18 XYZ");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_with_zone_name_is_an_error() {
        assert!(parse_timestamp("2021.10.10:13:35:18 UTC").is_err());
    }

    #[test]
    fn test_error_location_is_in_parser() {
        let err = parse_timestamp("nope").unwrap_err();
        assert!(err.location().file().ends_with("http_log.rs"));
    }

    #[test]
    fn test_unknown_month_is_an_error() {
        let line = "127.0.0.1 - - [10/Foo/2021:13:35:18 +0000] \"GET /one HTTP/1.1\" 200 - \"\" \"Ruby\"";
        assert!(matches!(parse(line), Err(ParseError::InvalidTimestamp { .. })));
    }
}
