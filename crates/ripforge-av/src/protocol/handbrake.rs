//! HandBrakeCLI progress output.
//!
//! Depending on version the tool reports progress either as JSON carrying a
//! `"Progress"` object (with `--json`) or as the classic console meter:
//!
//! ```text
//! Encoding: task 1 of 1, 45.23 % (123.45 fps, avg 120.12 fps, ETA 00h15m32s)
//! ```
//!
//! Both shapes are accepted on every line without negotiation.

use once_cell::sync::Lazy;
use regex::Regex;
use ripforge_common::EncodeUpdate;
use serde_json::Value;

use super::{format_hms, LineDecoder};

static RE_LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+) %.*?(\d+\.\d+) fps.*?avg (\d+\.\d+) fps.*?ETA (\d+)h(\d+)m(\d+)s")
        .expect("legacy progress pattern is valid")
});

// Per-field fallbacks for JSON fragments serde_json cannot parse.
static RE_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""Percent":\s*(\d+\.?\d*)"#).expect("valid pattern"));
static RE_RATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""Rate":\s*(\d+\.?\d*)"#).expect("valid pattern"));
static RE_RATE_AVG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""RateAvg":\s*(\d+\.?\d*)"#).expect("valid pattern"));
static RE_ETA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""ETASeconds":\s*(\d+)"#).expect("valid pattern"));

const PROGRESS_KEY: &str = "\"Progress\"";

/// Decoder for encode progress lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandBrakeDecoder;

impl LineDecoder for HandBrakeDecoder {
    type Record = EncodeUpdate;

    fn decode(&mut self, line: &str) -> Option<EncodeUpdate> {
        decode_progress_line(line)
    }
}

/// Decode one line in either wire shape.
pub fn decode_progress_line(line: &str) -> Option<EncodeUpdate> {
    if line.contains(PROGRESS_KEY) {
        if let Some(update) = decode_json(line) {
            return Some(update);
        }
    }
    decode_legacy(line)
}

/// Decode a line carrying a JSON `"Progress"` object.
///
/// Each field is looked up independently; a missing field stays `None`.
/// Returns `None` when no field is present at all.
pub fn decode_json(line: &str) -> Option<EncodeUpdate> {
    let update = match parse_json_fragment(line) {
        Some(root) => {
            let progress = root.get("Progress").unwrap_or(&root);
            EncodeUpdate {
                percent: find_number(progress, "Percent"),
                fps: find_number(progress, "Rate"),
                avg_fps: find_number(progress, "RateAvg"),
                eta: find_number(progress, "ETASeconds")
                    .filter(|s| *s >= 0.0)
                    .map(|s| format_hms(s as u64)),
            }
        }
        None => EncodeUpdate {
            percent: capture_f64(&RE_PERCENT, line),
            fps: capture_f64(&RE_RATE, line),
            avg_fps: capture_f64(&RE_RATE_AVG, line),
            eta: capture_f64(&RE_ETA, line).map(|s| format_hms(s as u64)),
        },
    };

    if update.is_empty() {
        None
    } else {
        Some(update)
    }
}

/// Decode the classic console meter. All four fields must be present.
pub fn decode_legacy(line: &str) -> Option<EncodeUpdate> {
    let caps = RE_LEGACY.captures(line)?;
    let percent = caps.get(1)?.as_str().parse().ok()?;
    let fps = caps.get(2)?.as_str().parse().ok()?;
    let avg_fps = caps.get(3)?.as_str().parse().ok()?;
    let hours: u64 = caps.get(4)?.as_str().parse().ok()?;
    let minutes: u64 = caps.get(5)?.as_str().parse().ok()?;
    let secs: u64 = caps.get(6)?.as_str().parse().ok()?;

    Some(EncodeUpdate {
        percent: Some(percent),
        fps: Some(fps),
        avg_fps: Some(avg_fps),
        eta: Some(format_hms(hours * 3600 + minutes * 60 + secs)),
    })
}

fn parse_json_fragment(line: &str) -> Option<Value> {
    let start = line.find('{')?;
    let end = line.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&line[start..=end]).ok()
}

/// Depth-first lookup of a numeric field anywhere below `value`.
fn find_number(value: &Value, key: &str) -> Option<f64> {
    match value {
        Value::Object(map) => {
            if let Some(n) = map.get(key).and_then(Value::as_f64) {
                return Some(n);
            }
            map.values().find_map(|v| find_number(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_number(v, key)),
        _ => None,
    }
}

fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Extract preset names from `HandBrakeCLI --preset-list` output.
///
/// Preset lines look like `"    + Fast 1080p30"`.
pub fn parse_preset_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let pos = line.find("    + ")?;
            let name = line[pos + 6..].trim_end();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_line_with_all_fields() {
        let line = r#"{"Progress": {"Working": 1, "Percent": 45.5, "Rate": 123.4, "RateAvg": 120.0, "ETASeconds": 932}}"#;
        let u = decode_progress_line(line).unwrap();
        assert_eq!(u.percent, Some(45.5));
        assert_eq!(u.fps, Some(123.4));
        assert_eq!(u.avg_fps, Some(120.0));
        assert_eq!(u.eta.as_deref(), Some("00:15:32"));
    }

    #[test]
    fn json_line_missing_eta_has_no_eta() {
        let line = r#"{"Progress": {"Percent": 10.0, "Rate": 50.0, "RateAvg": 48.5}}"#;
        let u = decode_progress_line(line).unwrap();
        assert_eq!(u.percent, Some(10.0));
        assert!(u.eta.is_none());
    }

    #[test]
    fn json_fields_nested_under_working() {
        let line = r#"Progress: {"Progress": {"State": "WORKING", "Working": {"Percent": 3.2, "ETASeconds": 3661}}}"#;
        let u = decode_progress_line(line).unwrap();
        assert_eq!(u.percent, Some(3.2));
        assert_eq!(u.eta.as_deref(), Some("01:01:01"));
        assert!(u.fps.is_none());
        assert!(u.avg_fps.is_none());
    }

    #[test]
    fn truncated_json_falls_back_to_field_scan() {
        let line = r#"{"Progress": {"Percent": 77.1, "Rate": 30.0"#;
        let u = decode_progress_line(line).unwrap();
        assert_eq!(u.percent, Some(77.1));
        assert_eq!(u.fps, Some(30.0));
        assert!(u.eta.is_none());
    }

    #[test]
    fn json_progress_without_fields_is_dropped() {
        assert_eq!(decode_progress_line(r#"{"Progress": {"State": "SCANNING"}}"#), None);
    }

    #[test]
    fn legacy_line() {
        let line = "Encoding: task 1 of 1, 45.23 % (123.45 fps, avg 120.12 fps, ETA 00h15m32s)";
        let u = decode_progress_line(line).unwrap();
        assert_eq!(u.percent, Some(45.23));
        assert_eq!(u.fps, Some(123.45));
        assert_eq!(u.avg_fps, Some(120.12));
        assert_eq!(u.eta.as_deref(), Some("00:15:32"));
    }

    #[test]
    fn legacy_line_requires_all_fields() {
        assert_eq!(decode_progress_line("Encoding: task 1 of 1, 45.23 %"), None);
        assert_eq!(
            decode_progress_line("Encoding: task 1 of 1, 45.23 % (123.45 fps, avg 120.12 fps)"),
            None
        );
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert_eq!(decode_progress_line("[12:00:01] hb_init: starting libhb thread"), None);
        assert_eq!(decode_progress_line(""), None);
    }

    #[test]
    fn decoder_accepts_both_shapes_in_one_run() {
        let mut d = HandBrakeDecoder;
        let a = d.decode(r#"{"Progress": {"Percent": 1.0}}"#);
        let b = d.decode("Encoding: task 1 of 1, 2.00 % (10.00 fps, avg 9.00 fps, ETA 01h00m00s)");
        assert_eq!(a.unwrap().percent, Some(1.0));
        assert_eq!(b.unwrap().eta.as_deref(), Some("01:00:00"));
    }

    #[test]
    fn preset_list_parsing() {
        let out = "General/\n    + Very Fast 1080p30\n    + Fast 1080p30\nWeb/\n    + Discord Nitro\n";
        assert_eq!(
            parse_preset_list(out),
            vec!["Very Fast 1080p30", "Fast 1080p30", "Discord Nitro"]
        );
    }
}
