//! MakeMKV robot-mode (`-r`) output.
//!
//! During extraction two message kinds matter:
//!
//! - `PRGV:<current>,<min>,<max>` carries a progress value
//! - `PRGT:<code>,<id>,"<text>"` carries the name of the running operation
//!
//! In info mode the disc layout arrives as `CINFO:` and `TINFO:` attribute
//! lines, decoded by [`parse_disc_info`].

use std::collections::BTreeMap;

use ripforge_common::{RipUpdate, Title};

use super::LineDecoder;

const PRGV: &str = "PRGV:";
const PRGT: &str = "PRGT:";

// Attribute ids used in CINFO/TINFO lines.
const ATTR_NAME: u32 = 2;
const ATTR_CHAPTER_COUNT: u32 = 8;
const ATTR_DURATION: u32 = 9;
const ATTR_DISK_SIZE: u32 = 10;
const ATTR_OUTPUT_FILE_NAME: u32 = 27;
const ATTR_TREE_INFO: u32 = 30;

/// Decoder for extraction progress lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeMkvDecoder;

impl LineDecoder for MakeMkvDecoder {
    type Record = RipUpdate;

    fn decode(&mut self, line: &str) -> Option<RipUpdate> {
        decode_robot_line(line)
    }
}

/// Decode one robot-mode line.
///
/// A `PRGV` value with `max == 0` yields nothing. A `PRGT` line yields a
/// status-only record that the caller merges into its snapshot.
pub fn decode_robot_line(line: &str) -> Option<RipUpdate> {
    if let Some(pos) = line.find(PRGV) {
        let (current, _min, max) = parse_progress_value(&line[pos + PRGV.len()..])?;
        if max == 0 {
            return None;
        }
        let percent = current as f64 * 100.0 / max as f64;
        return Some(RipUpdate::Progress {
            percent,
            status: format!("Progress: {}%", percent.min(100.0) as u32),
        });
    }

    if let Some(pos) = line.find(PRGT) {
        let text = progress_title_text(&line[pos + PRGT.len()..]);
        if text.is_empty() {
            return None;
        }
        return Some(RipUpdate::Status(text));
    }

    None
}

fn parse_progress_value(rest: &str) -> Option<(u64, u64, u64)> {
    let mut parts = rest.trim().splitn(3, ',');
    let current = parts.next()?.trim().parse().ok()?;
    let min = parts.next()?.trim().parse().ok()?;
    let max_field = parts.next()?.trim();
    let digits_end = max_field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(max_field.len());
    let max = max_field[..digits_end].parse().ok()?;
    Some((current, min, max))
}

/// `PRGT` payloads are normally `code,id,"text"`; anything else is taken
/// verbatim.
fn progress_title_text(rest: &str) -> String {
    let rest = rest.trim();
    let mut parts = rest.splitn(3, ',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(code), Some(id), Some(text))
            if code.trim().parse::<u64>().is_ok() && id.trim().parse::<u64>().is_ok() =>
        {
            unquote(text)
        }
        _ => rest.to_string(),
    }
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s);
    inner.replace("\\\"", "\"")
}

/// Disc layout reported by `makemkvcon -r info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscInfo {
    /// Disc label from `CINFO`.
    pub name: Option<String>,
    /// Titles ordered by index.
    pub titles: Vec<Title>,
    /// Output file names the tool will use, keyed by title index.
    pub output_names: BTreeMap<u32, String>,
}

/// Decode the full output of an info run.
pub fn parse_disc_info(output: &str) -> DiscInfo {
    let mut info = DiscInfo::default();
    let mut titles: BTreeMap<u32, Title> = BTreeMap::new();
    let mut tree_info: BTreeMap<u32, String> = BTreeMap::new();

    for line in output.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("CINFO:") {
            if let Some((attr, _code, value)) = split_cinfo(rest) {
                if attr == ATTR_NAME {
                    info.name = Some(value);
                }
            }
        } else if let Some(rest) = line.strip_prefix("TINFO:") {
            let Some((index, attr, value)) = split_tinfo(rest) else {
                continue;
            };
            let title = titles.entry(index).or_insert_with(|| Title {
                index,
                duration: String::new(),
                size: String::new(),
                chapter_count: 0,
                description: String::new(),
            });
            match attr {
                ATTR_NAME => title.description = value,
                ATTR_CHAPTER_COUNT => title.chapter_count = value.parse().unwrap_or(0),
                ATTR_DURATION => title.duration = value,
                ATTR_DISK_SIZE => title.size = value,
                ATTR_OUTPUT_FILE_NAME => {
                    info.output_names.insert(index, value);
                }
                ATTR_TREE_INFO => {
                    tree_info.insert(index, value);
                }
                _ => {}
            }
        }
    }

    for (index, title) in titles.iter_mut() {
        if title.description.is_empty() {
            if let Some(tree) = tree_info.remove(index) {
                title.description = tree;
            }
        }
    }

    info.titles = titles.into_values().collect();
    info
}

fn split_cinfo(rest: &str) -> Option<(u32, u32, String)> {
    let mut parts = rest.splitn(3, ',');
    let attr = parts.next()?.trim().parse().ok()?;
    let code = parts.next()?.trim().parse().ok()?;
    Some((attr, code, unquote(parts.next()?)))
}

fn split_tinfo(rest: &str) -> Option<(u32, u32, String)> {
    let mut parts = rest.splitn(4, ',');
    let index = parts.next()?.trim().parse().ok()?;
    let attr = parts.next()?.trim().parse().ok()?;
    let _code = parts.next()?;
    Some((index, attr, unquote(parts.next()?)))
}
