//! File naming conventions shared by the ripper and the encoder.
//!
//! The extraction tool names its output `<name>_t<NN>.mkv` (older releases
//! used `title<NN>.mkv`). The title number is recovered from that name; when
//! neither pattern matches, [`DEFAULT_TITLE_NUMBER`] is used.

use std::path::Path;

/// Extension of files produced by the extraction tool.
pub const RIPPED_EXTENSION: &str = "mkv";

/// Title number assumed for a file whose name matches no known pattern.
///
/// Two unrecognised files map to the same number; callers that care must
/// check [`title_number_from_filename`] themselves.
pub const DEFAULT_TITLE_NUMBER: u32 = 1;

/// Check if a path has the ripped-file extension (case-insensitive).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ripforge_common::paths::is_ripped_file;
///
/// assert!(is_ripped_file(Path::new("/out/title_t00.mkv")));
/// assert!(is_ripped_file(Path::new("Movie.MKV")));
/// assert!(!is_ripped_file(Path::new("notes.txt")));
/// ```
pub fn is_ripped_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(RIPPED_EXTENSION))
        .unwrap_or(false)
}

/// Recover the disc title number from an extracted file name.
///
/// Recognises `<name>_t<NN>.mkv` and `title<NN>.mkv`.
///
/// # Examples
///
/// ```
/// use ripforge_common::paths::title_number_from_filename;
///
/// assert_eq!(title_number_from_filename("Movie_t07.mkv"), Some(7));
/// assert_eq!(title_number_from_filename("title03.mkv"), Some(3));
/// assert_eq!(title_number_from_filename("random.mkv"), None);
/// ```
pub fn title_number_from_filename(name: &str) -> Option<u32> {
    let (stem, ext) = name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(RIPPED_EXTENSION) {
        return None;
    }

    if let Some(pos) = stem.rfind("_t") {
        if let Some(n) = parse_digits(&stem[pos + 2..]) {
            return Some(n);
        }
    }

    stem.strip_prefix("title").and_then(parse_digits)
}

/// Like [`title_number_from_filename`] but falls back to [`DEFAULT_TITLE_NUMBER`].
pub fn title_number_or_default(name: &str) -> u32 {
    title_number_from_filename(name).unwrap_or(DEFAULT_TITLE_NUMBER)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
