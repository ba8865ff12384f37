//! Line-oriented progress protocols spoken by the external tools.
//!
//! Decoders are pure: one line in, zero or one record out. Lines that match
//! no known shape are dropped without error.

pub mod handbrake;
pub mod makemkv;

pub use handbrake::HandBrakeDecoder;
pub use makemkv::{DiscInfo, MakeMkvDecoder};

/// Turns one line of tool output into an optional progress record.
pub trait LineDecoder {
    type Record;

    fn decode(&mut self, line: &str) -> Option<Self::Record>;
}

/// Format a number of seconds as `HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use ripforge_av::protocol::format_hms;
///
/// assert_eq!(format_hms(932), "00:15:32");
/// assert_eq!(format_hms(36_000), "10:00:00");
/// ```
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
