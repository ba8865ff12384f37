//! Ripforge-Common: shared data model and filename conventions.
//!
//! This crate provides the types exchanged between the tool adapters and the
//! interactive session:
//!
//! - **Disc model**: [`DriveInfo`] and [`Title`] as reported by the drive scanner
//! - **Progress snapshots**: [`RipProgress`] and [`EncodeProgress`], plus the
//!   partial records ([`RipUpdate`], [`EncodeUpdate`]) decoded from tool output
//! - **Ripped files**: [`RippedFile`] and the title-number naming heuristic in
//!   [`paths`]
//!
//! # Examples
//!
//! ```
//! use ripforge_common::{RipProgress, RipUpdate};
//!
//! let mut progress = RipProgress::default();
//! progress.start_item(1, 2, "Ripping title 0");
//! progress.apply(&RipUpdate::Progress { percent: 50.0, status: "Progress: 50%".into() });
//! progress.apply(&RipUpdate::Status("Saving to MKV file".into()));
//! assert_eq!(progress.percent, 50.0);
//! assert_eq!(progress.status_text, "Saving to MKV file");
//! ```

pub mod paths;
pub mod types;

pub use types::*;
