//! Core type definitions for drives, titles, progress snapshots and ripped files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::paths;

/// An optical drive reported by a drive scan.
///
/// Immutable once reported; the whole list is replaced on every rescan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    /// Device node, e.g. `/dev/sr0`.
    pub device_path: PathBuf,
    /// Volume label or a placeholder when unknown.
    pub display_name: String,
    /// "Blu-ray", "DVD", "Empty", ...
    pub disc_type: String,
    /// Whether a readable disc is present.
    pub has_disc: bool,
}

impl fmt::Display for DriveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.device_path.display())
    }
}

/// A selectable program on a disc.
///
/// `index` is the value handed back to the extraction tool, not the
/// position of the title in any list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub index: u32,
    /// Human-readable duration, e.g. `1:45:23`.
    pub duration: String,
    /// Human-readable size, e.g. `25.4 GB`.
    pub size: String,
    pub chapter_count: u32,
    pub description: String,
}

/// A partial progress record decoded from one line of extraction-tool output.
#[derive(Debug, Clone, PartialEq)]
pub enum RipUpdate {
    /// A numeric progress value with its derived status text.
    Progress { percent: f64, status: String },
    /// A status message only; numeric fields carry forward.
    Status(String),
}

/// Snapshot of a running rip batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RipProgress {
    /// 1-based position of the item being ripped.
    pub current_item: usize,
    pub total_items: usize,
    /// 0.0 to 100.0 for the current item.
    pub percent: f64,
    pub status_text: String,
}

impl RipProgress {
    /// Begin item `current` of `total`, resetting the percentage.
    pub fn start_item(&mut self, current: usize, total: usize, status: impl Into<String>) {
        self.total_items = total;
        self.current_item = current.min(total);
        self.percent = 0.0;
        self.status_text = status.into();
    }

    /// Merge a decoded record into the snapshot.
    ///
    /// The percentage never moves backwards within one item.
    pub fn apply(&mut self, update: &RipUpdate) {
        match update {
            RipUpdate::Progress { percent, status } => {
                self.percent = self.percent.max(clamp_percent(*percent));
                self.status_text.clone_from(status);
            }
            RipUpdate::Status(status) => {
                self.status_text.clone_from(status);
            }
        }
    }
}

/// A partial progress record decoded from one line of transcoding-tool output.
///
/// Every field is independent; `None` means the line did not carry it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeUpdate {
    pub percent: Option<f64>,
    pub fps: Option<f64>,
    pub avg_fps: Option<f64>,
    /// Remaining time formatted as `HH:MM:SS`.
    pub eta: Option<String>,
}

impl EncodeUpdate {
    /// True when the record carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.percent.is_none() && self.fps.is_none() && self.avg_fps.is_none() && self.eta.is_none()
    }
}

/// Snapshot of a running encode batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeProgress {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// 0.0 to 100.0 for the current file.
    pub percent: f64,
    pub fps: f64,
    pub avg_fps: f64,
    pub eta: Option<String>,
    pub status_text: String,
}

impl EncodeProgress {
    /// Begin encoding a new file, resetting every numeric field.
    pub fn start_item(&mut self, input: &Path, output: &Path, status: impl Into<String>) {
        *self = Self {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            status_text: status.into(),
            ..Self::default()
        };
    }

    /// Merge a decoded record into the snapshot, keeping absent fields.
    pub fn apply(&mut self, update: &EncodeUpdate) {
        if let Some(percent) = update.percent {
            self.percent = self.percent.max(clamp_percent(percent));
        }
        if let Some(fps) = update.fps {
            self.fps = fps;
        }
        if let Some(avg) = update.avg_fps {
            self.avg_fps = avg;
        }
        if let Some(ref eta) = update.eta {
            self.eta = Some(eta.clone());
        }
        self.status_text = format!("Encoding: {}%", self.percent as u32);
    }
}

fn clamp_percent(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 100.0)
    }
}

/// An extracted title file found in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippedFile {
    pub source_path: PathBuf,
    /// Disc title recovered from the file name (see [`paths::title_number_or_default`]).
    pub title_number: u32,
    /// File name without directories, reused for the encoded output.
    pub output_name: String,
}

impl RippedFile {
    /// Describe a ripped file from its path using the naming heuristic.
    pub fn from_path(path: &Path) -> Self {
        let output_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            source_path: path.to_path_buf(),
            title_number: paths::title_number_or_default(&output_name),
            output_name,
        }
    }
}
