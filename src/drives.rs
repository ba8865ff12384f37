//! Optical drive enumeration and title listing.

use ripforge_common::{DriveInfo, Title};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of drives and disc titles for the session.
///
/// Both calls are synchronous and may be slow; they run on the foreground
/// thread before any batch starts.
pub trait DriveScanner {
    fn scan(&self) -> Vec<DriveInfo>;

    /// Titles on the disc in `device`. `None` if the disc could not be read.
    fn titles(&self, device: &Path) -> Option<Vec<Title>>;
}

/// Probes a fixed list of device nodes and asks MakeMKV for titles.
#[derive(Debug, Clone)]
pub struct SystemDriveScanner {
    candidates: Vec<PathBuf>,
    makemkv: PathBuf,
}

impl SystemDriveScanner {
    pub fn new(candidates: Vec<PathBuf>, makemkv: PathBuf) -> Self {
        Self {
            candidates,
            makemkv,
        }
    }
}

/// Describe one candidate node, or `None` if it does not exist.
pub fn probe_drive(path: &Path) -> Option<DriveInfo> {
    if !path.exists() {
        return None;
    }

    let has_disc = File::open(path).is_ok();
    let (display_name, disc_type) = if has_disc {
        ("Unknown Disc", "Blu-ray")
    } else {
        ("No Disc", "Empty")
    };

    Some(DriveInfo {
        device_path: path.to_path_buf(),
        display_name: display_name.to_string(),
        disc_type: disc_type.to_string(),
        has_disc,
    })
}

impl DriveScanner for SystemDriveScanner {
    fn scan(&self) -> Vec<DriveInfo> {
        let drives: Vec<DriveInfo> = self
            .candidates
            .iter()
            .filter_map(|p| probe_drive(p))
            .collect();
        debug!("Drive scan found {} device(s)", drives.len());
        drives
    }

    fn titles(&self, device: &Path) -> Option<Vec<Title>> {
        match ripforge_av::disc_info(&self.makemkv, device) {
            Ok(info) => Some(info.titles),
            Err(e) => {
                warn!("Failed to read titles from {:?}: {}", device, e);
                None
            }
        }
    }
}
