//! Title extraction with MakeMKV.

use std::path::{Path, PathBuf};

use ripforge_common::RipUpdate;

use crate::command::ToolCommand;
use crate::protocol::MakeMkvDecoder;
use crate::Result;

/// One title to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RipRequest {
    /// Optical device holding the disc, e.g. `/dev/sr0`.
    pub device: PathBuf,
    /// Title index as reported by the info run.
    pub title_index: u32,
    /// Directory the tool writes its `.mkv` into.
    pub output_dir: PathBuf,
}

/// Disc selector understood by `makemkvcon` for a device path.
pub fn disc_selector(device: &Path) -> String {
    format!("dev:{}", device.display())
}

/// Arguments for a robot-mode extraction of one title.
pub fn rip_args(req: &RipRequest) -> Vec<String> {
    vec![
        "-r".to_string(),
        "--progress=-stdout".to_string(),
        "mkv".to_string(),
        disc_selector(&req.device),
        req.title_index.to_string(),
        req.output_dir.to_string_lossy().to_string(),
    ]
}

/// Extract one title, calling `on_update` for every decoded progress line.
///
/// With `line_buffered` the tool runs under `stdbuf -o0` when available.
/// Succeeds iff the tool exits with status zero.
pub async fn rip_title<F>(
    tool: &Path,
    req: &RipRequest,
    line_buffered: bool,
    on_update: F,
) -> Result<()>
where
    F: FnMut(RipUpdate),
{
    tracing::info!(
        "rip title {} from {} -> {}",
        req.title_index,
        req.device.display(),
        req.output_dir.display()
    );

    let mut cmd = ToolCommand::new(tool.to_path_buf());
    if line_buffered {
        cmd = cmd.unbuffered();
    }
    cmd.args(rip_args(req));
    cmd.run_decoded(MakeMkvDecoder, on_update).await
}
