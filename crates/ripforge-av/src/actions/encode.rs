//! Transcoding with HandBrakeCLI.

use std::path::{Path, PathBuf};

use ripforge_common::EncodeUpdate;
use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;
use crate::protocol::HandBrakeDecoder;
use crate::Result;

/// Encoder settings shared by every file in an encode batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// HandBrake encoder identifier (`-e`).
    pub encoder: String,
    /// Encoder speed preset (`--encoder-preset`).
    pub encoder_preset: String,
    /// Constant quality value (`-q`).
    pub quality: u8,
    /// Named HandBrake preset (`--preset`).
    pub preset: Option<String>,
    pub chapter_markers: bool,
    pub scan_forced_subtitles: bool,
    pub burn_subtitles: bool,
    pub all_audio: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            encoder: "nvenc_h265".to_string(),
            encoder_preset: "slow".to_string(),
            quality: 22,
            preset: None,
            chapter_markers: true,
            scan_forced_subtitles: true,
            burn_subtitles: true,
            all_audio: true,
        }
    }
}

/// One file to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Title inside the input to encode. HandBrake treats 0 as "scan all",
    /// so values below 1 are raised to 1.
    pub title: u32,
}

/// Arguments for one HandBrake run with structured progress output.
pub fn encode_args(req: &EncodeRequest, settings: &EncodeSettings) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        req.input.to_string_lossy().to_string(),
        "-o".to_string(),
        req.output.to_string_lossy().to_string(),
    ];

    args.extend([
        "-e".to_string(),
        settings.encoder.clone(),
        "--encoder-preset".to_string(),
        settings.encoder_preset.clone(),
        "-q".to_string(),
        settings.quality.to_string(),
    ]);

    if let Some(preset) = settings.preset.as_deref().filter(|p| !p.is_empty()) {
        args.extend(["--preset".to_string(), preset.to_string()]);
    }

    if settings.chapter_markers {
        args.push("-m".to_string());
    }
    if settings.scan_forced_subtitles {
        args.extend(["--subtitle".to_string(), "scan".to_string(), "-F".to_string()]);
    }
    if settings.burn_subtitles {
        args.push("--subtitle-burned".to_string());
    }
    if settings.all_audio {
        args.push("--all-audio".to_string());
    }

    args.extend([
        "--title".to_string(),
        req.title.max(1).to_string(),
        "--json".to_string(),
    ]);
    args
}

/// Encode one file, calling `on_update` for every decoded progress line.
///
/// Succeeds iff the tool exits with status zero.
pub async fn encode_file<F>(
    tool: &Path,
    req: &EncodeRequest,
    settings: &EncodeSettings,
    on_update: F,
) -> Result<()>
where
    F: FnMut(EncodeUpdate),
{
    tracing::info!(
        "encode {} -> {} (encoder={}, preset={}, q={})",
        req.input.display(),
        req.output.display(),
        settings.encoder,
        settings.encoder_preset,
        settings.quality
    );

    let mut cmd = ToolCommand::new(tool.to_path_buf());
    cmd.args(encode_args(req, settings));
    cmd.run_decoded(HandBrakeDecoder, on_update).await
}
