use ripforge_av::EncodeSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub encode: EncodeSettings,

    #[serde(default)]
    pub drives: DrivesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory MakeMKV writes ripped titles into
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Subdirectory of `dir` receiving encoded files
    #[serde(default = "default_encoded_subdir")]
    pub encoded_subdir: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_encoded_subdir() -> String {
    "encoded".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            encoded_subdir: default_encoded_subdir(),
        }
    }
}

/// Explicit tool locations. Unset or missing paths fall back to `PATH`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub makemkvcon_path: Option<PathBuf>,

    #[serde(default)]
    pub handbrake_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrivesConfig {
    /// Device nodes probed on every scan, in display order
    #[serde(default = "default_candidates")]
    pub candidates: Vec<PathBuf>,
}

fn default_candidates() -> Vec<PathBuf> {
    [
        "/dev/sr0",
        "/dev/sr1",
        "/dev/sr2",
        "/dev/cdrom",
        "/dev/dvd",
        "/dev/bluray",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for DrivesConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log file used while the interactive session owns the terminal
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("ripforge.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Number of session log lines shown at the bottom of the screen
    #[serde(default = "default_log_lines")]
    pub log_lines: usize,
}

fn default_log_lines() -> usize {
    10
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_lines: default_log_lines(),
        }
    }
}
