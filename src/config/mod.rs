mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Encoder speed presets accepted by the x264/x265 and NVENC encoders.
const KNOWN_SPEED_PRESETS: &[&str] = &[
    "ultrafast", "superfast", "veryfast", "faster", "fast", "medium", "slow", "slower",
    "veryslow", "placebo", "fastest", "slowest",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    for warning in validate_config(&config)? {
        tracing::warn!("{}", warning);
    }

    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./ripforge.toml",
        "./config.toml",
        "~/.config/ripforge/config.toml",
        "/etc/ripforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    let mut config = Config::default();
    expand_paths(&mut config);
    Ok(config)
}

fn expand_path(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(s.as_ref()).as_ref())
}

fn expand_paths(config: &mut Config) {
    config.output.dir = expand_path(&config.output.dir);
    config.logging.file = expand_path(&config.logging.file);
    if let Some(p) = config.tools.makemkvcon_path.as_mut() {
        *p = expand_path(p);
    }
    if let Some(p) = config.tools.handbrake_path.as_mut() {
        *p = expand_path(p);
    }
}

/// Validate configuration, returning non-fatal warnings.
pub fn validate_config(config: &Config) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if config.output.dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if config.output.encoded_subdir.trim().is_empty() {
        anyhow::bail!("Encoded subdirectory cannot be empty");
    }

    let encode = &config.encode;
    if encode.encoder.trim().is_empty() {
        anyhow::bail!("Encoder cannot be empty");
    }

    if encode.quality > 51 {
        anyhow::bail!("Quality must be between 0 and 51, got {}", encode.quality);
    }

    if !KNOWN_SPEED_PRESETS.contains(&encode.encoder_preset.as_str()) {
        warnings.push(format!(
            "Unknown encoder preset '{}'; HandBrakeCLI may reject it",
            encode.encoder_preset
        ));
    }

    if config.drives.candidates.is_empty() {
        warnings.push("No drive candidates configured; scans will find nothing".to_string());
    }

    for (name, path) in [
        ("makemkvcon", &config.tools.makemkvcon_path),
        ("HandBrakeCLI", &config.tools.handbrake_path),
    ] {
        if let Some(p) = path {
            if !p.exists() {
                warnings.push(format!(
                    "Configured {name} path does not exist: {:?}; falling back to PATH",
                    p
                ));
            }
        }
    }

    Ok(warnings)
}
