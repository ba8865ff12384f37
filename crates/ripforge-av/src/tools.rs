//! External tool detection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;
use crate::protocol::handbrake::parse_preset_list;
use crate::{Error, Result};

/// MakeMKV command-line executable.
pub const MAKEMKV: &str = "makemkvcon";
/// HandBrake command-line executable.
pub const HANDBRAKE: &str = "HandBrakeCLI";

/// Information about an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// First line of the version output, if the tool printed one.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

impl ToolInfo {
    fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        }
    }
}

/// Check if a tool is on `PATH` and read its version.
///
/// # Example
///
/// ```no_run
/// use ripforge_av::check_tool;
///
/// let info = check_tool("HandBrakeCLI");
/// if info.available {
///     println!("HandBrakeCLI version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_with_arg(name, "--version")
}

/// Check a tool using a custom version argument.
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    match which::which(name) {
        Ok(path) => ToolInfo {
            name: name.to_string(),
            available: true,
            version: tool_version(&path, version_arg),
            path: Some(path),
        },
        Err(_) => ToolInfo::missing(name),
    }
}

/// Check a tool at a configured location, falling back to `PATH`.
pub fn check_tool_at(name: &str, config_path: Option<&Path>) -> ToolInfo {
    match get_tool_path(name, config_path) {
        Ok(path) => ToolInfo {
            name: name.to_string(),
            available: true,
            version: tool_version(&path, "--version"),
            path: Some(path),
        },
        Err(_) => ToolInfo::missing(name),
    }
}

/// Check both tools the ripper depends on, honouring configured paths.
pub fn check_tools(makemkv: Option<&Path>, handbrake: Option<&Path>) -> Vec<ToolInfo> {
    vec![check_tool_at(MAKEMKV, makemkv), check_tool_at(HANDBRAKE, handbrake)]
}

/// Require that a tool is on `PATH`, returning its path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over `PATH` lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "configured path for {name} does not exist: {}",
            path.display()
        );
    }

    require_tool(name)
}

/// First non-empty line the tool prints for `version_arg`.
///
/// Some tools print their banner on stderr or exit nonzero after printing
/// it, so both streams are consulted and the exit status is ignored.
pub fn tool_version(path: &Path, version_arg: &str) -> Option<String> {
    let output = ToolCommand::new(path.to_path_buf())
        .arg(version_arg)
        .output()
        .ok()?;

    output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// List the encoder presets the HandBrake binary at `path` knows about.
pub fn handbrake_presets(path: &Path) -> Result<Vec<String>> {
    let output = ToolCommand::new(path.to_path_buf())
        .arg("--preset-list")
        .output()?;

    // Older builds print the list on stderr.
    let mut presets = parse_preset_list(&output.stdout);
    if presets.is_empty() {
        presets = parse_preset_list(&output.stderr);
    }
    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_tool_not_found() {
        let info = check_tool("nonexistent_tool_12345");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn require_missing_tool_is_not_found() {
        let err = require_tool("nonexistent_tool_12345").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn check_tools_reports_both_in_order() {
        let infos = check_tools(Some(Path::new("/nonexistent/dir/makemkvcon")), None);
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec![MAKEMKV, HANDBRAKE]);
        if which::which(MAKEMKV).is_err() {
            assert!(!infos[0].available);
        }
    }

    #[test]
    fn configured_path_wins_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("HandBrakeCLI");
        std::fs::write(&fake, "").unwrap();

        let path = get_tool_path("nonexistent_tool_12345", Some(&fake)).unwrap();
        assert_eq!(path, fake);
    }

    #[test]
    fn missing_configured_path_falls_back_to_path_lookup() {
        let result = get_tool_path(
            "nonexistent_tool_12345",
            Some(Path::new("/nonexistent/dir/tool")),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn tool_version_reads_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-tool");
        std::fs::write(&script, "#!/bin/sh\necho\necho 'FakeTool 1.2.3'\necho extra\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(
            tool_version(&script, "--version").as_deref(),
            Some("FakeTool 1.2.3")
        );
    }
}
