//! Disc inspection with MakeMKV info mode.

use std::path::Path;

use crate::command::ToolCommand;
use crate::protocol::makemkv::{parse_disc_info, DiscInfo};
use crate::{Error, Result};

use super::rip::disc_selector;

/// Read the title layout of the disc in `device`.
///
/// # Errors
///
/// Fails if the tool cannot be started or exits nonzero.
pub fn disc_info(tool: &Path, device: &Path) -> Result<DiscInfo> {
    let mut cmd = ToolCommand::new(tool.to_path_buf());
    cmd.args(["-r".to_string(), "info".to_string(), disc_selector(device)]);

    tracing::debug!("disc info: {} {}", tool.display(), cmd.get_args().join(" "));
    let output = cmd.output()?;
    for line in output.stdout.lines() {
        tracing::trace!("{}: {line}", cmd.tool_name());
    }

    if !output.status.success() {
        return Err(Error::tool_failed(cmd.tool_name(), output.status.to_string()));
    }

    let info = parse_disc_info(&output.stdout);
    tracing::info!(
        "{}: {} title(s){}",
        device.display(),
        info.titles.len(),
        info.name
            .as_deref()
            .map(|n| format!(" on \"{n}\""))
            .unwrap_or_default()
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_spawn_failure() {
        let err = disc_info(
            Path::new("nonexistent_tool_xyz_12345"),
            Path::new("/dev/sr0"),
        )
        .unwrap_err();
        assert!(err.is_spawn_failure());
    }

    #[cfg(unix)]
    #[test]
    fn parses_script_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-makemkvcon");
        std::fs::write(
            &script,
            "#!/bin/sh\n[ \"$3\" = dev:/dev/sr0 ] || exit 2\necho 'CINFO:2,0,\"Disc\"'\necho 'TINFO:0,10,0,\"25.4 GB\"'\necho 'TINFO:1,10,0,\"2.1 GB\"'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let info = disc_info(&script, Path::new("/dev/sr0")).unwrap();
        assert_eq!(info.name.as_deref(), Some("Disc"));
        assert_eq!(info.titles.len(), 2);
        assert_eq!(info.titles[1].size, "2.1 GB");

        let err = disc_info(&script, Path::new("/dev/sr9")).unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
    }
}
