//! Shared test harness for integration tests.
//!
//! Provides [`FakeScanner`] standing in for the optical drives, helpers
//! for writing executable shell scripts that impersonate the external
//! tools, and [`TestApp`] which wires an [`App`] to a temporary output
//! directory and its own runtime.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ripforge::app::{App, Tools};
use ripforge::config::Config;
use ripforge::drives::DriveScanner;
use ripforge::wake::Waker;
use ripforge_common::{DriveInfo, Title};
use tempfile::TempDir;

/// Scanner reporting a fixed drive list and title list.
#[derive(Debug, Clone)]
pub struct FakeScanner {
    pub drives: Vec<DriveInfo>,
    pub titles: Option<Vec<Title>>,
}

impl FakeScanner {
    /// One drive at `/dev/sr0` holding `titles`.
    pub fn with_titles(titles: Vec<Title>) -> Self {
        Self {
            drives: vec![DriveInfo {
                device_path: PathBuf::from("/dev/sr0"),
                display_name: "Unknown Disc".to_string(),
                disc_type: "Blu-ray".to_string(),
                has_disc: true,
            }],
            titles: Some(titles),
        }
    }
}

impl DriveScanner for FakeScanner {
    fn scan(&self) -> Vec<DriveInfo> {
        self.drives.clone()
    }

    fn titles(&self, _device: &Path) -> Option<Vec<Title>> {
        self.titles.clone()
    }
}

pub fn title(index: u32, size: &str) -> Title {
    Title {
        index,
        duration: "1:00:00".to_string(),
        size: size.to_string(),
        chapter_count: 1,
        description: format!("Title {index}"),
    }
}

/// Write an executable `/bin/sh` script.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// An [`App`] with a temporary output directory and its own runtime.
pub struct TestApp {
    pub app: App<FakeScanner>,
    pub dir: TempDir,
    pub output: PathBuf,
    // Dropped last so background tasks outlive the app.
    runtime: tokio::runtime::Runtime,
}

impl TestApp {
    pub fn new(scanner: FakeScanner, makemkv: PathBuf, handbrake: PathBuf) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");

        let mut config = Config::default();
        config.output.dir = output.clone();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let tools = Tools { makemkv, handbrake };
        let mut app = App::new(
            &config,
            scanner,
            tools,
            runtime.handle().clone(),
            Waker::noop(),
        )
        .without_line_buffering();
        app.start(Vec::new());

        Self {
            app,
            dir,
            output,
            runtime,
        }
    }

    /// Poll until no batch is outstanding.
    pub fn wait_idle(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(20);
        while self.app.is_busy() {
            assert!(Instant::now() < deadline, "batch did not finish in time");
            std::thread::sleep(Duration::from_millis(10));
            self.app.poll_tasks();
        }
    }
}
