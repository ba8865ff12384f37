//! Foreground controller: feeds events to the session, runs the effects it
//! returns and turns finished background batches back into events.

use ripforge_av::{get_tool_path, EncodeSettings, HANDBRAKE, MAKEMKV};
use ripforge_common::{EncodeProgress, RipProgress};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::batch::{run_batch, BatchReport, EncodeRunner, RipRunner};
use crate::config::{Config, ToolsConfig};
use crate::drives::DriveScanner;
use crate::output::OutputLayout;
use crate::progress::ProgressStore;
use crate::session::{Effect, Event, Session};
use crate::task::TaskHandle;
use crate::wake::Waker;

/// Executables used for ripping and encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub makemkv: PathBuf,
    pub handbrake: PathBuf,
}

impl Tools {
    /// Resolve both tools, returning a warning line for each one missing.
    ///
    /// A missing tool keeps its bare name so a later run fails to spawn
    /// instead of blocking startup.
    pub fn resolve(config: &ToolsConfig) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut find = |name: &str, label: &str, configured: Option<&std::path::Path>| {
            get_tool_path(name, configured).unwrap_or_else(|_| {
                warnings.push(format!("WARNING: {label} not found in PATH"));
                PathBuf::from(name)
            })
        };

        let makemkv = find(MAKEMKV, "MakeMKV", config.makemkvcon_path.as_deref());
        let handbrake = find(HANDBRAKE, "HandBrakeCLI", config.handbrake_path.as_deref());
        (Self { makemkv, handbrake }, warnings)
    }
}

/// Everything the view needs for one frame.
#[derive(Debug)]
pub struct View<'a> {
    pub session: &'a Session,
    pub rip: RipProgress,
    pub encode: EncodeProgress,
}

pub struct App<S> {
    session: Session,
    scanner: S,
    layout: OutputLayout,
    tools: Tools,
    encode_settings: EncodeSettings,
    runtime: Handle,
    waker: Waker,
    rip_progress: ProgressStore<RipProgress>,
    encode_progress: ProgressStore<EncodeProgress>,
    rip_task: Option<TaskHandle<BatchReport>>,
    encode_task: Option<TaskHandle<BatchReport>>,
    line_buffered: bool,
    quit: bool,
}

impl<S: DriveScanner> App<S> {
    pub fn new(config: &Config, scanner: S, tools: Tools, runtime: Handle, waker: Waker) -> Self {
        Self {
            session: Session::new(),
            scanner,
            layout: OutputLayout::from_config(&config.output),
            tools,
            encode_settings: config.encode.clone(),
            runtime,
            waker,
            rip_progress: ProgressStore::new(),
            encode_progress: ProgressStore::new(),
            rip_task: None,
            encode_task: None,
            line_buffered: true,
            quit: false,
        }
    }

    /// Run the extraction tool without the `stdbuf` wrapper.
    pub fn without_line_buffering(mut self) -> Self {
        self.line_buffered = false;
        self
    }

    /// Log startup notices and run the first drive scan.
    pub fn start(&mut self, notices: Vec<String>) {
        for notice in notices {
            self.dispatch(Event::Notice(notice));
        }
        self.dispatch(Event::Rescan);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn view(&self) -> View<'_> {
        View {
            session: &self.session,
            rip: self.rip_progress.snapshot(),
            encode: self.encode_progress.snapshot(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// True while a background batch has not been collected yet.
    pub fn is_busy(&self) -> bool {
        self.rip_task.is_some() || self.encode_task.is_some()
    }

    /// Apply an event and every follow-up event its effects produce.
    pub fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in self.session.apply(event) {
                if let Some(next) = self.run_effect(effect) {
                    queue.push_back(next);
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Quit => {
                if self.is_busy() {
                    warn!("Quitting with a batch still running; its tool will be stopped");
                }
                self.quit = true;
                None
            }
            Effect::ScanDrives => Some(Event::DrivesScanned(self.scanner.scan())),
            Effect::LoadTitles { device } => {
                let titles = self.scanner.titles(&device);
                Some(Event::TitlesLoaded { device, titles })
            }
            Effect::StartRip { device, titles } => {
                self.spawn_rip(device, titles);
                None
            }
            Effect::DiscoverRippedFiles => {
                Some(Event::EncodeFilesFound(self.layout.discover_ripped_files()))
            }
            Effect::StartEncode { files } => {
                self.encode_progress.reset();
                let runner = EncodeRunner {
                    tool: self.tools.handbrake.clone(),
                    settings: self.encode_settings.clone(),
                    layout: self.layout.clone(),
                    progress: self.encode_progress.clone(),
                    waker: self.waker.clone(),
                };
                info!("Starting encode batch of {} file(s)", files.len());
                self.encode_task = Some(TaskHandle::spawn(&self.runtime, async move {
                    run_batch(&runner, &files).await
                }));
                None
            }
        }
    }

    fn spawn_rip(&mut self, device: PathBuf, titles: Vec<u32>) {
        self.rip_progress.reset();
        let runner = RipRunner {
            tool: self.tools.makemkv.clone(),
            device,
            layout: self.layout.clone(),
            progress: self.rip_progress.clone(),
            waker: self.waker.clone(),
            line_buffered: self.line_buffered,
        };
        info!("Starting rip batch of {} title(s)", titles.len());
        self.rip_task = Some(TaskHandle::spawn(&self.runtime, async move {
            run_batch(&runner, &titles).await
        }));
    }

    /// Collect finished batches. Called on every pass of the foreground loop.
    pub fn poll_tasks(&mut self) {
        if let Some(report) = take_finished(&mut self.rip_task) {
            let files = if report.success {
                self.layout.discover_ripped_files()
            } else {
                Vec::new()
            };
            self.dispatch(Event::RipFinished {
                success: report.success,
                log: report.log,
                files,
            });
        }

        if let Some(report) = take_finished(&mut self.encode_task) {
            self.dispatch(Event::EncodeFinished {
                success: report.success,
                log: report.log,
            });
        }
    }
}

fn take_finished(slot: &mut Option<TaskHandle<BatchReport>>) -> Option<BatchReport> {
    if !slot.as_ref()?.poll() {
        return None;
    }
    let mut task = slot.take()?;
    Some(task.join().unwrap_or_else(|e| BatchReport {
        log: vec![format!("Error: {e:#}")],
        ..BatchReport::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tools_produce_warnings() {
        let config = ToolsConfig {
            makemkvcon_path: Some(PathBuf::from("/nonexistent/makemkvcon")),
            handbrake_path: None,
        };
        let (tools, warnings) = Tools::resolve(&config);
        if which::which(MAKEMKV).is_err() {
            assert!(warnings.contains(&"WARNING: MakeMKV not found in PATH".to_string()));
            assert_eq!(tools.makemkv, PathBuf::from(MAKEMKV));
        }
        if which::which(HANDBRAKE).is_err() {
            assert!(warnings.contains(&"WARNING: HandBrakeCLI not found in PATH".to_string()));
        }
    }
}
