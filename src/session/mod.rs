//! The session state machine.
//!
//! [`Session::apply`] is the only place session state changes. It performs no
//! I/O: anything that touches drives, files or processes is returned as an
//! [`Effect`] for the controller to run, whose result comes back as another
//! [`Event`].

mod event;
mod log;
mod state;

pub use event::{Effect, Event};
pub use log::{LogEntry, SessionLog};
pub use state::{BatchKind, Outcome, SessionState};

use ripforge_common::{DriveInfo, RippedFile, Title};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    drives: Vec<DriveInfo>,
    drive_cursor: usize,
    device: Option<PathBuf>,
    titles: Vec<Title>,
    selected: Vec<bool>,
    title_cursor: usize,
    ripped_files: Vec<RippedFile>,
    active: Option<BatchKind>,
    log: SessionLog,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Scanning,
            drives: Vec::new(),
            drive_cursor: 0,
            device: None,
            titles: Vec::new(),
            selected: Vec::new(),
            title_cursor: 0,
            ripped_files: Vec::new(),
            active: None,
            log: SessionLog::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn drives(&self) -> &[DriveInfo] {
        &self.drives
    }

    pub fn drive_cursor(&self) -> usize {
        self.drive_cursor
    }

    /// Drive whose titles are loaded.
    pub fn device(&self) -> Option<&Path> {
        self.device.as_deref()
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selected.get(position).copied().unwrap_or(false)
    }

    /// Indices of the checked titles, in list order.
    pub fn selected_titles(&self) -> Vec<u32> {
        self.titles
            .iter()
            .zip(&self.selected)
            .filter(|(_, on)| **on)
            .map(|(t, _)| t.index)
            .collect()
    }

    pub fn title_cursor(&self) -> usize {
        self.title_cursor
    }

    pub fn ripped_files(&self) -> &[RippedFile] {
        &self.ripped_files
    }

    pub fn active_batch(&self) -> Option<BatchKind> {
        self.active
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Quit => effects.push(Effect::Quit),
            Event::Rescan => self.handle_rescan(&mut effects),
            Event::CursorUp => self.move_cursor(-1),
            Event::CursorDown => self.move_cursor(1),
            Event::LoadTitles => self.handle_load_titles(&mut effects),
            Event::ToggleTitle => self.handle_toggle_title(),
            Event::SelectAllTitles => self.handle_select_all(),
            Event::StartRip => self.handle_start_rip(&mut effects),
            Event::StartEncode => self.handle_start_encode(&mut effects),
            Event::Notice(message) => self.log.push(message),
            Event::DrivesScanned(drives) => self.handle_drives_scanned(drives),
            Event::TitlesLoaded { device, titles } => self.handle_titles_loaded(device, titles),
            Event::EncodeFilesFound(files) => self.handle_encode_files_found(files, &mut effects),
            Event::RipFinished {
                success,
                log,
                files,
            } => self.handle_rip_finished(success, log, files),
            Event::EncodeFinished { success, log } => self.handle_encode_finished(success, log),
        }

        effects
    }

    fn handle_rescan(&mut self, effects: &mut Vec<Effect>) {
        self.state = SessionState::Scanning;
        self.drives.clear();
        self.drive_cursor = 0;
        self.clear_titles();
        self.ripped_files.clear();
        self.log.push("Scanning for drives...");
        effects.push(Effect::ScanDrives);
    }

    fn clear_titles(&mut self) {
        self.device = None;
        self.titles.clear();
        self.selected.clear();
        self.title_cursor = 0;
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.state {
            SessionState::DiscSelection => (&mut self.drive_cursor, self.drives.len()),
            SessionState::TitleSelection => (&mut self.title_cursor, self.titles.len()),
            _ => return,
        };
        if len == 0 {
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn handle_drives_scanned(&mut self, drives: Vec<DriveInfo>) {
        if self.state != SessionState::Scanning {
            debug!("Ignoring drive scan result in state {:?}", self.state);
            return;
        }

        if drives.is_empty() {
            self.log.push("No optical drives found. Press 'r' to rescan.");
        } else {
            let with_disc = drives.iter().filter(|d| d.has_disc).count();
            self.log.push(format!(
                "Found {} drive(s), {} with a disc",
                drives.len(),
                with_disc
            ));
        }
        self.drives = drives;
        self.drive_cursor = 0;
        self.state = SessionState::DiscSelection;
    }

    fn handle_load_titles(&mut self, effects: &mut Vec<Effect>) {
        if self.state != SessionState::DiscSelection {
            return;
        }
        let Some(drive) = self.drives.get(self.drive_cursor) else {
            self.log.push("No drive to load titles from");
            return;
        };

        let device = drive.device_path.clone();
        self.log
            .push(format!("Loading titles from {}...", device.display()));
        effects.push(Effect::LoadTitles { device });
    }

    fn handle_titles_loaded(&mut self, device: PathBuf, titles: Option<Vec<Title>>) {
        if self.state != SessionState::DiscSelection {
            debug!("Ignoring titles for {:?} in state {:?}", device, self.state);
            return;
        }

        match titles {
            Some(titles) if !titles.is_empty() => {
                self.log.push(format!(
                    "Found {} title(s) on {}",
                    titles.len(),
                    device.display()
                ));
                self.selected = vec![false; titles.len()];
                self.titles = titles;
                self.title_cursor = 0;
                self.device = Some(device);
                self.state = SessionState::TitleSelection;
            }
            Some(_) => self
                .log
                .push(format!("No titles found on {}", device.display())),
            None => self
                .log
                .push(format!("Could not read the disc in {}", device.display())),
        }
    }

    fn handle_toggle_title(&mut self) {
        if self.state != SessionState::TitleSelection {
            return;
        }
        if let Some(on) = self.selected.get_mut(self.title_cursor) {
            *on = !*on;
        }
    }

    /// Select every title, or clear the selection if all are selected.
    fn handle_select_all(&mut self) {
        if self.state != SessionState::TitleSelection {
            return;
        }
        let all = self.selected.iter().all(|&on| on);
        self.selected.iter_mut().for_each(|on| *on = !all);
    }

    /// Logs and returns true if a batch is already running.
    fn refuse_if_busy(&mut self) -> bool {
        match self.active {
            Some(kind) => {
                self.log
                    .push(format!("A {kind} is already running; wait for it to finish"));
                true
            }
            None => false,
        }
    }

    fn handle_start_rip(&mut self, effects: &mut Vec<Effect>) {
        if self.refuse_if_busy() {
            return;
        }
        if self.state != SessionState::TitleSelection {
            self.log.push("Load a disc's titles before ripping");
            return;
        }
        let Some(device) = self.device.clone() else {
            self.log.push("Load a disc's titles before ripping");
            return;
        };

        let titles = self.selected_titles();
        if titles.is_empty() {
            self.log.push("No titles selected");
            return;
        }

        self.log.push(format!(
            "Ripping {} title(s) from {}",
            titles.len(),
            device.display()
        ));
        self.ripped_files.clear();
        self.active = Some(BatchKind::Rip);
        self.state = SessionState::Ripping;
        effects.push(Effect::StartRip { device, titles });
    }

    fn handle_start_encode(&mut self, effects: &mut Vec<Effect>) {
        if self.refuse_if_busy() {
            return;
        }
        effects.push(Effect::DiscoverRippedFiles);
    }

    fn handle_encode_files_found(&mut self, files: Vec<RippedFile>, effects: &mut Vec<Effect>) {
        if self.refuse_if_busy() {
            return;
        }
        if files.is_empty() {
            self.log.push("No ripped files found to encode");
            return;
        }

        self.log.push(format!("Encoding {} file(s)", files.len()));
        self.active = Some(BatchKind::Encode);
        self.state = SessionState::Encoding;
        effects.push(Effect::StartEncode { files });
    }

    fn finish_batch(&mut self, kind: BatchKind, lines: Vec<String>) {
        if self.active == Some(kind) {
            self.active = None;
        }
        for line in lines {
            self.log.push(line);
        }
    }

    fn handle_rip_finished(&mut self, success: bool, lines: Vec<String>, files: Vec<RippedFile>) {
        self.finish_batch(BatchKind::Rip, lines);

        if self.state != SessionState::Ripping {
            self.log
                .push("Rip batch finished after a rescan; result not applied");
            return;
        }

        if success {
            self.log.push(format!(
                "Rip complete: {} file(s) ready. Press 'e' to encode.",
                files.len()
            ));
            self.ripped_files = files;
        } else {
            self.log.push("Rip failed");
            self.state = SessionState::Completed(Outcome::Failed);
        }
    }

    fn handle_encode_finished(&mut self, success: bool, lines: Vec<String>) {
        self.finish_batch(BatchKind::Encode, lines);

        if self.state != SessionState::Encoding {
            self.log
                .push("Encode batch finished after a rescan; result not applied");
            return;
        }

        if success {
            self.log.push("All encodes complete");
            self.state = SessionState::Completed(Outcome::Succeeded);
        } else {
            self.log.push("Encoding failed");
            self.state = SessionState::Completed(Outcome::Failed);
        }
    }
}
