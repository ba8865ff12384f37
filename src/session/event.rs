use ripforge_common::{DriveInfo, RippedFile, Title};
use std::path::PathBuf;

/// Input to the session: user commands and results of collaborator calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Quit,
    Rescan,
    CursorUp,
    CursorDown,
    /// Load titles for the drive under the cursor.
    LoadTitles,
    /// Toggle the title under the cursor.
    ToggleTitle,
    SelectAllTitles,
    StartRip,
    StartEncode,
    /// Message from outside the state machine, e.g. a missing tool.
    Notice(String),

    DrivesScanned(Vec<DriveInfo>),
    TitlesLoaded {
        device: PathBuf,
        titles: Option<Vec<Title>>,
    },
    /// Ripped files found when an encode was requested.
    EncodeFilesFound(Vec<RippedFile>),
    RipFinished {
        success: bool,
        log: Vec<String>,
        files: Vec<RippedFile>,
    },
    EncodeFinished {
        success: bool,
        log: Vec<String>,
    },
}

/// Work the controller performs on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    ScanDrives,
    LoadTitles { device: PathBuf },
    StartRip { device: PathBuf, titles: Vec<u32> },
    DiscoverRippedFiles,
    StartEncode { files: Vec<RippedFile> },
}
