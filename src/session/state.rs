use std::fmt;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Scanning,
    DiscSelection,
    TitleSelection,
    Ripping,
    Encoding,
    Completed(Outcome),
}

impl SessionState {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning for drives..."),
            Self::DiscSelection => write!(f, "Select a drive"),
            Self::TitleSelection => write!(f, "Select titles to rip"),
            Self::Ripping => write!(f, "Ripping"),
            Self::Encoding => write!(f, "Encoding"),
            Self::Completed(Outcome::Succeeded) => write!(f, "Completed"),
            Self::Completed(Outcome::Failed) => write!(f, "Failed"),
        }
    }
}

/// Kind of the batch currently running in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Rip,
    Encode,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rip => write!(f, "rip"),
            Self::Encode => write!(f, "encode"),
        }
    }
}
