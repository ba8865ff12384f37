//! Output directory layout: ripped titles at the top, encodes in a subdirectory.

use anyhow::{Context, Result};
use ripforge_common::paths::is_ripped_file;
use ripforge_common::RippedFile;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::OutputConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    encoded_subdir: String,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, encoded_subdir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            encoded_subdir: encoded_subdir.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.dir.clone(), config.encoded_subdir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn encoded_dir(&self) -> PathBuf {
        self.dir.join(&self.encoded_subdir)
    }

    /// Create the output directory and its encoded subdirectory.
    pub fn ensure_dirs(&self) -> Result<()> {
        let encoded = self.encoded_dir();
        std::fs::create_dir_all(&encoded)
            .with_context(|| format!("Failed to create output directory: {:?}", encoded))?;
        Ok(())
    }

    /// Ripped titles directly inside the output directory, sorted by name.
    ///
    /// A missing directory yields an empty list.
    pub fn discover_ripped_files(&self) -> Vec<RippedFile> {
        let files: Vec<RippedFile> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_ripped_file(e.path()))
            .map(|e| RippedFile::from_path(e.path()))
            .collect();

        debug!("Found {} ripped file(s) in {:?}", files.len(), self.dir);
        files
    }

    /// Where the encode of `file` is written.
    pub fn encoded_path(&self, file: &RippedFile) -> PathBuf {
        self.encoded_dir().join(&file.output_name)
    }
}
