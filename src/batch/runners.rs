use async_trait::async_trait;
use ripforge_av::{encode_file, rip_title, EncodeRequest, EncodeSettings, RipRequest};
use ripforge_common::{EncodeProgress, RipProgress, RippedFile};
use std::path::PathBuf;
use tracing::debug;

use super::ItemRunner;
use crate::output::OutputLayout;
use crate::progress::ProgressStore;
use crate::wake::Waker;

/// Extracts disc titles (by index) from one drive.
#[derive(Debug, Clone)]
pub struct RipRunner {
    pub tool: PathBuf,
    pub device: PathBuf,
    pub layout: OutputLayout,
    pub progress: ProgressStore<RipProgress>,
    pub waker: Waker,
    /// Wrap the tool in `stdbuf -o0` when available.
    pub line_buffered: bool,
}

#[async_trait]
impl ItemRunner for RipRunner {
    type Item = u32;

    fn describe(&self, index: &u32) -> String {
        format!("title {index}")
    }

    async fn prepare(&self) -> anyhow::Result<()> {
        self.layout.ensure_dirs()
    }

    async fn run_item(&self, position: usize, total: usize, index: &u32) -> anyhow::Result<()> {
        self.progress
            .update(|p| p.start_item(position, total, format!("Ripping title {index}...")));
        self.waker.wake();

        let req = RipRequest {
            device: self.device.clone(),
            title_index: *index,
            output_dir: self.layout.dir().to_path_buf(),
        };

        rip_title(&self.tool, &req, self.line_buffered, |update| {
            debug!("rip update: {:?}", update);
            self.progress.update(|p| p.apply(&update));
            self.waker.wake();
        })
        .await?;
        Ok(())
    }
}

/// Encodes ripped files into the layout's encoded directory.
#[derive(Debug, Clone)]
pub struct EncodeRunner {
    pub tool: PathBuf,
    pub settings: EncodeSettings,
    pub layout: OutputLayout,
    pub progress: ProgressStore<EncodeProgress>,
    pub waker: Waker,
}

#[async_trait]
impl ItemRunner for EncodeRunner {
    type Item = RippedFile;

    fn describe(&self, file: &RippedFile) -> String {
        file.output_name.clone()
    }

    async fn prepare(&self) -> anyhow::Result<()> {
        self.layout.ensure_dirs()
    }

    async fn run_item(
        &self,
        position: usize,
        total: usize,
        file: &RippedFile,
    ) -> anyhow::Result<()> {
        let output = self.layout.encoded_path(file);
        self.progress.update(|p| {
            p.start_item(
                &file.source_path,
                &output,
                format!("Encoding {} ({position}/{total})", file.output_name),
            )
        });
        self.waker.wake();

        let req = EncodeRequest {
            input: file.source_path.clone(),
            output,
            title: file.title_number,
        };

        encode_file(&self.tool, &req, &self.settings, |update| {
            debug!("encode update: {:?}", update);
            self.progress.update(|p| p.apply(&update));
            self.waker.wake();
        })
        .await?;
        Ok(())
    }
}
