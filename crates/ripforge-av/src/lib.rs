//! # ripforge-av
//!
//! Adapters for the two external tools driven by ripforge.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`check_tool`], [`get_tool_path`]) -- locate
//!   `makemkvcon` and `HandBrakeCLI` and read their versions and presets.
//! - **Command execution** ([`ToolCommand`]) -- async builder that merges a
//!   child's stdout and stderr into one line stream.
//! - **Progress protocols** ([`protocol`]) -- pure decoders for MakeMKV
//!   robot mode and HandBrake JSON/legacy progress lines, plus the disc-info
//!   decoder.
//! - **Actions** ([`actions`]) -- extract one title, encode one file, read
//!   a disc's title list.

pub mod actions;
pub mod command;
pub mod error;
pub mod protocol;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use protocol::{DiscInfo, HandBrakeDecoder, LineDecoder, MakeMkvDecoder};
pub use tools::{
    check_tool, check_tool_at, check_tool_with_arg, check_tools, get_tool_path,
    handbrake_presets, require_tool, tool_version, ToolInfo, HANDBRAKE, MAKEMKV,
};

pub use actions::{
    disc_info, encode_args, encode_file, rip_args, rip_title, EncodeRequest, EncodeSettings,
    RipRequest,
};
