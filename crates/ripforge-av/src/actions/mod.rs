//! Tool invocations: title extraction, transcoding and disc inspection.

mod encode;
mod info;
mod rip;

pub use encode::{encode_args, encode_file, EncodeRequest, EncodeSettings};
pub use info::disc_info;
pub use rip::{disc_selector, rip_args, rip_title, RipRequest};
