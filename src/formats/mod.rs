//! Output format modules for protowiki
//!
//! - `markdown`: version pages for the wiki
//! - `versions`: root index pages listing every documented version
//! - `json`: machine-readable summary

pub mod json;
pub mod markdown;
pub mod versions;

pub use json::{CategorySummary, EnumSummary, FieldSummary, JsonSummary, PacketSummary};
pub use markdown::{display_name, format_size, title_case, WikiWriter};
pub use versions::VersionIndex;
