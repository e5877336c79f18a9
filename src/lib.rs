//! protowiki - Protocol wiki generator
//!
//! This library recovers a model of a binary network protocol from decompiled
//! Java sources and renders it as cross-linked Markdown wiki pages. It is
//! designed to be consumed by:
//! - The CLI binary (src/bin/protowiki.rs)
//! - Other tools that only want the [`ProtocolModel`]
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **extractors**: regex matchers and the Java entity extractor
//! - **core**: model, walker, reconciler and the [`ProtocolEngine`]
//! - **formats**: Markdown and JSON output
//!
//! Extraction is best effort. Constructs the matchers do not recognize are
//! skipped; only a missing protocol root or packets directory stops a run.

pub mod core;
pub mod extractors;
pub mod formats;

use std::path::Path;

pub use crate::core::{
    EnumBodyScope, EnumType, FieldSpec, PacketSchema, ProtocolEngine, ProtocolModel, RecordType,
    Result, RunSummary, WikiConfig, WikiError,
};
pub use crate::extractors::{EntityExtractor, Extracted, JavaExtractor, UnitHints, UnitKind};
pub use crate::formats::{JsonSummary, WikiWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the protowiki library
pub fn version() -> &'static str {
    VERSION
}

/// Extract `protocol_dir` and write the wiki for `version` into `output_dir`.
///
/// With `with_json` the JSON summary is written next to the pages.
pub fn generate(
    protocol_dir: &Path,
    output_dir: &Path,
    version: &str,
    config: &WikiConfig,
    with_json: bool,
) -> Result<RunSummary> {
    let engine = ProtocolEngine::with_config(config.clone());
    let (model, summary) = engine.extract(protocol_dir)?;

    WikiWriter::new(output_dir, version, config).write_all(&model)?;
    if with_json {
        JsonSummary::from_model(&model, version).write_to(output_dir)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = TempDir::new().unwrap();
        let protocol = dir.path().join("protocol");
        fs::create_dir_all(protocol.join("packets/auth")).unwrap();
        fs::write(
            protocol.join("packets/auth/Hello.java"),
            "public class Hello implements Packet {\n    public static final int PACKET_ID = 1;\n    public String user;\n}",
        )
        .unwrap();

        let out = dir.path().join("wiki");
        let summary = generate(&protocol, &out, "t1", &WikiConfig::default(), true).unwrap();

        assert_eq!(summary.packets, 1);
        assert!(out.join("Version-t1-auth.md").is_file());
        assert!(out.join("Version-t1-packets.json").is_file());
    }

    #[test]
    fn test_generate_missing_root_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("wiki");
        let err = generate(&dir.path().join("nope"), &out, "t1", &WikiConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, WikiError::DirectoryNotFound { .. }));
        assert!(!out.exists());
    }
}
