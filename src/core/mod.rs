//! Core module for protowiki
//!
//! This module provides the protocol model and the extraction pipeline that
//! produces it.
//!
//! # Architecture
//!
//! - `models`: Protocol data structures (EnumType, RecordType, PacketSchema, ProtocolModel)
//! - `error`: Error types using thiserror
//! - `config`: JSON configuration with defaults
//! - `walker`: Protocol tree traversal with SourceWalker trait + DefaultWalker
//! - `reconciler`: Last-writer-wins registries and packet ordering
//! - `engine`: Main ProtocolEngine orchestration

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod walker;

// Re-export commonly used types
pub use config::{EnumBodyScope, WikiConfig, DEFAULT_CONFIG_FILE};
pub use engine::{ProtocolEngine, RunSummary};
pub use error::{Result, ResultExt, WikiError};
pub use models::{
    EnumType, EnumValue, FieldSpec, PacketLayout, PacketSchema, ProtocolModel, RecordType, TypeRef,
};
pub use reconciler::{ModelReconciler, ReconcileStats};
pub use walker::{DefaultWalker, SourceUnit, SourceWalker, WalkBatch};
