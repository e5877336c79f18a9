//! Entity extractors
//!
//! An extractor runs the lexical matchers over one source unit and yields at
//! most one typed record. Units it cannot recognize yield `None`.

pub mod java;
pub mod patterns;

pub use java::JavaExtractor;

use crate::core::models::{EnumType, PacketSchema, RecordType};

/// Where a unit lives, which decides how a plain class is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Anywhere under the protocol root except the packets subtree
    Support,
    /// Directly inside a category directory under the packets root
    Packet,
}

/// Classification hints supplied by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitHints {
    pub category: String,
    /// Directory relative to the protocol root
    pub source_path: String,
    pub kind: UnitKind,
}

impl UnitHints {
    pub fn support(category: &str, source_path: &str) -> Self {
        Self {
            category: category.to_string(),
            source_path: source_path.to_string(),
            kind: UnitKind::Support,
        }
    }

    pub fn packet(category: &str, source_path: &str) -> Self {
        Self {
            category: category.to_string(),
            source_path: source_path.to_string(),
            kind: UnitKind::Packet,
        }
    }
}

/// One extracted entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Enum(EnumType),
    Record(RecordType),
    /// Packet-shaped candidate; may still lack a wire identifier
    Packet(PacketSchema),
}

impl Extracted {
    /// Declared type name
    pub fn name(&self) -> &str {
        match self {
            Extracted::Enum(e) => &e.name,
            Extracted::Record(r) => &r.name,
            Extracted::Packet(p) => &p.name,
        }
    }

    /// Short label for logs
    pub fn kind_label(&self) -> &'static str {
        match self {
            Extracted::Enum(_) => "enum",
            Extracted::Record(_) => "record",
            Extracted::Packet(_) => "packet",
        }
    }
}

/// Trait for entity extractors
pub trait EntityExtractor: Send + Sync {
    /// Extract the entity declared in `content`, if any
    fn extract(&self, content: &str, hints: &UnitHints) -> Option<Extracted>;

    /// Source language name
    fn language_name(&self) -> &str;
}
