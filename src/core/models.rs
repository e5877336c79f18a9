//! Core data models for protowiki
//!
//! This module contains the protocol model recovered from source text:
//! enumerations, composite records, packet schemas and the reconciled whole.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix marking an array type, both in source types and wire types
pub const ARRAY_SUFFIX: &str = "[]";

/// Source primitive → wire primitive
const WIRE_TYPES: &[(&str, &str)] = &[
    ("byte", "i8"),
    ("short", "i16"),
    ("int", "i32"),
    ("long", "i64"),
    ("float", "f32"),
    ("double", "f64"),
    ("boolean", "bool"),
    ("String", "string"),
    ("UUID", "uuid"),
    ("byte[]", "bytes[]"),
];

fn lookup_wire_type(token: &str) -> Option<&'static str> {
    WIRE_TYPES
        .iter()
        .find(|(source, _)| *source == token)
        .map(|(_, wire)| *wire)
}

/// Strip one array suffix, reporting whether it was present
pub fn split_array_suffix(java_type: &str) -> (&str, bool) {
    match java_type.strip_suffix(ARRAY_SUFFIX) {
        Some(base) => (base, true),
        None => (java_type, false),
    }
}

/// A single enum constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

/// An enumeration type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    /// Declared package (namespace)
    pub package: String,
    pub category: String,
    /// Directory relative to the protocol root (`packets/<category>` for packet-local enums)
    pub source_path: String,
    /// Members in declaration order
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(name: &str, package: &str, category: &str, source_path: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            category: category.to_string(),
            source_path: source_path.to_string(),
            values: Vec::new(),
        }
    }

    /// Add a member. A repeated name keeps its first position and takes the new value.
    pub fn push_value(&mut self, name: &str, value: i64) {
        match self.values.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.value = value,
            None => self.values.push(EnumValue {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Value for a member name
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }
}

/// A field declared on a packet or record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// Declared source type token, e.g. `int[]` or `Map<String, Integer>`
    pub java_type: String,
    pub nullable: bool,
    /// Raw initializer text, never evaluated
    pub default_value: Option<String>,
    /// Bound recovered from validation code
    pub max_length: Option<u32>,
}

impl FieldSpec {
    pub fn new(name: &str, java_type: &str) -> Self {
        Self {
            name: name.to_string(),
            java_type: java_type.to_string(),
            nullable: false,
            default_value: None,
            max_length: None,
        }
    }

    /// Builder pattern: mark nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder pattern: set the raw default value
    pub fn with_default(mut self, default_value: Option<&str>) -> Self {
        self.default_value = default_value.map(|s| s.trim().to_string());
        self
    }

    /// Over-the-wire representation of the declared type.
    ///
    /// Unknown tokens pass through unchanged; they are references to other
    /// extracted records or enums.
    pub fn wire_type(&self) -> String {
        if let Some(wire) = lookup_wire_type(&self.java_type) {
            return wire.to_string();
        }
        let (base, is_array) = split_array_suffix(&self.java_type);
        match lookup_wire_type(base) {
            Some(wire) if is_array => format!("{}{}", wire, ARRAY_SUFFIX),
            _ => self.java_type.clone(),
        }
    }
}

/// Find the field a validation message refers to.
///
/// Names compare case-insensitively; when several fields collide the last one wins.
pub fn find_field_mut<'a>(fields: &'a mut [FieldSpec], name: &str) -> Option<&'a mut FieldSpec> {
    let wanted = name.to_lowercase();
    fields
        .iter_mut()
        .rev()
        .find(|f| f.name.to_lowercase() == wanted)
}

/// A composite data type that is neither a packet nor an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    pub package: String,
    pub category: String,
    pub source_path: String,
    pub fields: Vec<FieldSpec>,
    /// Imported namespaces in declaration order
    pub imports: Vec<String>,
}

impl RecordType {
    pub fn new(name: &str, package: &str, category: &str, source_path: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            category: category.to_string(),
            source_path: source_path.to_string(),
            fields: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// Byte-layout constants declared on a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketLayout {
    pub nullable_bit_field_size: u64,
    pub fixed_block_size: u64,
    pub variable_field_count: u64,
    pub variable_block_start: u64,
    pub max_size: u64,
}

/// A packet schema candidate.
///
/// Only candidates with a wire identifier end up as packets; the rest are
/// turned into records by [`PacketSchema::into_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSchema {
    pub name: String,
    pub package: String,
    pub category: String,
    pub source_path: String,
    /// `None` when no identifier constant was found. Sorting treats it as 0,
    /// which is indistinguishable from a genuine identifier 0.
    pub packet_id: Option<u32>,
    pub is_compressed: bool,
    pub layout: PacketLayout,
    pub fields: Vec<FieldSpec>,
    pub imports: Vec<String>,
}

impl PacketSchema {
    pub fn new(name: &str, package: &str, category: &str, source_path: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            category: category.to_string(),
            source_path: source_path.to_string(),
            packet_id: None,
            is_compressed: false,
            layout: PacketLayout::default(),
            fields: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Packet identifier as `0xNN`, or `N/A`
    pub fn packet_id_hex(&self) -> String {
        match self.packet_id {
            Some(id) => format!("0x{:02X}", id),
            None => "N/A".to_string(),
        }
    }

    /// Ordering key within a category
    pub fn sort_key(&self) -> u32 {
        self.packet_id.unwrap_or(0)
    }

    /// Reclassify as a record, moving fields and imports.
    pub fn into_record(self, source_path: &str) -> RecordType {
        RecordType {
            name: self.name,
            package: self.package,
            category: self.category,
            source_path: source_path.to_string(),
            fields: self.fields,
            imports: self.imports,
        }
    }
}

/// What a field type refers to in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef<'a> {
    Enum(&'a EnumType),
    Record(&'a RecordType),
    /// Primitive or a type that was never extracted
    Unresolved,
}

/// The reconciled protocol model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolModel {
    /// Packets per category, ascending by wire identifier
    pub packets_by_category: BTreeMap<String, Vec<PacketSchema>>,
    /// Every enum, keyed by name
    pub enums: BTreeMap<String, EnumType>,
    /// Every record, keyed by name
    pub records: BTreeMap<String, RecordType>,
}

impl ProtocolModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of packets across categories
    pub fn total_packets(&self) -> usize {
        self.packets_by_category.values().map(Vec::len).sum()
    }

    /// Number of packet categories
    pub fn category_count(&self) -> usize {
        self.packets_by_category.len()
    }

    /// Resolve a declared type against enums first, then records.
    /// Array suffixes are ignored.
    pub fn resolve_type(&self, java_type: &str) -> TypeRef<'_> {
        let base = java_type.trim_end_matches(ARRAY_SUFFIX);
        if let Some(e) = self.enums.get(base) {
            TypeRef::Enum(e)
        } else if let Some(r) = self.records.get(base) {
            TypeRef::Record(r)
        } else {
            TypeRef::Unresolved
        }
    }

    /// Look up a packet by name across all categories
    pub fn find_packet(&self, name: &str) -> Option<&PacketSchema> {
        self.packets_by_category
            .values()
            .flat_map(|packets| packets.iter())
            .find(|p| p.name == name)
    }
}
