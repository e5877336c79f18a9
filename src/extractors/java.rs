//! Extractor for decompiled Java protocol sources
//!
//! Recognition order is fixed: enum header, then a class implementing
//! `Packet`, then any plain class. The first hit decides the entity kind.

use super::patterns::{self, ConstantKey, ConstantValue, HeaderMatch};
use super::{EntityExtractor, Extracted, UnitHints, UnitKind};
use crate::core::config::{EnumBodyScope, WikiConfig};
use crate::core::models::{find_field_mut, EnumType, FieldSpec, PacketSchema, RecordType};
use std::collections::HashSet;
use tracing::debug;

/// Regex-driven Java extractor
#[derive(Debug, Clone)]
pub struct JavaExtractor {
    config: WikiConfig,
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new(&WikiConfig::default())
    }
}

impl JavaExtractor {
    pub fn new(config: &WikiConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Text between the enum header and the end of the member list
    fn enum_body<'t>(&self, content: &'t str, start: usize) -> Option<&'t str> {
        let rest = content.get(start..)?;
        match self.config.enum_body_scope {
            EnumBodyScope::FirstTerminator => rest.find(';').map(|end| &rest[..end]),
            EnumBodyScope::Balanced => {
                let mut parens = 0usize;
                let mut braces = 0usize;
                for (i, c) in rest.char_indices() {
                    match c {
                        '(' => parens += 1,
                        ')' => parens = parens.saturating_sub(1),
                        '{' => braces += 1,
                        '}' if braces == 0 && parens == 0 => return Some(&rest[..i]),
                        '}' => braces = braces.saturating_sub(1),
                        ';' if braces == 0 && parens == 0 => return Some(&rest[..i]),
                        _ => {}
                    }
                }
                None
            }
        }
    }

    fn extract_enum(&self, content: &str, header: HeaderMatch<'_>, package: &str, hints: &UnitHints) -> EnumType {
        let mut enum_type = EnumType::new(header.name, package, &hints.category, &hints.source_path);
        match self.enum_body(content, header.end) {
            Some(body) => {
                for (name, value) in patterns::enum_members(body) {
                    enum_type.push_value(name, value);
                }
            }
            None => debug!("Enum {} has no terminated body", header.name),
        }
        enum_type
    }

    fn extract_packet(&self, content: &str, name: &str, package: &str, hints: &UnitHints) -> PacketSchema {
        let mut packet = PacketSchema::new(name, package, &hints.category, &hints.source_path);
        packet.imports = owned_imports(content);
        apply_constants(content, &mut packet);
        packet.fields = self.extract_fields(content);
        backfill_max_lengths(content, &mut packet.fields);
        packet
    }

    fn extract_record(&self, content: &str, name: &str, package: &str, hints: &UnitHints) -> RecordType {
        let mut record = RecordType::new(name, package, &hints.category, &hints.source_path);
        record.imports = owned_imports(content);
        record.fields = self.extract_fields(content);
        record
    }

    fn extract_fields(&self, content: &str) -> Vec<FieldSpec> {
        patterns::fields(content)
            .into_iter()
            .filter(|m| !self.config.is_ignored_field(m.name))
            .map(|m| {
                FieldSpec::new(m.name, m.java_type)
                    .with_nullable(m.is_nullable())
                    .with_default(m.initializer)
            })
            .collect()
    }
}

fn owned_imports(content: &str) -> Vec<String> {
    patterns::imports(content).into_iter().map(str::to_string).collect()
}

/// First well-formed occurrence of each recognized constant wins
fn apply_constants(content: &str, packet: &mut PacketSchema) {
    let mut seen = HashSet::new();
    for constant in patterns::constants(content) {
        if !seen.insert(constant.key) {
            continue;
        }
        match (constant.key, constant.value) {
            (ConstantKey::IsCompressed, ConstantValue::Bool(b)) => packet.is_compressed = b,
            (ConstantKey::PacketId, ConstantValue::Int(v)) => match u32::try_from(v) {
                Ok(id) => packet.packet_id = Some(id),
                Err(_) => debug!("Packet id {} of {} out of range", v, packet.name),
            },
            (ConstantKey::NullableBitFieldSize, ConstantValue::Int(v)) => packet.layout.nullable_bit_field_size = v,
            (ConstantKey::FixedBlockSize, ConstantValue::Int(v)) => packet.layout.fixed_block_size = v,
            (ConstantKey::VariableFieldCount, ConstantValue::Int(v)) => packet.layout.variable_field_count = v,
            (ConstantKey::VariableBlockStart, ConstantValue::Int(v)) => packet.layout.variable_block_start = v,
            (ConstantKey::MaxSize, ConstantValue::Int(v)) => packet.layout.max_size = v,
            _ => {}
        }
    }
}

/// Set max lengths from validation messages. Never adds fields.
fn backfill_max_lengths(content: &str, fields: &mut [FieldSpec]) {
    for bound in patterns::length_bounds(content) {
        if let Some(field) = find_field_mut(fields, bound.field) {
            field.max_length = Some(bound.bound);
        }
    }
}

impl EntityExtractor for JavaExtractor {
    fn extract(&self, content: &str, hints: &UnitHints) -> Option<Extracted> {
        let package = patterns::package(content).unwrap_or("");

        if let Some(header) = patterns::enum_header(content) {
            return Some(Extracted::Enum(self.extract_enum(content, header, package, hints)));
        }

        if let Some(header) = patterns::packet_class(content) {
            return Some(Extracted::Packet(self.extract_packet(content, header.name, package, hints)));
        }

        let header = patterns::data_class(content)?;
        let extracted = match hints.kind {
            UnitKind::Packet => Extracted::Packet(self.extract_packet(content, header.name, package, hints)),
            UnitKind::Support => Extracted::Record(self.extract_record(content, header.name, package, hints)),
        };
        Some(extracted)
    }

    fn language_name(&self) -> &str {
        "Java"
    }
}
