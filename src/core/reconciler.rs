//! Model reconciliation
//!
//! Folds extracted entities into the protocol model. Enum and record
//! registries are last-writer-wins by name; callers feed every support unit
//! before any packet unit so packet-local definitions take precedence.

use crate::core::models::{EnumType, PacketSchema, ProtocolModel, RecordType};
use crate::extractors::Extracted;
use std::collections::BTreeMap;
use tracing::debug;

/// Counters collected while folding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Registry entries replaced by a later definition
    pub overwritten: usize,
    /// Entities with no place in the model
    pub ignored: usize,
}

/// Single owner of the registries while a run is in progress
#[derive(Debug, Default)]
pub struct ModelReconciler {
    packets_by_category: BTreeMap<String, Vec<PacketSchema>>,
    enums: BTreeMap<String, EnumType>,
    records: BTreeMap<String, RecordType>,
    stats: ReconcileStats,
}

impl ModelReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an entity found outside the packets subtree
    pub fn accept_support(&mut self, entity: Extracted) {
        match entity {
            Extracted::Enum(e) => self.insert_enum(e),
            Extracted::Record(r) => self.insert_record(r),
            Extracted::Packet(p) => {
                debug!("Ignoring packet class {} outside packets directory", p.name);
                self.stats.ignored += 1;
            }
        }
    }

    /// Fold an entity found in a packet category directory
    pub fn accept_packet(&mut self, entity: Extracted) {
        match entity {
            Extracted::Enum(e) => self.insert_enum(e),
            Extracted::Record(r) => self.insert_record(r),
            Extracted::Packet(p) if p.packet_id.is_some() => {
                self.packets_by_category
                    .entry(p.category.clone())
                    .or_default()
                    .push(p);
            }
            Extracted::Packet(p) => {
                let source_path = p.source_path.clone();
                debug!("{} has no packet id, recording as data type", p.name);
                self.insert_record(p.into_record(&source_path));
            }
        }
    }

    fn insert_enum(&mut self, e: EnumType) {
        if let Some(previous) = self.enums.get(&e.name) {
            debug!(
                "Enum {} from {} replaces definition from {}",
                e.name, e.source_path, previous.source_path
            );
            self.stats.overwritten += 1;
        }
        self.enums.insert(e.name.clone(), e);
    }

    fn insert_record(&mut self, r: RecordType) {
        if let Some(previous) = self.records.get(&r.name) {
            debug!(
                "Data type {} from {} replaces definition from {}",
                r.name, r.source_path, previous.source_path
            );
            self.stats.overwritten += 1;
        }
        self.records.insert(r.name.clone(), r);
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Order every category by wire identifier and hand over the model
    pub fn finish(mut self) -> ProtocolModel {
        for packets in self.packets_by_category.values_mut() {
            packets.sort_by_key(PacketSchema::sort_key);
        }
        ProtocolModel {
            packets_by_category: self.packets_by_category,
            enums: self.enums,
            records: self.records,
        }
    }
}
