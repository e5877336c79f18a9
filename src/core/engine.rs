//! Protocol Engine - Main orchestration for protowiki
//!
//! The ProtocolEngine walks a protocol tree, runs the extractor over every
//! source unit and folds the results into a [`ProtocolModel`]. Each unit is
//! read, matched and folded before the next one is read.

use crate::core::config::WikiConfig;
use crate::core::error::{Result, WikiError};
use crate::core::models::ProtocolModel;
use crate::core::reconciler::ModelReconciler;
use crate::core::walker::{DefaultWalker, SourceWalker, WalkBatch};
use crate::extractors::{EntityExtractor, Extracted, JavaExtractor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Totals reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub packets: usize,
    pub categories: usize,
    pub enums: usize,
    pub records: usize,
    /// Units that could not be walked or read
    pub skipped_units: usize,
}

impl RunSummary {
    fn from_model(model: &ProtocolModel, skipped_units: usize) -> Self {
        Self {
            packets: model.total_packets(),
            categories: model.category_count(),
            enums: model.enums.len(),
            records: model.records.len(),
            skipped_units,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets in {} categories, {} enums, {} data types",
            self.packets, self.categories, self.enums, self.records
        )?;
        if self.skipped_units > 0 {
            write!(f, " ({} unreadable units skipped)", self.skipped_units)?;
        }
        Ok(())
    }
}

/// Extraction engine
pub struct ProtocolEngine {
    /// Engine configuration
    config: WikiConfig,
    /// Protocol tree walker
    walker: Box<dyn SourceWalker>,
    /// Source language extractor
    extractor: Box<dyn EntityExtractor>,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    /// Create a new ProtocolEngine with default configuration
    pub fn new() -> Self {
        Self::with_config(WikiConfig::default())
    }

    /// Create a new ProtocolEngine with custom configuration
    pub fn with_config(config: WikiConfig) -> Self {
        let extractor = JavaExtractor::new(&config);
        Self {
            config,
            walker: Box::new(DefaultWalker::new()),
            extractor: Box::new(extractor),
        }
    }

    /// Builder: set a custom walker
    pub fn with_walker(mut self, walker: impl SourceWalker + 'static) -> Self {
        self.walker = Box::new(walker);
        self
    }

    /// Fail before any extraction when a required directory is absent
    pub fn validate_roots(&self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(WikiError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        let packets_root = root.join(&self.config.packets_dir);
        if !packets_root.is_dir() {
            return Err(WikiError::PacketsDirNotFound { path: packets_root });
        }
        Ok(())
    }

    /// Extract the protocol model under `root`
    pub fn extract(&self, root: &Path) -> Result<(ProtocolModel, RunSummary)> {
        self.validate_roots(root)?;
        info!(
            "Extracting {} sources from {}",
            self.extractor.language_name(),
            root.display()
        );

        let mut reconciler = ModelReconciler::new();

        let support = self.walker.support_units(root, &self.config)?;
        let mut skipped = self.fold(support, |entity| reconciler.accept_support(entity));

        let packets = self.walker.packet_units(root, &self.config)?;
        skipped += self.fold(packets, |entity| reconciler.accept_packet(entity));

        let stats = reconciler.stats();
        debug!(
            "{} definitions overwritten, {} entities ignored",
            stats.overwritten, stats.ignored
        );

        let model = reconciler.finish();
        let summary = RunSummary::from_model(&model, skipped);
        info!("Extracted {}", summary);
        Ok((model, summary))
    }

    /// Read, extract and accept each unit in turn; returns the skipped count
    fn fold(&self, batch: WalkBatch, mut accept: impl FnMut(Extracted)) -> usize {
        let mut skipped = batch.skipped;
        for unit in batch.units {
            let content = match self.walker.read_unit(&unit.path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Error reading {}: {}", unit.path.display(), e);
                    skipped += 1;
                    continue;
                }
            };
            match self.extractor.extract(&content, &unit.hints) {
                Some(entity) => {
                    debug!(
                        "{}: {} {}",
                        unit.path.display(),
                        entity.kind_label(),
                        entity.name()
                    );
                    accept(entity);
                }
                None => debug!("{}: no recognizable declaration", unit.path.display()),
            }
        }
        skipped
    }
}
