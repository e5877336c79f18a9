//! Markdown wiki renderer
//!
//! Every page for one version is prefixed `Version-<version>-`. Rendering is
//! split from writing: the `render_*` methods return page text and
//! [`WikiWriter::write_all`] puts them on disk together with the root index
//! pages from [`crate::formats::versions`].

use crate::core::config::WikiConfig;
use crate::core::error::{Result, ResultExt};
use crate::core::models::{
    EnumType, FieldSpec, PacketSchema, ProtocolModel, RecordType, TypeRef, ARRAY_SUFFIX,
};
use crate::formats::versions::VersionIndex;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Title-case a word the way wiki headings expect: a letter is upper-cased
/// when it follows a non-letter, lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Heading text for a category directory name
pub fn display_name(category: &str) -> String {
    title_case(&category.replace('_', ""))
}

/// Human-readable byte size with decimal units
pub fn format_size(size: u64) -> String {
    let size_f = size as f64;
    if size >= 1_000_000_000 {
        format!("{:.1} GB", size_f / 1_000_000_000.0)
    } else if size >= 1_000_000 {
        format!("{:.1} MB", size_f / 1_000_000.0)
    } else if size >= 1_000 {
        format!("{:.1} KB", size_f / 1_000.0)
    } else {
        format!("{} bytes", size)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Group key for the reference pages: first segment of the source path
fn group_key(source_path: &str, category: &str) -> String {
    match source_path.split('/').next() {
        Some(first) if !source_path.is_empty() => first.to_string(),
        _ => category.to_string(),
    }
}

/// Writes the pages of one protocol version
#[derive(Debug, Clone)]
pub struct WikiWriter {
    output_dir: PathBuf,
    version: String,
    config: WikiConfig,
}

impl WikiWriter {
    pub fn new(output_dir: impl Into<PathBuf>, version: &str, config: &WikiConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            version: version.to_string(),
            config: config.clone(),
        }
    }

    /// Version-prefixed page name
    pub fn page_name(&self, page: &str) -> String {
        format!("Version-{}-{}", self.version, page)
    }

    /// Link target for a declared type, or the raw type in backticks
    pub fn type_link(&self, java_type: &str, model: &ProtocolModel) -> String {
        let (name, page) = match model.resolve_type(java_type) {
            TypeRef::Enum(e) => (&e.name, "Enums"),
            TypeRef::Record(r) => (&r.name, "Data-Types"),
            TypeRef::Unresolved => return format!("`{}`", java_type),
        };
        let suffix = if java_type.ends_with(ARRAY_SUFFIX) { ARRAY_SUFFIX } else { "" };
        format!("[{}]({}#{}){}", name, self.page_name(page), name.to_lowercase(), suffix)
    }

    fn back_to_home(&self) -> [String; 2] {
        ["---".to_string(), format!("[Back to Home]({})", self.page_name("Home"))]
    }

    pub fn render_version_home(&self, model: &ProtocolModel) -> String {
        let mut lines = vec![
            format!("# {} Protocol - Version {}", self.config.project_name, self.version),
            String::new(),
            format!(
                "This documentation describes the network packets for version `{}`.",
                self.version
            ),
            String::new(),
            "## Overview".to_string(),
            String::new(),
            "| Metric | Count |".to_string(),
            "|--------|-------|".to_string(),
            format!("| Total Packets | {} |", model.total_packets()),
            format!("| Categories | {} |", model.category_count()),
            format!("| Enum Types | {} |", model.enums.len()),
            format!("| Data Types | {} |", model.records.len()),
            String::new(),
            "## Categories".to_string(),
            String::new(),
        ];

        for (category, packets) in &model.packets_by_category {
            lines.push(format!(
                "- [{}]({}) ({} packets) - {}",
                display_name(category),
                self.page_name(category),
                packets.len(),
                self.config.category_description(category)
            ));
        }

        lines.extend([
            String::new(),
            "## Reference".to_string(),
            String::new(),
            format!("- [Enum Types]({})", self.page_name("Enums")),
            format!("- [Data Types]({})", self.page_name("Data-Types")),
            String::new(),
            "---".to_string(),
            "[All Versions](Home)".to_string(),
        ]);
        lines.join("\n")
    }

    pub fn render_category(&self, category: &str, packets: &[PacketSchema], model: &ProtocolModel) -> String {
        let mut lines = vec![
            format!("# {} Packets", display_name(category)),
            String::new(),
            format!("**Version:** {}", self.version),
            String::new(),
            format!("This category contains {} packet(s).", packets.len()),
            String::new(),
            "## Packet Index".to_string(),
            String::new(),
            "| ID | Name | Compressed | Max Size |".to_string(),
            "|----|------|------------|----------|".to_string(),
        ];

        for packet in packets {
            lines.push(format!(
                "| `{}` | [{}](#{}) | {} | {} |",
                packet.packet_id_hex(),
                packet.name,
                packet.name.to_lowercase(),
                yes_no(packet.is_compressed),
                format_size(packet.layout.max_size)
            ));
        }
        lines.push(String::new());

        for packet in packets {
            lines.extend(self.packet_section(packet, model));
        }

        lines.extend(self.back_to_home());
        lines.join("\n")
    }

    fn packet_section(&self, packet: &PacketSchema, model: &ProtocolModel) -> Vec<String> {
        let decimal_id = packet
            .packet_id
            .map_or_else(|| "N/A".to_string(), |id| id.to_string());
        let mut lines = vec![
            "---".to_string(),
            String::new(),
            format!("## {}", packet.name),
            String::new(),
            "| Property | Value |".to_string(),
            "|----------|-------|".to_string(),
            format!("| Packet ID | `{}` ({}) |", packet.packet_id_hex(), decimal_id),
            format!("| Compressed | {} |", yes_no(packet.is_compressed)),
            format!("| Fixed Block Size | {} bytes |", packet.layout.fixed_block_size),
            format!("| Variable Field Count | {} |", packet.layout.variable_field_count),
            format!("| Max Size | {} |", format_size(packet.layout.max_size)),
        ];

        if packet.layout.nullable_bit_field_size > 0 {
            lines.push(format!(
                "| Nullable Bit Field | {} byte(s) |",
                packet.layout.nullable_bit_field_size
            ));
        }

        if !packet.fields.is_empty() {
            lines.extend([
                String::new(),
                "### Fields".to_string(),
                String::new(),
                "| Name | Type | Nullable | Max Length |".to_string(),
                "|------|------|----------|------------|".to_string(),
            ]);
            for field in &packet.fields {
                lines.push(format!(
                    "| `{}` | {} | {} | {} |",
                    field.name,
                    self.type_link(&field.java_type, model),
                    yes_no(field.nullable),
                    max_length_cell(field)
                ));
            }
        }

        for field in &packet.fields {
            let enum_type = match model.resolve_type(&field.java_type) {
                TypeRef::Enum(e) if !e.values.is_empty() => e,
                _ => continue,
            };
            lines.extend([
                String::new(),
                format!("**{}** enum values:", field.name),
                String::new(),
            ]);
            for value in &enum_type.values {
                lines.push(format!("- `{}` = {}", value.value, value.name));
            }
        }

        lines.push(String::new());
        lines
    }

    pub fn render_enums(&self, model: &ProtocolModel) -> String {
        let mut lines = vec![
            "# Enum Types".to_string(),
            String::new(),
            format!("**Version:** {}", self.version),
            String::new(),
            "This page documents all enum types used in the protocol.".to_string(),
            String::new(),
        ];

        let mut groups: BTreeMap<String, Vec<&EnumType>> = BTreeMap::new();
        for e in model.enums.values() {
            groups.entry(group_key(&e.source_path, &e.category)).or_default().push(e);
        }

        for (group, mut enums) in groups {
            enums.sort_by(|a, b| a.name.cmp(&b.name));
            lines.extend([format!("## {}", display_name(&group)), String::new()]);

            for e in enums {
                lines.extend([format!("### {}", e.name), String::new()]);
                if !e.source_path.is_empty() {
                    lines.push(format!("*Source: `protocol/{}`*", e.source_path));
                    lines.push(String::new());
                }
                if e.values.is_empty() {
                    lines.push("*No values extracted*".to_string());
                } else {
                    lines.push("| Value | Name |".to_string());
                    lines.push("|-------|------|".to_string());
                    for value in &e.values {
                        lines.push(format!("| {} | `{}` |", value.value, value.name));
                    }
                }
                lines.push(String::new());
            }
        }

        lines.extend(self.back_to_home());
        lines.join("\n")
    }

    pub fn render_data_types(&self, model: &ProtocolModel) -> String {
        let mut lines = vec![
            "# Data Types".to_string(),
            String::new(),
            format!("**Version:** {}", self.version),
            String::new(),
            "This page documents composite data types used in packets.".to_string(),
            String::new(),
        ];

        let mut groups: BTreeMap<String, Vec<&RecordType>> = BTreeMap::new();
        for r in model.records.values() {
            groups.entry(group_key(&r.source_path, &r.category)).or_default().push(r);
        }

        for (group, mut records) in groups {
            records.sort_by(|a, b| a.name.cmp(&b.name));
            lines.extend([format!("## {}", display_name(&group)), String::new()]);

            for r in records {
                lines.extend([format!("### {}", r.name), String::new()]);
                if !r.source_path.is_empty() {
                    lines.push(format!("*Source: `protocol/{}`*", r.source_path));
                    lines.push(String::new());
                }
                if r.fields.is_empty() {
                    lines.push("*No fields documented*".to_string());
                } else {
                    lines.push("| Field | Type | Nullable |".to_string());
                    lines.push("|-------|------|----------|".to_string());
                    for field in &r.fields {
                        lines.push(format!(
                            "| `{}` | {} | {} |",
                            field.name,
                            self.type_link(&field.java_type, model),
                            yes_no(field.nullable)
                        ));
                    }
                }
                lines.push(String::new());
            }
        }

        lines.extend(self.back_to_home());
        lines.join("\n")
    }

    pub fn render_sidebar(&self, model: &ProtocolModel) -> String {
        let mut lines = vec![
            format!("**Version {}**", self.version),
            String::new(),
            format!("[Home]({})", self.page_name("Home")),
            String::new(),
            "**Categories**".to_string(),
        ];

        for category in model.packets_by_category.keys() {
            lines.push(format!("- [{}]({})", display_name(category), self.page_name(category)));
        }

        lines.extend([
            String::new(),
            "**Reference**".to_string(),
            format!("- [Enums]({})", self.page_name("Enums")),
            format!("- [Data Types]({})", self.page_name("Data-Types")),
            String::new(),
            "---".to_string(),
            "[All Versions](Home)".to_string(),
        ]);
        lines.join("\n")
    }

    /// Write a page named `<name>.md` into the output directory
    pub fn write_page(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.md", name));
        fs::write(&path, content).context(format!("writing {}", path.display()))?;
        info!("Generated: {}.md", name);
        Ok(path)
    }

    /// Write every page for this version, then refresh the root index pages
    pub fn write_all(&self, model: &ProtocolModel) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("creating {}", self.output_dir.display()))?;

        let mut written = vec![self.write_page(&self.page_name("Home"), &self.render_version_home(model))?];
        for (category, packets) in &model.packets_by_category {
            written.push(self.write_page(
                &self.page_name(category),
                &self.render_category(category, packets, model),
            )?);
        }
        written.push(self.write_page(&self.page_name("Enums"), &self.render_enums(model))?);
        written.push(self.write_page(&self.page_name("Data-Types"), &self.render_data_types(model))?);
        written.push(self.write_page(&self.page_name("_Sidebar"), &self.render_sidebar(model))?);

        let home_versions = VersionIndex::collect(&self.output_dir, "Home.md", &self.version)?;
        written.push(self.write_page("Home", &home_versions.render_home(&self.config.project_name))?);

        let sidebar_versions = VersionIndex::collect(&self.output_dir, "_Sidebar.md", &self.version)?;
        written.push(self.write_page(
            "_Sidebar",
            &sidebar_versions.render_sidebar(self.config.sidebar_version_limit),
        )?);

        Ok(written)
    }
}

fn max_length_cell(field: &FieldSpec) -> String {
    match field.max_length {
        Some(n) if n > 0 => n.to_string(),
        _ => "-".to_string(),
    }
}
