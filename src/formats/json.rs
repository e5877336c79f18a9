//! JSON projection of the protocol model
//!
//! A flat summary of packets and enums for tooling that does not want to
//! scrape Markdown.

use crate::core::error::{Result, ResultExt};
use crate::core::models::{EnumValue, PacketSchema, ProtocolModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub java_type: String,
    pub nullable: bool,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSummary {
    pub name: String,
    pub id: Option<u32>,
    pub id_hex: String,
    pub compressed: bool,
    pub max_size: u64,
    pub field_count: usize,
    pub fields: Vec<FieldSummary>,
}

impl From<&PacketSchema> for PacketSummary {
    fn from(p: &PacketSchema) -> Self {
        Self {
            name: p.name.clone(),
            id: p.packet_id,
            id_hex: p.packet_id_hex(),
            compressed: p.is_compressed,
            max_size: p.layout.max_size,
            field_count: p.fields.len(),
            fields: p
                .fields
                .iter()
                .map(|f| FieldSummary {
                    name: f.name.clone(),
                    java_type: f.java_type.clone(),
                    nullable: f.nullable,
                    max_length: f.max_length,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub packet_count: usize,
    pub packets: Vec<PacketSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSummary {
    pub category: String,
    pub values: Vec<EnumValue>,
}

/// Machine-readable summary of one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub version: String,
    pub categories: BTreeMap<String, CategorySummary>,
    pub enums: BTreeMap<String, EnumSummary>,
}

impl JsonSummary {
    pub fn from_model(model: &ProtocolModel, version: &str) -> Self {
        let categories = model
            .packets_by_category
            .iter()
            .map(|(category, packets)| {
                let summary = CategorySummary {
                    packet_count: packets.len(),
                    packets: packets.iter().map(PacketSummary::from).collect(),
                };
                (category.clone(), summary)
            })
            .collect();

        let enums = model
            .enums
            .iter()
            .map(|(name, e)| {
                let summary = EnumSummary {
                    category: e.category.clone(),
                    values: e.values.clone(),
                };
                (name.clone(), summary)
            })
            .collect();

        Self {
            version: version.to_string(),
            categories,
            enums,
        }
    }

    /// Pretty-printed with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default file name inside the output directory
    pub fn file_name(version: &str) -> String {
        format!("Version-{}-packets.json", version)
    }

    /// Write to `<output_dir>/Version-<version>-packets.json`
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(Self::file_name(&self.version));
        let json = self.to_json_pretty()?;
        fs::write(&path, json).context(format!("writing {}", path.display()))?;
        info!("Generated: {}", Self::file_name(&self.version));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{EnumType, FieldSpec};
    use tempfile::TempDir;

    fn sample_model() -> ProtocolModel {
        let mut model = ProtocolModel::new();
        let mut p = PacketSchema::new("Login", "", "auth", "packets/auth");
        p.packet_id = Some(1);
        p.is_compressed = true;
        p.layout.max_size = 64;
        let mut user = FieldSpec::new("user", "String").with_nullable(true);
        user.max_length = Some(16);
        p.fields.push(user);
        p.fields.push(FieldSpec::new("flags", "int[]"));
        model.packets_by_category.insert("auth".to_string(), vec![p]);

        let mut e = EnumType::new("Status", "", "auth", "packets/auth");
        e.push_value("OK", 0);
        e.push_value("DENIED", -1);
        model.enums.insert("Status".to_string(), e);
        model
    }

    #[test]
    fn test_summary_shape() {
        let summary = JsonSummary::from_model(&sample_model(), "1.0");
        let value: serde_json::Value =
            serde_json::from_str(&summary.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["version"], "1.0");
        let login = &value["categories"]["auth"]["packets"][0];
        assert_eq!(value["categories"]["auth"]["packet_count"], 1);
        assert_eq!(login["id"], 1);
        assert_eq!(login["id_hex"], "0x01");
        assert_eq!(login["compressed"], true);
        assert_eq!(login["field_count"], 2);
        assert_eq!(login["fields"][0]["type"], "String");
        assert_eq!(login["fields"][0]["max_length"], 16);
        assert!(login["fields"][1]["max_length"].is_null());
        assert_eq!(value["enums"]["Status"]["values"][1]["value"], -1);
    }

    #[test]
    fn test_two_space_indent() {
        let json = JsonSummary::from_model(&ProtocolModel::new(), "x")
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\n  \"version\": \"x\""));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let summary = JsonSummary::from_model(&sample_model(), "1.0");
        let path = summary.write_to(dir.path()).unwrap();
        assert!(path.ends_with("Version-1.0-packets.json"));

        let loaded = JsonSummary::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
    }
}
