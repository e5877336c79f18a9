//! Root version index
//!
//! The root `Home.md` and `_Sidebar.md` list every documented version. Known
//! versions come from the `Version-*-Home.md` pages already in the output
//! directory, the links in the existing root page, and the version being
//! generated now.

use crate::core::error::{Result, ResultExt};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

lazy_static! {
    static ref VERSION_LINK_PATTERN: Regex =
        Regex::new(r"(?m)^\s*-\s*\[([^\]]+)\]\(Version-[^\)]+\)").unwrap();
}

const HOME_PREFIX: &str = "Version-";
const HOME_SUFFIX: &str = "-Home.md";

/// Version label from a version home page file name
pub fn version_from_file_name(file_name: &str) -> Option<&str> {
    file_name.strip_prefix(HOME_PREFIX)?.strip_suffix(HOME_SUFFIX)
}

/// Version labels linked from an index page
pub fn linked_versions(content: &str) -> Vec<&str> {
    VERSION_LINK_PATTERN
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Set of known versions, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionIndex {
    versions: BTreeSet<String>,
}

impl VersionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: &str) {
        self.versions.insert(version.to_string());
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions in descending string order
    pub fn descending(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().rev().map(String::as_str)
    }

    /// Gather versions from `output_dir`, merging the links of `index_page`
    /// and the current version.
    pub fn collect(output_dir: &Path, index_page: &str, current: &str) -> Result<Self> {
        let mut index = Self::new();

        let entries = fs::read_dir(output_dir).context(format!("listing {}", output_dir.display()))?;
        for entry in entries {
            let entry = entry.context(format!("listing {}", output_dir.display()))?;
            let file_name = entry.file_name();
            if let Some(version) = file_name.to_str().and_then(version_from_file_name) {
                index.insert(version);
            }
        }

        let index_path = output_dir.join(index_page);
        if index_path.is_file() {
            match fs::read_to_string(&index_path) {
                Ok(content) => {
                    let linked = linked_versions(&content);
                    debug!("Found {} existing versions in {}", linked.len(), index_page);
                    for version in linked {
                        index.insert(version);
                    }
                }
                Err(e) => warn!("Could not parse existing {}: {}", index_page, e),
            }
        }

        index.insert(current);
        Ok(index)
    }

    pub fn render_home(&self, project_name: &str) -> String {
        let mut lines = vec![
            format!("# {} Protocol Documentation", project_name),
            String::new(),
            format!("Welcome to the {} network protocol documentation.", project_name),
            String::new(),
            "## Available Versions".to_string(),
            String::new(),
        ];

        if self.is_empty() {
            lines.push("*No versions documented yet*".to_string());
        } else {
            lines.extend(self.descending().map(version_link));
        }

        lines.extend([
            String::new(),
            "---".to_string(),
            "*Documentation generated from decompiled packet sources.*".to_string(),
        ]);
        lines.join("\n")
    }

    /// Sidebar with at most `limit` versions
    pub fn render_sidebar(&self, limit: usize) -> String {
        let mut lines = vec![
            "**[Home](Home)**".to_string(),
            String::new(),
            "**Versions**".to_string(),
        ];
        lines.extend(self.descending().take(limit).map(version_link));
        if self.len() > limit {
            lines.push(format!("- *...and {} more*", self.len() - limit));
        }
        lines.join("\n")
    }
}

fn version_link(version: &str) -> String {
    format!("- [{}](Version-{}-Home)", version, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_version_from_file_name() {
        assert_eq!(version_from_file_name("Version-1.0.0-Home.md"), Some("1.0.0"));
        assert_eq!(version_from_file_name("Version-beta-1-Home.md"), Some("beta-1"));
        assert_eq!(version_from_file_name("Version-1.0.0-Enums.md"), None);
        assert_eq!(version_from_file_name("Version-Home.md"), None);
        assert_eq!(version_from_file_name("Home.md"), None);
    }

    #[test]
    fn test_linked_versions() {
        let content = "# Docs\n\n- [2.0](Version-2.0-Home)\n  - [beta-1](Version-beta-1-Home)\n- [Other](Somewhere)\nText - [x](Version-x-Home)";
        assert_eq!(linked_versions(content), vec!["2.0", "beta-1"]);
    }

    #[test]
    fn test_collect_merges_sources() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Version-1.0-Home.md"), "").unwrap();
        fs::write(dir.path().join("Version-1.0-Enums.md"), "").unwrap();
        fs::write(dir.path().join("Home.md"), "- [0.9](Version-0.9-Home)").unwrap();

        let index = VersionIndex::collect(dir.path(), "Home.md", "1.1").unwrap();
        let versions: Vec<_> = index.descending().collect();
        assert_eq!(versions, vec!["1.1", "1.0", "0.9"]);
    }

    #[test]
    fn test_collect_uses_only_named_index_page() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Home.md"), "- [0.9](Version-0.9-Home)").unwrap();
        fs::write(dir.path().join("_Sidebar.md"), "- [0.8](Version-0.8-Home)").unwrap();

        let index = VersionIndex::collect(dir.path(), "_Sidebar.md", "1.0").unwrap();
        let versions: Vec<_> = index.descending().collect();
        assert_eq!(versions, vec!["1.0", "0.8"]);
    }

    #[test]
    fn test_render_home() {
        let mut index = VersionIndex::new();
        index.insert("1.0");
        index.insert("2.0");
        let page = index.render_home("Hytale");
        assert!(page.starts_with("# Hytale Protocol Documentation"));
        assert!(page.contains("- [2.0](Version-2.0-Home)\n- [1.0](Version-1.0-Home)"));
        assert!(page.ends_with("*Documentation generated from decompiled packet sources.*"));

        assert!(VersionIndex::new().render_home("Hytale").contains("*No versions documented yet*"));
    }

    #[test]
    fn test_render_sidebar_limit() {
        let mut index = VersionIndex::new();
        for i in 0..12 {
            index.insert(&format!("v{:02}", i));
        }
        let page = index.render_sidebar(10);
        assert!(page.contains("- [v11](Version-v11-Home)"));
        assert!(page.contains("- [v02](Version-v02-Home)"));
        assert!(!page.contains("[v01]"));
        assert!(page.ends_with("- *...and 2 more*"));
    }
}
