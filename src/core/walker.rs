//! Directory traversal and unit classification for protowiki
//!
//! Two independent passes over disjoint subtrees of the protocol root:
//!
//! - Pass A (support types): every source unit outside the top-level packets
//!   directory, at any depth. Category is the first path segment.
//! - Pass B (packets): the source units directly inside each category
//!   directory under the packets root. No deeper recursion.
//!
//! Entries are visited in file-name order so overwrite semantics downstream
//! are reproducible.

use crate::core::config::WikiConfig;
use crate::core::error::{Result, WikiError};
use crate::extractors::UnitHints;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[cfg(test)]
use mockall::automock;

/// Normalize path separators for cross-platform compatibility.
/// - Converts Windows backslashes to forward slashes
/// - Strips Windows UNC prefix `\\?\` if present
pub fn normalize_path_separators(path: &str) -> String {
    let mut normalized = path.to_string();

    // Strip Windows UNC prefix (\\?\ or \\.\)
    if normalized.starts_with(r"\\?\") || normalized.starts_with(r"\\.\") {
        normalized = normalized[4..].to_string();
    }

    normalized.replace('\\', "/")
}

/// Normalize a relative directory: forward slashes, no empty or `.` segments
pub fn normalize_relative(path: &str) -> String {
    normalize_path_separators(path)
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Category of a support type: first segment of its directory, or the root marker
pub fn support_category(relative_dir: &str, root_marker: &str) -> String {
    let normalized = normalize_relative(relative_dir);
    match normalized.split('/').next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => root_marker.to_string(),
    }
}

/// Source path recorded for packet-local types
pub fn packet_source_path(packets_dir: &str, category: &str) -> String {
    format!("{}/{}", packets_dir, category)
}

/// One source unit located by a pass; content is read when it is extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path on disk
    pub path: PathBuf,
    pub hints: UnitHints,
}

/// Units located by one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkBatch {
    pub units: Vec<SourceUnit>,
    /// Entries that could not be walked or classified
    pub skipped: usize,
}

/// Trait for protocol tree walking
///
/// This trait allows for mocking in tests and alternative implementations
/// (e.g., in-memory source trees).
#[cfg_attr(test, automock)]
pub trait SourceWalker: Send + Sync {
    /// Pass A: support units outside the packets subtree
    fn support_units(&self, root: &Path, config: &WikiConfig) -> Result<WalkBatch>;

    /// Pass B: packet units, one directory level below the packets root
    fn packet_units(&self, root: &Path, config: &WikiConfig) -> Result<WalkBatch>;

    /// Read the content of one located unit
    fn read_unit(&self, path: &Path) -> Result<String>;
}

/// Default walker backed by `walkdir`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWalker;

impl DefaultWalker {
    /// Create a new DefaultWalker
    pub fn new() -> Self {
        Self
    }

    fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(extension)
    }

    fn is_top_level_packets_dir(entry: &DirEntry, packets_dir: &str) -> bool {
        entry.depth() == 1 && entry.file_type().is_dir() && entry.file_name() == packets_dir
    }

    /// Packet category: name of the directory holding the unit
    fn packet_category(path: &Path) -> Option<&str> {
        path.parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
    }
}

impl SourceWalker for DefaultWalker {
    fn support_units(&self, root: &Path, config: &WikiConfig) -> Result<WalkBatch> {
        if !root.is_dir() {
            return Err(WikiError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut batch = WalkBatch::default();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_top_level_packets_dir(e, &config.packets_dir));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error walking {}: {}", root.display(), e);
                    batch.skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !Self::has_extension(entry.path(), &config.source_extension) {
                continue;
            }

            let relative_dir = entry
                .path()
                .parent()
                .and_then(|parent| parent.strip_prefix(root).ok())
                .map(|rel| normalize_relative(&rel.to_string_lossy()))
                .unwrap_or_default();
            let category = support_category(&relative_dir, &config.root_category);

            batch.units.push(SourceUnit {
                path: entry.into_path(),
                hints: UnitHints::support(&category, &relative_dir),
            });
        }

        debug!("Pass A found {} units under {}", batch.units.len(), root.display());
        Ok(batch)
    }

    fn packet_units(&self, root: &Path, config: &WikiConfig) -> Result<WalkBatch> {
        let packets_root = root.join(&config.packets_dir);
        if !packets_root.is_dir() {
            return Err(WikiError::PacketsDirNotFound { path: packets_root });
        }

        let mut batch = WalkBatch::default();
        let walker = WalkDir::new(&packets_root)
            .follow_links(false)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error walking {}: {}", packets_root.display(), e);
                    batch.skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !Self::has_extension(entry.path(), &config.source_extension) {
                continue;
            }

            let category = match Self::packet_category(entry.path()) {
                Some(name) => name.to_string(),
                None => {
                    warn!(
                        "Skipping {}: packet category is not valid UTF-8",
                        entry.path().display()
                    );
                    batch.skipped += 1;
                    continue;
                }
            };
            let source_path = packet_source_path(&config.packets_dir, &category);

            batch.units.push(SourceUnit {
                path: entry.into_path(),
                hints: UnitHints::packet(&category, &source_path),
            });
        }

        debug!("Pass B found {} units under {}", batch.units.len(), packets_root.display());
        Ok(batch)
    }

    fn read_unit(&self, path: &Path) -> Result<String> {
        read_source(path)
    }
}

/// Read a source unit as UTF-8 with normalized line endings
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    Ok(text.replace("\r\n", "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::UnitKind;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn protocol_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Root.java", "public enum Root { A(1); }");
        write(root, "notes.txt", "not source");
        write(root, "common/Vec3.java", "public class Vec3 {");
        write(root, "common/deep/nested/Mode.java", "public enum Mode { X(0); }");
        write(root, "packets/auth/Login.java", "public class Login implements Packet {");
        write(root, "packets/auth/Status.java", "public enum Status { OK(0); }");
        write(root, "packets/auth/inner/Hidden.java", "public class Hidden implements Packet {");
        write(root, "packets/world/Chunk.java", "public class Chunk implements Packet {");
        write(root, "packets/Loose.java", "public class Loose implements Packet {");
        write(root, "other/packets/NotSkipped.java", "public class NotSkipped {");
        dir
    }

    #[test]
    fn test_normalize_path_separators_backslashes() {
        assert_eq!(normalize_path_separators(r"src\main.java"), "src/main.java");
        assert_eq!(normalize_path_separators(r"a\b\c\d"), "a/b/c/d");
    }

    #[test]
    fn test_normalize_path_separators_unc_prefix() {
        assert_eq!(
            normalize_path_separators(r"\\?\C:\protocol\common"),
            "C:/protocol/common"
        );
        assert_eq!(normalize_path_separators(r"\\.\device"), "device");
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize_relative("./common//types/"), "common/types");
        assert_eq!(normalize_relative(r"common\types"), "common/types");
        assert_eq!(normalize_relative(""), "");
        assert_eq!(normalize_relative("."), "");
    }

    #[test]
    fn test_support_category() {
        assert_eq!(support_category("common/types/math", "root"), "common");
        assert_eq!(support_category("entities", "root"), "entities");
        assert_eq!(support_category("", "root"), "root");
        assert_eq!(support_category("./", "base"), "base");
        assert_eq!(support_category(r"world\chunk", "root"), "world");
    }

    #[test]
    fn test_packet_source_path() {
        assert_eq!(packet_source_path("packets", "auth"), "packets/auth");
    }

    #[test]
    fn test_support_units_skip_packets_subtree() {
        let dir = protocol_tree();
        let batch = DefaultWalker::new()
            .support_units(dir.path(), &WikiConfig::default())
            .unwrap();

        let names: Vec<_> = batch
            .units
            .iter()
            .map(|u| u.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Root.java", "Vec3.java", "Mode.java", "NotSkipped.java"]);
        assert!(batch.units.iter().all(|u| u.hints.kind == UnitKind::Support));
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_support_units_categories() {
        let dir = protocol_tree();
        let batch = DefaultWalker::new()
            .support_units(dir.path(), &WikiConfig::default())
            .unwrap();

        let find = |name: &str| {
            batch
                .units
                .iter()
                .find(|u| u.path.ends_with(name))
                .map(|u| u.hints.clone())
                .unwrap()
        };
        assert_eq!(find("Root.java"), UnitHints::support("root", ""));
        assert_eq!(find("Vec3.java"), UnitHints::support("common", "common"));
        assert_eq!(find("Mode.java"), UnitHints::support("common", "common/deep/nested"));
        assert_eq!(find("NotSkipped.java"), UnitHints::support("other", "other/packets"));
    }

    #[test]
    fn test_packet_units_one_level_only() {
        let dir = protocol_tree();
        let batch = DefaultWalker::new()
            .packet_units(dir.path(), &WikiConfig::default())
            .unwrap();

        let found: Vec<_> = batch
            .units
            .iter()
            .map(|u| {
                (
                    u.path.file_name().unwrap().to_string_lossy().to_string(),
                    u.hints.category.clone(),
                    u.hints.source_path.clone(),
                )
            })
            .collect();
        assert_eq!(
            found,
            vec![
                ("Login.java".to_string(), "auth".to_string(), "packets/auth".to_string()),
                ("Status.java".to_string(), "auth".to_string(), "packets/auth".to_string()),
                ("Chunk.java".to_string(), "world".to_string(), "packets/world".to_string()),
            ]
        );
        assert!(batch.units.iter().all(|u| u.hints.kind == UnitKind::Packet));
    }

    #[test]
    fn test_missing_roots() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = DefaultWalker::new()
            .support_units(&missing, &WikiConfig::default())
            .unwrap_err();
        assert!(matches!(err, WikiError::DirectoryNotFound { .. }));

        let err = DefaultWalker::new()
            .packet_units(dir.path(), &WikiConfig::default())
            .unwrap_err();
        assert!(matches!(err, WikiError::PacketsDirNotFound { .. }));
    }

    #[test]
    fn test_units_are_located_without_reading() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("packets/auth")).unwrap();
        fs::write(dir.path().join("packets/auth/Bad.java"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("packets/auth/Good.java"), "public class Good {").unwrap();

        let walker = DefaultWalker::new();
        let batch = walker.packet_units(dir.path(), &WikiConfig::default()).unwrap();
        assert_eq!(batch.units.len(), 2);
        assert_eq!(batch.skipped, 0);

        let err = walker.read_unit(&batch.units[0].path).unwrap_err();
        assert!(matches!(err, WikiError::Utf8Error(_)));
        assert_eq!(walker.read_unit(&batch.units[1].path).unwrap(), "public class Good {");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_category_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let bad = dir
            .path()
            .join("packets")
            .join(OsStr::from_bytes(&[b'c', 0xff]));
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join("Odd.java"), "public class Odd implements Packet {").unwrap();
        write(dir.path(), "packets/auth/Login.java", "public class Login implements Packet {");

        let batch = DefaultWalker::new()
            .packet_units(dir.path(), &WikiConfig::default())
            .unwrap();
        assert_eq!(batch.units.len(), 1);
        assert_eq!(batch.units[0].hints.category, "auth");
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_packet_category() {
        assert_eq!(
            DefaultWalker::packet_category(Path::new("packets/auth/Login.java")),
            Some("auth")
        );
        assert_eq!(DefaultWalker::packet_category(Path::new("Login.java")), None);
    }

    #[test]
    fn test_custom_extension_and_packets_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "msgs/chat/Say.src", "public class Say implements Packet {");
        write(dir.path(), "msgs/chat/Say.java", "public class Ignored implements Packet {");
        let config = WikiConfig {
            packets_dir: "msgs".to_string(),
            source_extension: "src".to_string(),
            ..WikiConfig::default()
        };
        let batch = DefaultWalker::new().packet_units(dir.path(), &config).unwrap();
        assert_eq!(batch.units.len(), 1);
        assert_eq!(batch.units[0].hints.source_path, "msgs/chat");
    }

    #[test]
    fn test_read_source_normalizes_crlf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "a\r\nb").unwrap();
        assert_eq!(read_source(&path).unwrap(), "a\nb");
    }
}
