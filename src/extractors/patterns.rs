//! Lexical matchers
//!
//! One precompiled pattern per syntactic fragment. Every matcher is a pure
//! function of the raw source text: it returns zero or more non-overlapping
//! matches and never fails. Unrecognized text simply produces no match.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref PACKAGE_PATTERN: Regex = Regex::new(r"package\s+([\w.]+);").unwrap();
    static ref IMPORT_PATTERN: Regex = Regex::new(r"import\s+([\w.]+);").unwrap();
    static ref PACKET_CLASS_PATTERN: Regex =
        Regex::new(r"public\s+class\s+(\w+)\s+implements\s+Packet").unwrap();
    static ref ENUM_PATTERN: Regex = Regex::new(r"public\s+enum\s+(\w+)\s*\{").unwrap();
    static ref ENUM_VALUE_PATTERN: Regex = Regex::new(r"(\w+)\s*\(\s*(-?\d+)\s*\)").unwrap();
    static ref DATA_CLASS_PATTERN: Regex =
        Regex::new(r"public\s+class\s+(\w+)\s*(?:extends\s+\w+\s*)?\{").unwrap();
    static ref CONSTANT_PATTERN: Regex =
        Regex::new(r"public\s+static\s+final\s+(int|boolean)\s+(\w+)\s*=\s*([^;\s]+)\s*;").unwrap();
    static ref FIELD_PATTERN: Regex = Regex::new(
        r"(@Nullable\s+|@Nonnull\s+)?public\s+(\w+(?:<[\w<>, ]+>)?(?:\[\])?)\s+(\w+)(?:\s*=\s*([^;]+))?;"
    )
    .unwrap();
    static ref STRING_MAX_LENGTH_PATTERN: Regex =
        Regex::new(r#"stringTooLong\s*\(\s*"(\w+)"\s*,\s*\w+\s*,\s*(\d+)\s*\)"#).unwrap();
    static ref ARRAY_MAX_LENGTH_PATTERN: Regex =
        Regex::new(r#"arrayTooLong\s*\(\s*"(\w+)"\s*,\s*\w+\s*,\s*(\d+)\s*\)"#).unwrap();
}

/// A matched type header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch<'t> {
    pub name: &'t str,
    /// Byte offset just past the header
    pub end: usize,
}

/// Static constants with a recognized meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKey {
    PacketId,
    IsCompressed,
    NullableBitFieldSize,
    FixedBlockSize,
    VariableFieldCount,
    VariableBlockStart,
    MaxSize,
}

impl ConstantKey {
    /// Map a declared constant name to its key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PACKET_ID" => Some(ConstantKey::PacketId),
            "IS_COMPRESSED" => Some(ConstantKey::IsCompressed),
            "NULLABLE_BIT_FIELD_SIZE" => Some(ConstantKey::NullableBitFieldSize),
            "FIXED_BLOCK_SIZE" => Some(ConstantKey::FixedBlockSize),
            "VARIABLE_FIELD_COUNT" => Some(ConstantKey::VariableFieldCount),
            "VARIABLE_BLOCK_START" => Some(ConstantKey::VariableBlockStart),
            "MAX_SIZE" => Some(ConstantKey::MaxSize),
            _ => None,
        }
    }

    /// Declared type the constant must carry
    pub fn declared_type(&self) -> &'static str {
        match self {
            ConstantKey::IsCompressed => "boolean",
            _ => "int",
        }
    }
}

/// Parsed value of a recognized constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantValue {
    Int(u64),
    Bool(bool),
}

/// A recognized static constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantMatch {
    pub key: ConstantKey,
    pub value: ConstantValue,
}

/// A public instance field declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch<'t> {
    pub annotation: Option<&'t str>,
    pub java_type: &'t str,
    pub name: &'t str,
    pub initializer: Option<&'t str>,
}

impl FieldMatch<'_> {
    pub fn is_nullable(&self) -> bool {
        self.annotation.is_some_and(|a| a.contains("@Nullable"))
    }
}

/// A length bound embedded in a validation message literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBound<'t> {
    pub field: &'t str,
    pub bound: u32,
}

/// Declared namespace (first `package` statement)
pub fn package(text: &str) -> Option<&str> {
    PACKAGE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Imported namespaces in order
pub fn imports(text: &str) -> Vec<&str> {
    IMPORT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Class header carrying the `Packet` capability
pub fn packet_class(text: &str) -> Option<HeaderMatch<'_>> {
    header(&PACKET_CLASS_PATTERN, text)
}

/// Enum header (`public enum Name {`)
pub fn enum_header(text: &str) -> Option<HeaderMatch<'_>> {
    header(&ENUM_PATTERN, text)
}

/// Generic class header, no capability required
pub fn data_class(text: &str) -> Option<HeaderMatch<'_>> {
    header(&DATA_CLASS_PATTERN, text)
}

fn header<'t>(pattern: &Regex, text: &'t str) -> Option<HeaderMatch<'t>> {
    let caps = pattern.captures(text)?;
    let name = caps.get(1)?.as_str();
    let end = caps.get(0)?.end();
    Some(HeaderMatch { name, end })
}

/// Enum members `NAME(int)` in order. Out-of-range literals are skipped.
pub fn enum_members(body: &str) -> Vec<(&str, i64)> {
    ENUM_VALUE_PATTERN
        .captures_iter(body)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let literal = caps.get(2)?.as_str();
            match literal.parse::<i64>() {
                Ok(value) => Some((name, value)),
                Err(_) => {
                    debug!("Skipping enum member {} with malformed value {}", name, literal);
                    None
                }
            }
        })
        .collect()
}

/// Recognized static constants in order of appearance.
///
/// Constants with an unknown name, a mismatched declared type, or a literal
/// that does not parse are dropped individually.
pub fn constants(text: &str) -> Vec<ConstantMatch> {
    CONSTANT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let declared = caps.get(1)?.as_str();
            let name = caps.get(2)?.as_str();
            let literal = caps.get(3)?.as_str();
            let key = ConstantKey::from_name(name)?;
            if key.declared_type() != declared {
                return None;
            }
            let value = match key {
                ConstantKey::IsCompressed => match literal {
                    "true" => ConstantValue::Bool(true),
                    "false" => ConstantValue::Bool(false),
                    _ => return None,
                },
                _ => match literal.parse::<u64>() {
                    Ok(v) => ConstantValue::Int(v),
                    Err(_) => {
                        debug!("Ignoring constant {} with malformed literal {}", name, literal);
                        return None;
                    }
                },
            };
            Some(ConstantMatch { key, value })
        })
        .collect()
}

/// Public instance field declarations in order
pub fn fields(text: &str) -> Vec<FieldMatch<'_>> {
    FIELD_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let java_type = caps.get(2)?.as_str();
            // no look-around in the regex crate, so static members are rejected here
            if java_type == "static" {
                return None;
            }
            Some(FieldMatch {
                annotation: caps.get(1).map(|m| m.as_str()),
                java_type,
                name: caps.get(3)?.as_str(),
                initializer: caps.get(4).map(|m| m.as_str()),
            })
        })
        .collect()
}

/// Length bounds from `stringTooLong(...)` then `arrayTooLong(...)`
pub fn length_bounds(text: &str) -> Vec<LengthBound<'_>> {
    let mut bounds = bounds_for(&STRING_MAX_LENGTH_PATTERN, text);
    bounds.extend(bounds_for(&ARRAY_MAX_LENGTH_PATTERN, text));
    bounds
}

fn bounds_for<'t>(pattern: &Regex, text: &'t str) -> Vec<LengthBound<'t>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let field = caps.get(1)?.as_str();
            let bound = caps.get(2)?.as_str().parse::<u32>().ok()?;
            Some(LengthBound { field, bound })
        })
        .collect()
}
