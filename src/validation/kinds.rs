use geo::{Geometry, Polygon};
use geozero::{ToGeo, wkt::Wkt};
use std::path::{Path, PathBuf};
use uuid::{Uuid, Variant};

/// Semantic type a parameter value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Guid,
    PositiveInteger,
    JsonBlob,
    FilesystemPath,
    WktPolygon,
    NonEmptyString,
    Opaque,
}

/// A parameter value after it passed its type check.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Guid(Uuid),
    PositiveInteger(u64),
    Json(serde_json::Value),
    Path(PathBuf),
    Polygon(Polygon<f64>),
    Text(String),
    Opaque(String),
}

impl TypedValue {
    /// Filesystem location carried by the value, for the kinds that can name one.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TypedValue::Path(path) => Some(path),
            TypedValue::Text(text) | TypedValue::Opaque(text) => Some(Path::new(text)),
            _ => None,
        }
    }
}

type ParseFn = fn(&str) -> Option<TypedValue>;

impl TypeKind {
    fn parser(self) -> ParseFn {
        match self {
            TypeKind::Guid => parse_guid,
            TypeKind::PositiveInteger => parse_positive_integer,
            TypeKind::JsonBlob => parse_json,
            TypeKind::FilesystemPath => parse_path,
            TypeKind::WktPolygon => parse_wkt_polygon,
            TypeKind::NonEmptyString => parse_non_empty,
            TypeKind::Opaque => |value| Some(TypedValue::Opaque(value.to_string())),
        }
    }

    /// Parse `value` as this kind, returning `None` when it does not qualify.
    pub fn parse(self, value: &str) -> Option<TypedValue> {
        (self.parser())(value)
    }

    /// Human-readable rejection message for `value` supplied as `name`.
    pub fn failure_message(self, name: &str, value: &str) -> String {
        match self {
            TypeKind::Guid => format!("Value for parameter {} is not a valid GUID: {}", name, value),
            TypeKind::PositiveInteger => format!(
                "Value for parameter {} is not a valid positive integer: {}",
                name, value
            ),
            TypeKind::JsonBlob => {
                format!("Value for parameter {} is not valid JSON: {}", name, value)
            }
            TypeKind::FilesystemPath => {
                format!("Value for parameter {} is not a valid path: {}", name, value)
            }
            TypeKind::WktPolygon => format!(
                "Value for parameter {} is not a valid WKT polygon: {}",
                name, value
            ),
            TypeKind::NonEmptyString => format!("Value for parameter {} is null or empty", name),
            TypeKind::Opaque => format!("Value for parameter {} is invalid: {}", name, value),
        }
    }
}

/// Check one raw value against one semantic type.
pub fn validate(kind: TypeKind, value: &str) -> bool {
    kind.parse(value).is_some()
}

fn parse_guid(value: &str) -> Option<TypedValue> {
    let uuid = Uuid::parse_str(value).ok()?;

    // Only the canonical lowercase hyphenated v4 spelling round-trips
    let canonical = uuid.get_version_num() == 4
        && uuid.get_variant() == Variant::RFC4122
        && uuid.hyphenated().to_string() == value;

    canonical.then_some(TypedValue::Guid(uuid))
}

fn parse_positive_integer(value: &str) -> Option<TypedValue> {
    match value.trim().parse::<u64>() {
        Ok(number) if number > 0 => Some(TypedValue::PositiveInteger(number)),
        _ => None,
    }
}

fn parse_json(value: &str) -> Option<TypedValue> {
    serde_json::from_str(value).ok().map(TypedValue::Json)
}

#[cfg(windows)]
const MAX_PATH_LENGTH: usize = 260;

#[cfg(target_os = "macos")]
const MAX_PATH_LENGTH: usize = 1024;

#[cfg(not(any(windows, target_os = "macos")))]
const MAX_PATH_LENGTH: usize = 4096;

fn parse_path(value: &str) -> Option<TypedValue> {
    if value.is_empty() || value.len() > MAX_PATH_LENGTH {
        return None;
    }

    if value.chars().any(char::is_control) || has_reserved_characters(value) {
        return None;
    }

    Some(TypedValue::Path(PathBuf::from(value)))
}

#[cfg(windows)]
fn has_reserved_characters(value: &str) -> bool {
    // A drive letter is the only place a colon may appear
    let rest = match value.as_bytes() {
        [drive, b':', ..] if drive.is_ascii_alphabetic() => &value[2..],
        _ => value,
    };

    rest.chars()
        .any(|c| matches!(c, '<' | '>' | '"' | '|' | '?' | '*' | ':'))
}

#[cfg(not(windows))]
fn has_reserved_characters(_value: &str) -> bool {
    false
}

fn parse_wkt_polygon(value: &str) -> Option<TypedValue> {
    match Wkt(value).to_geo() {
        Ok(Geometry::Polygon(polygon)) => Some(TypedValue::Polygon(polygon)),
        _ => None,
    }
}

fn parse_non_empty(value: &str) -> Option<TypedValue> {
    (!value.is_empty()).then(|| TypedValue::Text(value.to_string()))
}
