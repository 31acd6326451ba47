use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structural problem in a GeoJSON Feature parameters document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Root is not an object")]
    NotAnObject,

    #[error("Type is not 'Feature'")]
    NotAFeature,

    #[error("Missing 'geometry' field")]
    MissingGeometry,

    #[error("Invalid geometry structure: {0}")]
    InvalidGeometry(String),

    #[error("Missing 'properties' field")]
    MissingProperties,

    #[error("Properties is not an object")]
    PropertiesNotObject,

    #[error("Missing '{0}' in properties")]
    MissingProperty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }
}

impl FromStr for GeometryKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(GeometryKind::Point),
            "LineString" => Ok(GeometryKind::LineString),
            "Polygon" => Ok(GeometryKind::Polygon),
            "MultiPoint" => Ok(GeometryKind::MultiPoint),
            "MultiLineString" => Ok(GeometryKind::MultiLineString),
            "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
            "GeometryCollection" => Ok(GeometryKind::GeometryCollection),
            other => Err(FeatureError::InvalidGeometry(format!(
                "unsupported type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structurally valid GeoJSON geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureGeometry {
    pub kind: GeometryKind,
    pub value: Value,
}

/// A structurally valid GeoJSON Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonFeature {
    pub geometry: Option<FeatureGeometry>,
    pub properties: Map<String, Value>,
}

impl GeoJsonFeature {
    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.geometry.as_ref().map(|geometry| geometry.kind)
    }

    /// Properties flattened to text for [`RequestParser::parse_mapping`].
    /// Strings are taken verbatim, `null` becomes empty and any other value
    /// is serialized as JSON.
    ///
    /// [`RequestParser::parse_mapping`]: super::RequestParser::parse_mapping
    pub fn property_entries(&self) -> IndexMap<String, String> {
        self.properties
            .iter()
            .map(|(name, value)| (name.clone(), property_text(value)))
            .collect()
    }
}

pub fn property_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Validate `document` as a GeoJSON Feature carrying `required_properties`.
///
/// Checks run in a fixed order and stop at the first failure.
pub fn validate_feature(
    document: &Value,
    required_properties: &[&str],
) -> Result<GeoJsonFeature, FeatureError> {
    let object = document.as_object().ok_or(FeatureError::NotAnObject)?;

    if object.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(FeatureError::NotAFeature);
    }

    let geometry = match object.get("geometry") {
        None => return Err(FeatureError::MissingGeometry),
        Some(Value::Null) => None,
        Some(value) => Some(validate_geometry(value)?),
    };

    let properties = match object.get("properties") {
        None => return Err(FeatureError::MissingProperties),
        Some(Value::Object(properties)) => properties,
        Some(_) => return Err(FeatureError::PropertiesNotObject),
    };

    if let Some(missing) = required_properties
        .iter()
        .find(|name| !properties.contains_key(**name))
    {
        return Err(FeatureError::MissingProperty(missing.to_string()));
    }

    Ok(GeoJsonFeature {
        geometry,
        properties: properties.clone(),
    })
}

fn validate_geometry(value: &Value) -> Result<FeatureGeometry, FeatureError> {
    let object = value
        .as_object()
        .ok_or_else(|| FeatureError::InvalidGeometry("geometry is not an object".to_string()))?;

    let kind: GeometryKind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| FeatureError::InvalidGeometry("missing 'type'".to_string()))?
        .parse()?;

    match kind {
        GeometryKind::GeometryCollection => {
            let members = object
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| FeatureError::InvalidGeometry("missing 'geometries'".to_string()))?;

            for member in members {
                validate_geometry(member)?;
            }
        }
        _ => {
            if object.get("coordinates").is_none_or(Value::is_null) {
                return Err(FeatureError::InvalidGeometry(
                    "missing 'coordinates'".to_string(),
                ));
            }
        }
    }

    Ok(FeatureGeometry {
        kind,
        value: value.clone(),
    })
}
