pub const XML_MEDIA_TYPE: &str = "application/xml";

/// Escape text for use in XML content and attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn service_exception(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.3.0">
  <ServiceException code="{}">{}</ServiceException>
</ServiceExceptionReport>"#,
        escape(code),
        escape(message)
    )
}

/// `GetProjectSettings` answer advertising one atlas print layout.
pub fn project_settings(template_name: &str, coverage_layer: &str) -> String {
    let template_name = escape(template_name);
    let coverage_layer = escape(coverage_layer);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0">
  <Service>
    <Name>WMS</Name>
    <Title>QGIS Server Mock</Title>
  </Service>
  <Capability>
    <ComposerTemplates>
      <ComposerTemplate name="{template_name}" atlasCoverageLayer="{coverage_layer}" width="297" height="210">
        <ComposerMap name="map0" width="277" height="190"/>
      </ComposerTemplate>
    </ComposerTemplates>
    <Layer queryable="1">
      <Name>{coverage_layer}</Name>
      <Title>Coverage Layer</Title>
    </Layer>
  </Capability>
</WMS_Capabilities>"#
    )
}

/// Square footprint of a simulated feature, in EPSG:2056 metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureFootprint {
    pub id: u32,
    pub min_x: f64,
    pub min_y: f64,
    pub size: f64,
}

/// `GetFeature` answer. The plugin reads `/FeatureCollection/featureMember/<layer>/@id`.
pub fn feature_collection(layer: &str, features: &[FeatureFootprint]) -> String {
    let layer = escape(layer);
    let members: Vec<String> = features
        .iter()
        .map(|feature| feature_member(&layer, feature))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2"
                   numberMatched="{count}" numberReturned="{count}">
{members}
</FeatureCollection>"#,
        count = features.len(),
        members = members.join("\n")
    )
}

fn feature_member(layer: &str, feature: &FeatureFootprint) -> String {
    let (x1, y1) = (feature.min_x, feature.min_y);
    let (x2, y2) = (x1 + feature.size, y1 + feature.size);

    format!(
        r#"  <featureMember>
    <{layer} id="{layer}.{id}">
      <gml:boundedBy>
        <gml:Envelope srsName="EPSG:2056">
          <gml:lowerCorner>{x1} {y1}</gml:lowerCorner>
          <gml:upperCorner>{x2} {y2}</gml:upperCorner>
        </gml:Envelope>
      </gml:boundedBy>
      <geometry>
        <gml:Polygon srsName="EPSG:2056">
          <gml:exterior>
            <gml:LinearRing>
              <gml:posList>{x1} {y1} {x2} {y1} {x2} {y2} {x1} {y2} {x1} {y1}</gml:posList>
            </gml:LinearRing>
          </gml:exterior>
        </gml:Polygon>
      </geometry>
    </{layer}>
  </featureMember>"#,
        id = feature.id
    )
}
