use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use tracing::warn;

use crate::types::GeoFeature;

/// Read features from GeoJSON FeatureCollection bytes.
/// Features without an id or without polygonal geometry are skipped.
pub(crate) fn read_features_from_geojson_bytes(bytes: &[u8]) -> Result<Vec<GeoFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON is not a FeatureCollection (missing \"features\")"))?;

    let mut out = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let Some(id) = feature_id(feature) else {
            warn!(index = idx, "skipping GeoJSON feature without an id");
            continue;
        };

        let boundary = match parse_geometry(&feature["geometry"])
            .with_context(|| format!("Invalid geometry for feature {id}"))?
        {
            Some(boundary) => boundary,
            None => {
                warn!(geo_id = %id, "skipping GeoJSON feature without polygonal geometry");
                continue;
            }
        };

        let name = feature["properties"]["name"].as_str()
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());

        out.push(GeoFeature::new(id, name, boundary));
    }

    Ok(out)
}

/// Feature id from `id` (string or number) or `properties.GEOID`.
fn feature_id(feature: &Value) -> Option<String> {
    let scalar = |value: &Value| match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    scalar(&feature["id"]).or_else(|| scalar(&feature["properties"]["GEOID"]))
}

/// Parse a Polygon or MultiPolygon geometry. Other geometry types yield `None`.
fn parse_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    let coords = match geometry["coordinates"].as_array() {
        Some(coords) => coords,
        None => return Ok(None),
    };

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(MultiPolygon(vec![parse_polygon_coords(coords)?]))),
        Some("MultiPolygon") => {
            let polygons = coords.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse GeoJSON polygon rings: [exterior, hole, hole, ...]
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());

    for pair in coords {
        let pair = pair.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
        let x = pair[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = pair[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "01", "properties": { "name": "Alabama" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10]]] } },
            { "type": "Feature", "id": 2, "properties": {},
              "geometry": { "type": "MultiPolygon", "coordinates": [[[[20,0],[30,0],[30,10],[20,0]]]] } },
            { "type": "Feature", "properties": { "GEOID": "04", "name": "Arizona" },
              "geometry": { "type": "Point", "coordinates": [1, 2] } },
            { "type": "Feature", "properties": { "name": "No id" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]] } }
        ]
    }"#;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let features = read_features_from_geojson_bytes(COLLECTION.as_bytes()).unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].id.as_str(), "01");
        assert_eq!(&*features[0].name, "Alabama");
        // Ring was closed
        assert_eq!(features[0].boundary.0[0].exterior().0.len(), 5);

        // Numeric id, name falls back to id
        assert_eq!(features[1].id.as_str(), "2");
        assert_eq!(&*features[1].name, "2");
    }

    #[test]
    fn rejects_non_collections() {
        assert!(read_features_from_geojson_bytes(br#"{"type":"Feature"}"#).is_err());
        assert!(read_features_from_geojson_bytes(b"not json").is_err());
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let bad = r#"{"features":[{"id":"01","geometry":{"type":"Polygon","coordinates":[[[0,"a"]]]}}]}"#;
        assert!(read_features_from_geojson_bytes(bad.as_bytes()).is_err());
    }
}
