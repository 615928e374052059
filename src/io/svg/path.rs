use geo::{Coord, CoordsIter, LineString, MultiPolygon};

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, &mut out);
        }
    }

    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, out: &mut String) {
    let mut coords = ring.coords_iter();
    if let Some(Coord { x, y }) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for Coord { x, y } in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
}
