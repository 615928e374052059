use std::sync::Arc;

use geo::MultiPolygon;

use super::GeoId;

/// An immutable geographic feature: boundary plus display name.
#[derive(Debug, Clone)]
pub struct GeoFeature {
    pub id: GeoId,
    pub name: Arc<str>,
    pub boundary: MultiPolygon<f64>,
}

impl GeoFeature {
    pub fn new(id: impl Into<GeoId>, name: impl AsRef<str>, boundary: MultiPolygon<f64>) -> Self {
        Self { id: id.into(), name: Arc::from(name.as_ref()), boundary }
    }
}

/// Everything a geometry source hands over at mount.
#[derive(Debug, Clone, Default)]
pub struct GeometrySet {
    pub states: Vec<GeoFeature>,
    pub counties: Vec<GeoFeature>,
}

impl GeometrySet {
    /// Counties whose id carries `state` as a prefix.
    pub fn counties_of<'a>(&'a self, state: &'a GeoId) -> impl Iterator<Item = &'a GeoFeature> + 'a {
        self.counties.iter().filter(move |county| county.id.is_within(state))
    }

    pub fn state(&self, id: &GeoId) -> Option<&GeoFeature> {
        self.states.iter().find(|state| &state.id == id)
    }
}
