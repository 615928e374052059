/// Geographic level a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoType {
    State,      // National view
    County,     // County -> State (by id prefix)
}

impl GeoType {
    /// Level name, also the CSS class of its SVG shapes.
    pub fn to_str(&self) -> &'static str {
        match self {
            GeoType::State => "state",
            GeoType::County => "county",
        }
    }
}
