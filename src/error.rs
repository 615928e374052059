use thiserror::Error;

/// Errors raised by the rendering and navigation engine.
///
/// Metric fetch failures never appear here: a provider error is folded into
/// an "unavailable" metric by the orchestrator.
#[derive(Debug, Error)]
pub enum MapError {
    /// The geometry source could not produce a usable feature set. Fatal.
    #[error("failed to load geometry: {0}")]
    GeometryLoad(String),

    /// There is no state geometry to fit the projection to.
    #[error("no state geometry to fit into the viewport")]
    EmptyGeometry,

    /// A feature's screen bounds cannot produce a finite zoom transform.
    #[error("degenerate bounds for {geo_id}: {width}x{height}")]
    DegenerateBounds { geo_id: String, width: f64, height: f64 },

    /// Transition settings that would break the `[1, 8]` zoom bounds.
    #[error("invalid transition config: {0}")]
    InvalidTransition(String),

    /// A configured color is not a `#rrggbb` string.
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
