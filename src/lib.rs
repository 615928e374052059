#![doc = "choromap: interactive choropleth rendering and drill-down engine"]
mod config;
mod error;
mod geom;
mod io;
mod keyboard;
mod layer;
mod orchestrator;
mod provider;
mod scale;
mod source;
mod tooltip;
mod types;
mod view;

#[doc(inline)]
pub use config::MapConfig;

#[doc(inline)]
pub use error::MapError;

#[doc(inline)]
pub use geom::{Projection, ScreenPath, Viewport};

#[doc(inline)]
pub use io::svg::Rgb;

#[doc(inline)]
pub use keyboard::{Key, KeyEventTarget, KeyListenerGuard, ListenerId};

#[doc(inline)]
pub use layer::{Capabilities, FeatureLayer, LayerStyle, MetricLabel, PointerEvent, Shape};

#[doc(inline)]
pub use orchestrator::{MapOrchestrator, MetricAccumulator};

#[cfg(feature = "http")]
#[doc(inline)]
pub use provider::HttpMetricProvider;

#[doc(inline)]
pub use provider::{MetricProvider, StaticMetricProvider};

#[doc(inline)]
pub use scale::{ColorScale, ColorScaleBuilder, Palette, ScaleShape, EMPHASIS_BREAK};

#[doc(inline)]
pub use source::{GeoJsonSource, GeometrySource};

#[doc(inline)]
pub use tooltip::{TooltipController, TooltipState};

#[doc(inline)]
pub use types::{GeoFeature, GeoId, GeoType, GeometrySet, MetricValue};

#[doc(inline)]
pub use view::{TransitionConfig, ViewTransform, ViewTransformController};

// Re-exported for callers building geometry and pointer positions.
pub use geo;
