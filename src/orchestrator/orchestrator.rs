use std::{io::Write, rc::Rc, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use futures::{
    future::LocalBoxFuture,
    stream::{FuturesUnordered, StreamExt},
    FutureExt,
};
use geo::Coord;
use tracing::{debug, info, warn};

use crate::{
    config::MapConfig,
    geom::Projection,
    io::svg::SvgWriter,
    keyboard::{Key, KeyEventTarget, KeyListenerGuard},
    layer::{FeatureLayer, PointerEvent},
    provider::MetricProvider,
    scale::{ColorScale, ColorScaleBuilder},
    source::GeometrySource,
    tooltip::{TooltipController, TooltipState},
    types::{GeoId, GeoType, GeometrySet, MetricValue},
    view::{ViewTransform, ViewTransformController},
    MapError,
};

use super::MetricAccumulator;

/// Result of one metric fetch, tagged with the session it was issued for.
struct FetchOutcome {
    level: GeoType,
    generation: u64,
    geo_id: GeoId,
    result: Result<Option<f64>>,
}

/// The interactive choropleth: national state view drilling into counties.
///
/// Single-threaded. Metric fetches are futures owned by the orchestrator and
/// driven by [`pump`](Self::pump) (non-blocking, once per frame) or
/// [`settle`](Self::settle). Each drill level opens a metric session under a
/// fresh generation token, so results for a level the user already left are
/// dropped on arrival.
pub struct MapOrchestrator {
    config: MapConfig,
    geometry: GeometrySet,
    projection: Projection,
    scales: ColorScaleBuilder,
    year: Arc<str>,

    view: ViewTransformController,
    tooltip: TooltipController,
    states: FeatureLayer,
    counties: Option<FeatureLayer>,
    /// Shape currently under the pointer.
    pointer: Option<(GeoType, GeoId)>,

    generation: u64,
    state_metrics: MetricAccumulator,
    county_metrics: MetricAccumulator,
    provider: Rc<dyn MetricProvider>,
    pending: FuturesUnordered<LocalBoxFuture<'static, FetchOutcome>>,

    key_listener: Option<KeyListenerGuard>,
}

impl MapOrchestrator {
    /// Load geometry and fit the projection. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(
        source: &dyn GeometrySource,
        provider: Rc<dyn MetricProvider>,
        config: MapConfig,
    ) -> Result<Self, MapError> {
        let view = ViewTransformController::new(config.viewport, config.transition.clone())?;
        let geometry = source.load()?;
        let projection = Projection::fit(&geometry.states, config.viewport, config.reflect_y)?;
        let scales = ColorScaleBuilder::new(config.palette.clone());
        let year: Arc<str> = Arc::from(config.label.year.as_str());

        let states = FeatureLayer::mount(
            GeoType::State,
            &geometry.states,
            &projection,
            &config.style,
            ColorScale::no_data(scales.palette()),
        );

        info!(states = geometry.states.len(), counties = geometry.counties.len(), scale = projection.scale(), "map ready");

        Ok(Self {
            view,
            tooltip: TooltipController::new(),
            states,
            counties: None,
            pointer: None,
            generation: 0,
            state_metrics: MetricAccumulator::new(0, year.clone()),
            county_metrics: MetricAccumulator::new(0, year.clone()),
            provider,
            pending: FuturesUnordered::new(),
            key_listener: None,
            config,
            geometry,
            projection,
            scales,
            year,
        })
    }

    /// Register the Escape listener and start fetching state metrics.
    /// Repeated calls while mounted do nothing.
    pub fn mount(&mut self, keys: Rc<dyn KeyEventTarget>) {
        if self.key_listener.is_some() {
            debug!("already mounted");
            return;
        }
        self.key_listener = Some(KeyListenerGuard::register(keys));

        let generation = self.next_generation();
        self.state_metrics = MetricAccumulator::new(generation, self.year.clone());
        let ids = self.states.ids().cloned().collect::<Vec<_>>();
        self.spawn_fetches(GeoType::State, generation, ids);
    }

    /// Release the key listener and drop every session, pending fetches included.
    pub fn unmount(&mut self) {
        if self.key_listener.take().is_none() { return }

        self.reset();
        self.unmount_counties();
        self.states.clear_hover(&mut self.tooltip);
        self.tooltip.hide();
        self.pointer = None;
        self.pending = FuturesUnordered::new();

        let generation = self.next_generation();
        self.state_metrics = MetricAccumulator::new(generation, self.year.clone());
        self.states.recolor(ColorScale::no_data(self.scales.palette()), |_| None);
    }

    pub fn is_mounted(&self) -> bool { self.key_listener.is_some() }

    /// Drill into a state: zoom to it and mount its counties.
    /// Returns false for unknown ids and for the state already shown.
    pub fn select_state(&mut self, id: &GeoId) -> bool {
        if !self.states.contains(id) {
            warn!(geo_id = %id, "ignoring selection of unknown state");
            return false;
        }
        if !self.view.select_state(id, self.states.screen_bounds(id)) { return false }

        self.unmount_counties();
        let generation = self.next_generation();
        self.county_metrics = MetricAccumulator::new(generation, self.year.clone());

        let counties = FeatureLayer::mount(
            GeoType::County,
            self.geometry.counties_of(id),
            &self.projection,
            &self.config.style,
            ColorScale::no_data(self.scales.palette()),
        );
        let ids = counties.ids().cloned().collect::<Vec<_>>();
        debug!(geo_id = %id, counties = ids.len(), generation, "mounted county layer");
        self.counties = Some(counties);
        self.spawn_fetches(GeoType::County, generation, ids);
        true
    }

    /// Back to the national view. Returns false if already there.
    pub fn reset(&mut self) -> bool {
        if !self.view.reset() { return false }

        self.unmount_counties();
        let generation = self.next_generation();
        self.county_metrics = MetricAccumulator::new(generation, self.year.clone());
        true
    }

    /// Keyboard input from the window listener. Escape resets from any state.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Escape => self.reset(),
            Key::Other(_) => false,
        }
    }

    /// Double-click on the canvas resets the view. Returns true: the default
    /// double-click zoom must be suppressed.
    pub fn double_click(&mut self) -> bool {
        self.reset();
        true
    }

    /// Drag gesture; camera only.
    pub fn pan_by(&mut self, dx: f64, dy: f64) { self.view.pan_by(dx, dy) }

    /// Scroll/pinch gesture around a viewport point; camera only.
    pub fn zoom_by(&mut self, factor: f64, anchor: Coord<f64>) { self.view.zoom_by(factor, anchor) }

    /// Route a pointer event to a specific shape.
    pub fn dispatch(&mut self, level: GeoType, id: &GeoId, event: PointerEvent) {
        let label = &self.config.label;
        let (layer, metrics) = match level {
            GeoType::State => (&mut self.states, &self.state_metrics),
            GeoType::County => match self.counties.as_mut() {
                Some(layer) => (layer, &self.county_metrics),
                None => return,
            },
        };

        let drill = layer.dispatch(id, event, &mut self.tooltip, |shape| {
            label.describe(shape.name(), metrics.value(shape.id()))
        });

        if let Some(state) = drill {
            self.select_state(&state);
        }
    }

    /// Pointer moved to a viewport position: resolve the shape beneath it
    /// (counties above states) and emit leave/hover/move as needed.
    pub fn pointer_move(&mut self, at: Coord<f64>) {
        let target = self.shape_at(at);

        if target == self.pointer {
            if let Some((level, id)) = target {
                self.dispatch(level, &id, PointerEvent::Move(at));
            }
            return;
        }

        if let Some((level, id)) = self.pointer.take() {
            self.dispatch(level, &id, PointerEvent::Leave);
        }
        if let Some((level, id)) = target.clone() {
            self.dispatch(level, &id, PointerEvent::Hover(at));
        }
        self.pointer = target;
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        if let Some((level, id)) = self.pointer.take() {
            self.dispatch(level, &id, PointerEvent::Leave);
        }
    }

    /// Click at a viewport position.
    pub fn click_at(&mut self, at: Coord<f64>) {
        if let Some((level, id)) = self.shape_at(at) {
            self.dispatch(level, &id, PointerEvent::Click);
        }
    }

    /// Advance animation to `now` and apply any metrics that arrived.
    /// Returns true while a transition or fetch is still in flight.
    pub fn tick(&mut self, now: Duration) -> bool {
        let animating = self.view.advance(now);
        self.pump();
        animating || !self.pending.is_empty()
    }

    /// Apply every fetch result that is ready, without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(Some(outcome)) = self.pending.next().now_or_never() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next fetch result and apply it. False once nothing is pending.
    pub async fn next_metric(&mut self) -> bool {
        match self.pending.next().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait for every pending fetch, applying results as they arrive.
    pub async fn settle(&mut self) {
        while self.next_metric().await {}
    }

    pub fn pending_fetches(&self) -> usize { self.pending.len() }

    pub fn drill_state(&self) -> Option<&GeoId> { self.view.drill_state() }

    pub fn transform(&self) -> ViewTransform { self.view.transform() }

    pub fn view(&self) -> &ViewTransformController { &self.view }

    pub fn tooltip(&self) -> Option<&TooltipState> { self.tooltip.state() }

    pub fn projection(&self) -> &Projection { &self.projection }

    pub fn states(&self) -> &FeatureLayer { &self.states }

    pub fn counties(&self) -> Option<&FeatureLayer> { self.counties.as_ref() }

    /// Metric known for a feature in the current sessions.
    pub fn metric(&self, id: &GeoId) -> Option<&MetricValue> {
        self.county_metrics.get(id).or_else(|| self.state_metrics.get(id))
    }

    pub fn metrics(&self, level: GeoType) -> &MetricAccumulator {
        match level {
            GeoType::State => &self.state_metrics,
            GeoType::County => &self.county_metrics,
        }
    }

    /// Write the current frame as an SVG document.
    pub fn write_svg<W: Write>(&self, writer: W) -> Result<W> {
        let viewport = self.projection.viewport();
        let transform = self.view.transform();

        let mut svg = SvgWriter::new(writer);
        svg.write_header(viewport.width, viewport.height)?;
        svg.write_styles(self.config.palette.no_data)?;
        svg.open_group(transform.translate_x(), transform.translate_y(), transform.scale())?;
        self.states.write_svg(&mut svg)?;
        if let Some(counties) = &self.counties {
            counties.write_svg(&mut svg)?;
        }
        svg.close_group()?;
        svg.write_footer()?;
        svg.flush()?;
        Ok(svg.into_inner())
    }

    pub fn to_svg_string(&self) -> Result<String> {
        let bytes = self.write_svg(Vec::new())?;
        String::from_utf8(bytes).context("SVG output is not UTF-8")
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn shape_at(&self, at: Coord<f64>) -> Option<(GeoType, GeoId)> {
        let at = self.view.transform().invert(at);
        self.counties.as_ref()
            .and_then(|counties| counties.locate(at))
            .map(|id| (GeoType::County, id.clone()))
            .or_else(|| self.states.locate(at).map(|id| (GeoType::State, id.clone())))
    }

    fn unmount_counties(&mut self) {
        if let Some(counties) = self.counties.take() {
            counties.unmount(&mut self.tooltip);
        }
        if matches!(self.pointer, Some((GeoType::County, _))) {
            self.pointer = None;
        }
    }

    fn spawn_fetches(&mut self, level: GeoType, generation: u64, ids: Vec<GeoId>) {
        for geo_id in ids {
            let provider = Rc::clone(&self.provider);
            self.pending.push(async move {
                let result = provider.fetch_one(&geo_id).await;
                FetchOutcome { level, generation, geo_id, result }
            }.boxed_local());
        }
    }

    /// Fold one fetch result into its session and recolor the layer.
    fn apply(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { level, generation, geo_id, result } = outcome;
        let value = result.unwrap_or_else(|err| {
            debug!(geo_id = %geo_id, error = %format!("{err:#}"), "metric fetch failed; painting as no data");
            None
        });

        match level {
            GeoType::State => {
                if !self.state_metrics.record(generation, geo_id.clone(), value) {
                    debug!(geo_id = %geo_id, generation, "discarding stale state metric");
                    return;
                }
                let scale = self.scales.build(self.state_metrics.values());
                self.states.recolor(scale, |id| self.state_metrics.value(id));
            }
            GeoType::County => {
                let Some(counties) = self.counties.as_mut() else { return };
                if !self.county_metrics.record(generation, geo_id.clone(), value) {
                    debug!(geo_id = %geo_id, generation, "discarding stale county metric");
                    return;
                }
                let scale = self.scales.build(self.county_metrics.values());
                counties.recolor(scale, |id| self.county_metrics.value(id));
            }
        }
    }
}
