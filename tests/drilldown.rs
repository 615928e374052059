use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
    time::Duration,
};

use anyhow::bail;
use async_trait::async_trait;
use futures::{channel::oneshot, executor::block_on};

use choromap::{
    geo::{polygon, Coord, MultiPolygon},
    GeoFeature, GeoId, GeoType, GeometrySet, Key, KeyEventTarget, ListenerId, MapConfig, MapError,
    MapOrchestrator, MetricProvider, PointerEvent, ViewTransform,
};

/// Metric provider whose answers are scripted per feature. Gated features
/// stay in flight until the test releases them.
#[derive(Default)]
struct ScriptedProvider {
    values: HashMap<GeoId, f64>,
    rejected: HashSet<GeoId>,
    gated: HashSet<GeoId>,
    in_flight: RefCell<HashMap<GeoId, oneshot::Sender<f64>>>,
    calls: Cell<usize>,
}

impl ScriptedProvider {
    fn with_values(values: &[(&str, f64)]) -> Self {
        Self {
            values: values.iter().map(|&(id, v)| (GeoId::new(id), v)).collect(),
            ..Self::default()
        }
    }

    fn reject(mut self, id: &str) -> Self {
        self.rejected.insert(GeoId::new(id));
        self
    }

    fn gate(mut self, id: &str) -> Self {
        self.gated.insert(GeoId::new(id));
        self
    }

    fn release(&self, id: &str, value: f64) {
        let sender = self.in_flight.borrow_mut().remove(&GeoId::new(id)).expect("fetch not in flight");
        sender.send(value).expect("receiver dropped");
    }
}

#[async_trait(?Send)]
impl MetricProvider for ScriptedProvider {
    async fn fetch_one(&self, geo_id: &GeoId) -> anyhow::Result<Option<f64>> {
        self.calls.set(self.calls.get() + 1);
        if self.rejected.contains(geo_id) {
            bail!("service unavailable for {geo_id}");
        }
        if self.gated.contains(geo_id) {
            let (sender, receiver) = oneshot::channel();
            self.in_flight.borrow_mut().insert(geo_id.clone(), sender);
            return Ok(Some(receiver.await?));
        }
        Ok(self.values.get(geo_id).copied())
    }
}

/// Records listener registrations like a browser window would.
#[derive(Default)]
struct Window {
    listeners: RefCell<Vec<ListenerId>>,
}

impl KeyEventTarget for Window {
    fn add_key_listener(&self, id: ListenerId) { self.listeners.borrow_mut().push(id) }
    fn remove_key_listener(&self, id: ListenerId) { self.listeners.borrow_mut().retain(|l| *l != id) }
}

fn rect(id: &str, name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> GeoFeature {
    GeoFeature::new(id, name, MultiPolygon(vec![polygon![
        (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1),
    ]]))
}

/// Two states side by side; Alabama split into two counties.
fn geometry() -> GeometrySet {
    GeometrySet {
        states: vec![
            rect("01", "Alabama", 0.0, 0.0, 100.0, 100.0),
            rect("02", "Alaska", 200.0, 0.0, 300.0, 100.0),
        ],
        counties: vec![
            rect("01001", "Autauga", 0.0, 0.0, 50.0, 100.0),
            rect("01003", "Baldwin", 50.0, 0.0, 100.0, 100.0),
            rect("02013", "Aleutians East", 200.0, 0.0, 300.0, 100.0),
        ],
    }
}

fn default_provider() -> ScriptedProvider {
    ScriptedProvider::with_values(&[
        ("01", 45000.0),
        ("02", 65000.0),
        ("01001", 40000.0),
        ("01003", 60000.0),
        ("02013", 52000.0),
    ])
}

fn mounted(provider: &Rc<ScriptedProvider>) -> (MapOrchestrator, Rc<Window>) {
    let window = Rc::new(Window::default());
    let mut map = MapOrchestrator::new(&geometry(), provider.clone(), MapConfig::default()).unwrap();
    map.mount(window.clone());
    (map, window)
}

fn id(id: &str) -> GeoId { GeoId::new(id) }

/// Viewport position of a geographic point under the current transform.
fn screen(map: &MapOrchestrator, x: f64, y: f64) -> Coord<f64> {
    map.transform().apply(map.projection().project(Coord { x, y }))
}

#[test]
fn invalid_transition_bounds_are_rejected_at_construction() {
    let provider = Rc::new(default_provider());
    let mut config = MapConfig::default();
    config.transition.min_scale = 9.0;

    let result = MapOrchestrator::new(&geometry(), provider, config);
    assert!(matches!(result, Err(MapError::InvalidTransition(_))));
}

#[test]
fn state_metrics_color_the_national_view() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    block_on(map.settle());

    let palette = MapConfig::default().palette;
    let states = map.states();
    assert_eq!(states.shape(&id("01")).unwrap().fill(), palette.low);
    assert_eq!(states.shape(&id("02")).unwrap().fill(), palette.high);
    assert_eq!(map.metric(&id("02")).unwrap().value, Some(65000.0));
    assert_eq!(provider.calls.get(), 2);
}

#[test]
fn click_drills_into_state_and_colors_counties() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    block_on(map.settle());

    let inside = screen(&map, 25.0, 50.0);
    map.click_at(inside);
    assert_eq!(map.drill_state(), Some(&id("01")));

    let counties = map.counties().unwrap();
    assert_eq!(counties.len(), 2);
    assert!(!counties.contains(&id("02013")));

    block_on(map.settle());
    let palette = MapConfig::default().palette;
    let counties = map.counties().unwrap();
    let autauga = counties.shape(&id("01001")).unwrap().fill();
    let baldwin = counties.shape(&id("01003")).unwrap().fill();
    assert_ne!(autauga, baldwin);
    assert_eq!(autauga, palette.low);
    assert_eq!(baldwin, palette.high);
    assert_eq!(counties.color_scale().domain(), Some((40000.0, 60000.0)));

    // Only the selected state's counties were fetched.
    assert_eq!(provider.calls.get(), 4);
}

#[test]
fn drill_zooms_to_fit_the_selected_state() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);

    assert!(map.select_state(&id("01")));
    assert!(map.tick(Duration::from_millis(375)));
    let halfway = map.transform().scale();
    assert!(halfway > 1.0);

    map.tick(Duration::from_millis(750));
    let zoomed = map.transform();
    assert!(zoomed.scale() > halfway);
    assert!(zoomed.scale() <= 8.0);

    // The state's center lands on the viewport center.
    let center = screen(&map, 50.0, 50.0);
    assert!((center.x - 640.0).abs() < 1e-6);
    assert!((center.y - 400.0).abs() < 1e-6);
}

#[test]
fn rejected_fetch_paints_no_data() {
    let provider = Rc::new(default_provider().reject("01003"));
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    block_on(map.settle());

    let no_data = MapConfig::default().palette.no_data;
    let counties = map.counties().unwrap();
    assert_eq!(counties.shape(&id("01003")).unwrap().fill(), no_data);
    assert_ne!(counties.shape(&id("01001")).unwrap().fill(), no_data);
    assert_eq!(map.metric(&id("01001")).unwrap().value, Some(40000.0));
    assert!(!map.metric(&id("01003")).unwrap().is_available());

    map.dispatch(GeoType::County, &id("01003"), PointerEvent::Hover(Coord { x: 10.0, y: 10.0 }));
    assert_eq!(map.tooltip().unwrap().content, "Baldwin: Income data not available");
}

#[test]
fn hover_during_fetch_shows_unavailable_until_next_hover() {
    let provider = Rc::new(default_provider().gate("01001"));
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.pump();
    assert_eq!(map.pending_fetches(), 1);

    let autauga = id("01001");
    let at = Coord { x: 100.0, y: 200.0 };
    map.dispatch(GeoType::County, &autauga, PointerEvent::Hover(at));
    let tooltip = map.tooltip().unwrap();
    assert_eq!(tooltip.content, "Autauga: Income data not available");
    assert_eq!((tooltip.x, tooltip.y), (115.0, 215.0));

    // The arriving value recolors but leaves the open tooltip as it was.
    provider.release("01001", 40000.0);
    assert_eq!(map.pump(), 1);
    assert_eq!(map.pending_fetches(), 0);
    assert_eq!(map.tooltip().unwrap().content, "Autauga: Income data not available");
    assert_ne!(map.counties().unwrap().shape(&autauga).unwrap().fill(), MapConfig::default().palette.no_data);

    map.dispatch(GeoType::County, &autauga, PointerEvent::Leave);
    assert!(map.tooltip().is_none());
    map.dispatch(GeoType::County, &autauga, PointerEvent::Hover(at));
    assert_eq!(map.tooltip().unwrap().content, "Autauga: $40,000 per capita income (2020)");
}

#[test]
fn results_for_an_abandoned_state_are_discarded() {
    let provider = Rc::new(default_provider().gate("01001"));
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.pump();

    assert!(map.select_state(&id("02")));
    map.pump();
    let generation = map.metrics(GeoType::County).generation();

    provider.release("01001", 40000.0);
    map.pump();

    let counties = map.counties().unwrap();
    assert!(!counties.contains(&id("01001")));
    assert!(counties.contains(&id("02013")));
    assert!(map.metrics(GeoType::County).get(&id("01001")).is_none());
    assert_eq!(map.metrics(GeoType::County).generation(), generation);
    assert_eq!(map.metric(&id("02013")).unwrap().value, Some(52000.0));
}

#[test]
fn results_arriving_after_reset_are_discarded() {
    let provider = Rc::new(default_provider().gate("01001"));
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.pump();

    assert!(map.handle_key(&Key::Escape));
    provider.release("01001", 40000.0);
    map.pump();

    assert!(map.counties().is_none());
    assert!(map.metrics(GeoType::County).is_empty());
}

#[test]
fn selecting_the_current_state_again_changes_nothing() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    block_on(map.settle());
    assert!(map.select_state(&id("01")));
    block_on(map.settle());
    let calls = provider.calls.get();

    assert!(!map.select_state(&id("01")));
    assert_eq!(map.pending_fetches(), 0);
    assert_eq!(provider.calls.get(), calls);
    assert!(!map.select_state(&id("99")));
}

#[test]
fn escape_at_national_view_is_a_no_op() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    block_on(map.settle());

    assert!(!map.handle_key(&Key::Escape));
    assert!(!map.handle_key(&Key::from_name("Enter")));
    assert_eq!(map.drill_state(), None);
    assert_eq!(map.transform(), ViewTransform::IDENTITY);
    assert!(!map.view().is_animating());
}

#[test]
fn reset_returns_to_identity() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.tick(Duration::from_millis(750));
    assert!(map.view().is_zoomed());

    assert!(map.reset());
    assert_eq!(map.drill_state(), None);
    assert!(map.counties().is_none());
    assert!(map.tick(Duration::from_millis(1000)));
    assert!(!map.tick(Duration::from_millis(1500)));
    assert_eq!(map.transform(), ViewTransform::IDENTITY);
}

#[test]
fn double_click_resets_and_suppresses_default() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("02"));

    assert!(map.double_click());
    assert_eq!(map.drill_state(), None);
    // Still suppressed when there is nothing to reset.
    assert!(map.double_click());
}

#[test]
fn manual_zoom_keeps_drill_state() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.tick(Duration::from_millis(750));
    let fitted = map.transform();

    map.zoom_by(2.0, Coord { x: 640.0, y: 400.0 });
    map.pan_by(10.0, 0.0);
    assert_eq!(map.drill_state(), Some(&id("01")));
    assert_ne!(map.transform(), fitted);

    // A manual pan at the national view still animates home on reset.
    map.reset();
    map.tick(Duration::from_millis(2000));
    map.pan_by(5.0, 5.0);
    assert!(map.reset());
    map.tick(Duration::from_millis(4000));
    assert_eq!(map.transform(), ViewTransform::IDENTITY);
}

#[test]
fn mount_registers_one_listener_and_unmount_removes_it() {
    let provider = Rc::new(default_provider());
    let (mut map, window) = mounted(&provider);
    map.mount(window.clone());
    assert_eq!(window.listeners.borrow().len(), 1);
    assert_eq!(map.pending_fetches(), 2);

    map.pointer_move(screen(&map, 50.0, 50.0));
    assert_eq!(map.states().hovered(), Some(&id("01")));

    map.unmount();
    assert!(window.listeners.borrow().is_empty());
    assert_eq!(map.states().hovered(), None);
    assert_eq!(map.states().shape(&id("01")).unwrap().stroke_width(), 0.3);
    assert!(map.tooltip().is_none());
    assert!(!map.to_svg_string().unwrap().contains("hover\""));
    assert!(!map.is_mounted());
    assert_eq!(map.pending_fetches(), 0);

    map.mount(window.clone());
    assert_eq!(window.listeners.borrow().len(), 1);
    drop(map);
    assert!(window.listeners.borrow().is_empty());
}

#[test]
fn pointer_hit_testing_prefers_counties() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    block_on(map.settle());

    let alaska = screen(&map, 250.0, 50.0);
    map.pointer_move(alaska);
    assert_eq!(map.states().hovered(), Some(&id("02")));
    assert_eq!(map.tooltip().unwrap().content, "Alaska: $65,000 per capita income (2020)");

    // Nothing under the gap between states.
    map.pointer_move(screen(&map, 150.0, 50.0));
    assert!(map.tooltip().is_none());
    assert_eq!(map.states().hovered(), None);

    map.select_state(&id("01"));
    block_on(map.settle());
    map.tick(Duration::from_millis(750));

    let baldwin = screen(&map, 75.0, 50.0);
    map.pointer_move(baldwin);
    assert_eq!(map.counties().unwrap().hovered(), Some(&id("01003")));
    assert_eq!(map.tooltip().unwrap().content, "Baldwin: $60,000 per capita income (2020)");

    let nudged = Coord { x: baldwin.x + 4.0, y: baldwin.y + 2.0 };
    map.pointer_move(nudged);
    let tooltip = map.tooltip().unwrap();
    assert_eq!((tooltip.x, tooltip.y), (nudged.x + 15.0, nudged.y + 15.0));

    map.pointer_leave();
    assert!(map.tooltip().is_none());
    assert_eq!(map.counties().unwrap().hovered(), None);
}

#[test]
fn counties_do_not_drill() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    map.tick(Duration::from_millis(750));

    map.click_at(screen(&map, 25.0, 50.0));
    assert_eq!(map.drill_state(), Some(&id("01")));
    assert_eq!(map.counties().unwrap().len(), 2);
}

#[test]
fn svg_snapshot_contains_both_layers() {
    let provider = Rc::new(default_provider());
    let (mut map, _window) = mounted(&provider);
    map.select_state(&id("01"));
    block_on(map.settle());
    map.tick(Duration::from_millis(750));

    let svg = map.to_svg_string().unwrap();
    assert!(svg.starts_with("<svg") || svg.starts_with("<?xml"));
    assert_eq!(svg.matches(r#"class="state"#).count(), 2);
    assert_eq!(svg.matches(r#"class="county"#).count(), 2);
    assert!(svg.contains(&MapConfig::default().palette.high.to_string()));
    assert!(svg.trim_end().ends_with("</svg>"));
}
