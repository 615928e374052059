use std::time::Duration;

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{geom::Viewport, types::GeoId, MapError};

use super::ViewTransform;

/// Timing and fit parameters for drill transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: u64,
    /// Share of the viewport a selected state fills.
    pub fit_fraction: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: 750, fit_fraction: 0.9, min_scale: 1.0, max_scale: 8.0 }
    }
}

impl TransitionConfig {
    /// Hard zoom bounds; configured bounds must lie within them.
    pub const SCALE_LIMITS: (f64, f64) = (1.0, 8.0);

    pub fn duration(&self) -> Duration { Duration::from_millis(self.duration_ms) }

    /// Require `1 <= min_scale <= max_scale <= 8` and `0 < fit_fraction <= 1`.
    pub fn validate(&self) -> Result<(), MapError> {
        let (floor, ceiling) = Self::SCALE_LIMITS;
        let invalid = |reason: String| Err(MapError::InvalidTransition(reason));

        // NaN fails every comparison below.
        if !(self.min_scale >= floor && self.max_scale <= ceiling) {
            return invalid(format!(
                "scale bounds [{}, {}] must lie within [{floor}, {ceiling}]",
                self.min_scale, self.max_scale,
            ));
        }
        if self.min_scale > self.max_scale {
            return invalid(format!("min_scale {} exceeds max_scale {}", self.min_scale, self.max_scale));
        }
        if !(self.fit_fraction > 0.0 && self.fit_fraction <= 1.0) {
            return invalid(format!("fit_fraction {} must be in (0, 1]", self.fit_fraction));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: ViewTransform,
    to: ViewTransform,
    started: Duration,
}

/// Owns the pan/zoom transform and the drill level.
///
/// `NATIONAL`: no drill state, settling at identity.
/// `ZOOMED(id)`: drilled into `id`, settling at the transform fitting that state.
///
/// Click and reset paths update both together; manual gestures move only the
/// transform. Time is supplied by the host through [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct ViewTransformController {
    viewport: Viewport,
    config: TransitionConfig,
    drill: Option<GeoId>,
    current: ViewTransform,
    tween: Option<Tween>,
    now: Duration,
}

impl ViewTransformController {
    /// Fails when `config` does not pass [`TransitionConfig::validate`].
    pub fn new(viewport: Viewport, config: TransitionConfig) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self {
            viewport,
            config,
            drill: None,
            current: ViewTransform::IDENTITY,
            tween: None,
            now: Duration::ZERO,
        })
    }

    /// Current (possibly mid-animation) transform.
    pub fn transform(&self) -> ViewTransform { self.current }

    /// Transform the view is settling towards.
    pub fn target(&self) -> ViewTransform {
        self.tween.map_or(self.current, |tween| tween.to)
    }

    /// `None` in the national view, otherwise the drilled state.
    pub fn drill_state(&self) -> Option<&GeoId> { self.drill.as_ref() }

    pub fn is_zoomed(&self) -> bool { self.drill.is_some() }

    pub fn is_animating(&self) -> bool { self.tween.is_some() }

    /// Drill into `id`, whose screen-space bounds are `bounds`.
    /// Returns false when already drilled into `id` (nothing restarts).
    pub fn select_state(&mut self, id: &GeoId, bounds: Option<Rect<f64>>) -> bool {
        if self.drill.as_ref() == Some(id) { return false }

        let target = self.fit_bounds(id, bounds).unwrap_or_else(|err| {
            warn!(geo_id = %id, %err, "falling back to identity transform");
            ViewTransform::IDENTITY
        });

        debug!(geo_id = %id, scale = target.scale(), "drilling into state");
        self.drill = Some(id.clone());
        self.animate_to(target);
        true
    }

    /// Return to the national view. No-op when already there at identity.
    pub fn reset(&mut self) -> bool {
        if self.drill.is_none() && self.target().is_identity() { return false }

        debug!("resetting to national view");
        self.drill = None;
        self.animate_to(ViewTransform::IDENTITY);
        true
    }

    /// Drag: translate by a screen-space delta. Interrupts any transition.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.tween = None;
        let t = self.current;
        self.current = ViewTransform::new(t.translate_x() + dx, t.translate_y() + dy, t.scale());
    }

    /// Scroll/pinch: scale by `factor` keeping the screen point `anchor` fixed.
    /// Interrupts any transition.
    pub fn zoom_by(&mut self, factor: f64, anchor: Coord<f64>) {
        if !factor.is_finite() || factor <= 0.0 { return }

        self.tween = None;
        let t = self.current;
        let scale = self.clamp_scale(t.scale() * factor);
        let pinned = t.invert(anchor);
        self.current = ViewTransform::new(anchor.x - scale * pinned.x, anchor.y - scale * pinned.y, scale);
    }

    /// Move the clock to `now` and step any running transition.
    /// Returns true while a transition is still running.
    pub fn advance(&mut self, now: Duration) -> bool {
        self.now = self.now.max(now);

        if let Some(tween) = self.tween {
            let elapsed = self.now.saturating_sub(tween.started);
            let duration = self.config.duration();
            if elapsed >= duration {
                self.current = tween.to;
                self.tween = None;
            } else {
                let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                self.current = tween.from.lerp(&tween.to, ease_cubic_in_out(t));
            }
        }

        self.is_animating()
    }

    /// Start (or restart) a transition from the in-flight value towards `target`.
    fn animate_to(&mut self, target: ViewTransform) {
        if self.target() == target { return }

        if self.config.duration().is_zero() {
            self.current = target;
            self.tween = None;
        } else {
            self.tween = Some(Tween { from: self.current, to: target, started: self.now });
        }
    }

    /// Fit `bounds` into the viewport with margin, centered on its center.
    fn fit_bounds(&self, id: &GeoId, bounds: Option<Rect<f64>>) -> Result<ViewTransform, MapError> {
        let degenerate = |width: f64, height: f64| MapError::DegenerateBounds {
            geo_id: id.to_string(),
            width,
            height,
        };

        let bounds = bounds.ok_or_else(|| degenerate(0.0, 0.0))?;
        let (dx, dy) = (bounds.width(), bounds.height());
        let extent = (dx / self.viewport.width).max(dy / self.viewport.height);
        if !extent.is_finite() || extent <= 0.0 { return Err(degenerate(dx, dy)) }

        let scale = self.clamp_scale(self.config.fit_fraction / extent);
        let center = bounds.center();
        let view_center = self.viewport.center();

        Ok(ViewTransform::new(view_center.x - scale * center.x, view_center.y - scale * center.y, scale))
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 { 4.0 * t * t * t } else { 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0 }
}
