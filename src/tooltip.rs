/// What an external tooltip view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub content: String,
    pub x: f64,
    pub y: f64,
}

/// Hover tooltip state, decoupled from rendering.
///
/// Content and position are always set together, so content never shows
/// without a position.
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    state: Option<TooltipState>,
}

impl TooltipController {
    pub fn new() -> Self { Self::default() }

    pub fn show(&mut self, content: impl Into<String>, x: f64, y: f64) {
        self.state = Some(TooltipState { content: content.into(), x, y });
    }

    /// Reposition a visible tooltip; ignored while hidden.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if let Some(state) = self.state.as_mut() {
            state.x = x;
            state.y = y;
        }
    }

    /// Clear the tooltip. Returns false if nothing was showing.
    pub fn hide(&mut self) -> bool {
        self.state.take().is_some()
    }

    pub fn state(&self) -> Option<&TooltipState> { self.state.as_ref() }

    pub fn is_visible(&self) -> bool { self.state.is_some() }
}
