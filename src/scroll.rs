//! Scroll progress of the hero section and the scrub that smooths it.
//!
//! A [`ScrollObserver`] reports how far the page has scrolled through the hero
//! trigger, in `0..=1`. [`Scrub`] turns that raw progress into the timeline
//! playhead, which lags behind and eases into every new scroll position.

use winit::event::{MouseScrollDelta, WindowEvent};

use crate::{
    timeline::{Ease, Interpolate},
    viewport::Viewport,
};

/// Pixels scrolled per wheel line, matching common browser defaults.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Scroll positions at which the trigger starts and finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub start: f32,
    pub end: f32,
}

impl ScrollRange {
    pub fn progress(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.end { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

pub trait ScrollObserver {
    /// Raw progress through the trigger, in `0..=1`.
    fn progress(&mut self) -> f32;

    /// Observers fed by window input override this.
    fn handle_window_event(&mut self, _event: &WindowEvent) {}

    /// Re-measure the trigger after the page layout changed.
    fn resize(&mut self, _viewport: &Viewport) {}

    /// Undo whatever the observer did to the page.
    fn dispose(&mut self) {}
}

/// Virtual scrolling for the native window: mouse-wheel travel over one
/// viewport height moves progress from 0 to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelScroll {
    progress: f32,
    extent: f32,
}

impl WheelScroll {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            progress: 0.0,
            extent: viewport.height(),
        }
    }

    /// Scroll by `pixels`, positive towards the page bottom.
    pub fn scroll_by(&mut self, pixels: f32) {
        self.progress = (self.progress + pixels / self.extent).clamp(0.0, 1.0);
    }
}

impl ScrollObserver for WheelScroll {
    fn progress(&mut self) -> f32 {
        self.progress
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            // wheel deltas point up the page
            let pixels = match delta {
                MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
                MouseScrollDelta::PixelDelta(position) => -position.y as f32,
            };
            self.scroll_by(pixels);
        }
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.extent = viewport.height();
    }
}

/// Where the page scroll sits relative to a pinned trigger's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Before,
    Pinned,
    After,
}

/// Layout of the trigger element, measured at refresh while it is unpinned.
///
/// The trigger starts when its top reaches the viewport top and ends when its
/// bottom does. Coordinates are CSS pixels, `top` in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerBounds {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl TriggerBounds {
    /// `rect_top` and `rect_left` are relative to the viewport while the page
    /// is scrolled to `scroll_y`.
    pub fn measure(rect_top: f32, rect_left: f32, width: f32, height: f32, scroll_y: f32) -> Self {
        Self {
            top: rect_top + scroll_y,
            left: rect_left,
            width,
            height,
        }
    }

    pub fn range(&self) -> ScrollRange {
        ScrollRange {
            start: self.top,
            end: self.top + self.height,
        }
    }

    /// Scroll distance the trigger stays pinned for.
    pub fn duration(&self) -> f32 {
        self.height.max(0.0)
    }

    /// Height of the spacer wrapping the trigger. It keeps the content below
    /// in place while the trigger is taken out of the flow.
    pub fn spacer_height(&self) -> f32 {
        self.height + self.duration()
    }

    pub fn pin_state(&self, scroll_y: f32) -> PinState {
        let range = self.range();
        if scroll_y < range.start {
            PinState::Before
        } else if scroll_y < range.end {
            PinState::Pinned
        } else {
            PinState::After
        }
    }

    /// Inline style of the trigger in `state`. Empty values remove the
    /// property again.
    pub fn pin_css(&self, state: PinState) -> [(&'static str, String); 4] {
        match state {
            PinState::Before => [
                ("position", String::new()),
                ("top", String::new()),
                ("left", String::new()),
                ("width", String::new()),
            ],
            PinState::Pinned => [
                ("position", "fixed".to_string()),
                ("top", "0px".to_string()),
                ("left", format!("{}px", self.left)),
                ("width", format!("{}px", self.width)),
            ],
            PinState::After => [
                ("position", "relative".to_string()),
                ("top", format!("{}px", self.duration())),
                ("left", String::new()),
                ("width", String::new()),
            ],
        }
    }
}

/// Scroll state of a pinned trigger. The bounds are only replaced on
/// refresh, so pinning the element does not feed back into its progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPin {
    bounds: TriggerBounds,
    state: Option<PinState>,
}

impl TriggerPin {
    pub fn new(bounds: TriggerBounds) -> Self {
        Self {
            bounds,
            state: None,
        }
    }

    pub fn bounds(&self) -> &TriggerBounds {
        &self.bounds
    }

    /// Replace the measured bounds. The next update reports its pin state
    /// again.
    pub fn refresh(&mut self, bounds: TriggerBounds) {
        self.bounds = bounds;
        self.state = None;
    }

    /// Progress at `scroll_y`, and the new pin state when it changed.
    pub fn update(&mut self, scroll_y: f32) -> (f32, Option<PinState>) {
        let progress = self.bounds.range().progress(scroll_y);
        let state = self.bounds.pin_state(scroll_y);
        let changed = (self.state != Some(state)).then_some(state);
        self.state = Some(state);
        (progress, changed)
    }
}

/// Page scroll of the browser window through the hero trigger element, which
/// is pinned to the viewport top for the length of its range. Without a
/// trigger element progress stays at 0.
#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
pub struct DomScroll {
    window: web_sys::Window,
    trigger: Option<PinnedElement>,
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
struct PinnedElement {
    element: web_sys::HtmlElement,
    spacer: web_sys::HtmlElement,
    pin: TriggerPin,
}

#[cfg(target_arch = "wasm32")]
impl DomScroll {
    pub fn find(window: web_sys::Window, selector: &str) -> Self {
        use wasm_bindgen::JsCast;

        let element = window
            .document()
            .and_then(|document| document.query_selector(selector).ok().flatten())
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
        let Some(element) = element else {
            log::warn!("no scroll trigger matches {:?}, the camera will not move", selector);
            return Self {
                window,
                trigger: None,
            };
        };
        let trigger = match wrap_in_spacer(&window, &element) {
            Ok(spacer) => {
                let mut trigger = PinnedElement {
                    element,
                    spacer,
                    pin: TriggerPin::new(TriggerBounds::measure(0.0, 0.0, 0.0, 0.0, 0.0)),
                };
                trigger.refresh(scroll_y(&window));
                Some(trigger)
            }
            Err(e) => {
                log::error!("cannot pin the scroll trigger {:?}: {:?}", selector, e);
                None
            }
        };
        Self { window, trigger }
    }

    pub fn range(&self) -> Option<ScrollRange> {
        self.trigger
            .as_ref()
            .map(|trigger| trigger.pin.bounds().range())
    }
}

#[cfg(target_arch = "wasm32")]
fn scroll_y(window: &web_sys::Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

#[cfg(target_arch = "wasm32")]
fn wrap_in_spacer(
    window: &web_sys::Window,
    element: &web_sys::HtmlElement,
) -> Result<web_sys::HtmlElement, wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;

    let document = window
        .document()
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("window has no document"))?;
    let parent = element
        .parent_node()
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("trigger is not attached"))?;
    let spacer = document
        .create_element("div")?
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| wasm_bindgen::JsValue::from_str("spacer is not an HTML element"))?;
    spacer.set_class_name("pin-spacer");
    parent.insert_before(&spacer, Some(element.as_ref()))?;
    spacer.append_child(element)?;
    Ok(spacer)
}

#[cfg(target_arch = "wasm32")]
impl PinnedElement {
    /// Unpin, measure the element in the page flow and pin it again where
    /// `scroll_y` puts it.
    fn refresh(&mut self, scroll_y: f32) {
        self.apply(PinState::Before);
        self.set_style(&self.spacer, "height", String::new());
        let rect = self.element.get_bounding_client_rect();
        let bounds = TriggerBounds::measure(
            rect.top() as f32,
            rect.left() as f32,
            rect.width() as f32,
            rect.height() as f32,
            scroll_y,
        );
        self.set_style(&self.spacer, "height", format!("{}px", bounds.spacer_height()));
        self.pin.refresh(bounds);
        log::debug!(
            "scroll trigger spans {:.0}..{:.0}",
            bounds.range().start,
            bounds.range().end
        );
        self.update(scroll_y);
    }

    fn update(&mut self, scroll_y: f32) -> f32 {
        let (progress, changed) = self.pin.update(scroll_y);
        if let Some(state) = changed {
            self.apply(state);
        }
        progress
    }

    fn apply(&self, state: PinState) {
        for (property, value) in self.pin.bounds().pin_css(state) {
            self.set_style(&self.element, property, value);
        }
    }

    fn set_style(&self, element: &web_sys::HtmlElement, property: &str, value: String) {
        let declaration = element.style();
        let result = if value.is_empty() {
            declaration.remove_property(property).map(|_| ())
        } else {
            declaration.set_property(property, &value)
        };
        if let Err(e) = result {
            log::error!("cannot set scroll trigger {}: {:?}", property, e);
        }
    }

    /// Put the element back where the spacer is and drop the spacer.
    fn unpin(self) {
        self.apply(PinState::Before);
        if let Some(parent) = self.spacer.parent_node() {
            if let Err(e) = parent.replace_child(&self.element, &self.spacer) {
                log::warn!("cannot remove the pin spacer: {:?}", e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScrollObserver for DomScroll {
    fn progress(&mut self) -> f32 {
        let scroll_y = scroll_y(&self.window);
        self.trigger
            .as_mut()
            .map(|trigger| trigger.update(scroll_y))
            .unwrap_or(0.0)
    }

    fn resize(&mut self, _viewport: &Viewport) {
        let scroll_y = scroll_y(&self.window);
        if let Some(trigger) = self.trigger.as_mut() {
            trigger.refresh(scroll_y);
        }
    }

    fn dispose(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            trigger.unpin();
        }
    }
}

/// Smoothed playhead chasing the raw scroll progress.
///
/// Each time the target changes the playhead starts a new `power3.out`
/// catch-up of `lag` seconds from wherever it currently is.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrub {
    lag: f32,
    from: f32,
    target: f32,
    elapsed: f32,
    current: f32,
}

impl Scrub {
    /// A playhead already at `progress`, with nothing to catch up on.
    pub fn new(lag: f32, progress: f32) -> Self {
        Self {
            lag: lag.max(0.0),
            from: progress,
            target: progress,
            elapsed: 0.0,
            current: progress,
        }
    }

    /// Advance by `dt` seconds towards `target` and return the playhead.
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        if self.lag == 0.0 {
            self.from = target;
            self.target = target;
            self.current = target;
            return self.current;
        }
        if target != self.target {
            self.from = self.current;
            self.target = target;
            self.elapsed = 0.0;
        }
        self.elapsed += dt.max(0.0);
        self.current = if self.elapsed >= self.lag {
            self.target
        } else {
            let t = Ease::Power3Out.apply(self.elapsed / self.lag);
            self.from.lerp(&self.target, t)
        };
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
