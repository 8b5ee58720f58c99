//! Hero overlay styling.
//!
//! The text block above the planet fades, blurs and shrinks while the camera
//! flies out. [`OverlayStyle`] is the animated value; an [`OverlaySink`]
//! applies it to whatever the host displays.

/// Visual state of the hero overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub opacity: f32,
    pub blur_px: f32,
    pub scale: f32,
}

impl OverlayStyle {
    pub const VISIBLE: OverlayStyle = OverlayStyle {
        opacity: 1.0,
        blur_px: 0.0,
        scale: 1.0,
    };

    pub const HIDDEN: OverlayStyle = OverlayStyle {
        opacity: 0.0,
        blur_px: 40.0,
        scale: 0.5,
    };

    /// Fully transparent overlays are also taken out of hit testing.
    pub fn visible(&self) -> bool {
        self.opacity > 0.0
    }

    #[cfg(target_arch = "wasm32")]
    fn css(&self) -> [(&'static str, String); 4] {
        [
            ("opacity", format!("{}", self.opacity)),
            (
                "visibility",
                if self.visible() { "inherit" } else { "hidden" }.to_string(),
            ),
            ("filter", format!("blur({}px)", self.blur_px)),
            ("transform", format!("scale({})", self.scale)),
        ]
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

pub trait OverlaySink {
    fn apply(&mut self, style: &OverlayStyle);
}

/// Overlay sink of the native window, which has no overlay to draw. Style
/// changes are traced instead.
#[derive(Debug, Default)]
pub struct LoggedOverlay {
    hidden: bool,
}

impl OverlaySink for LoggedOverlay {
    fn apply(&mut self, style: &OverlayStyle) {
        log::trace!("overlay {:?}", style);
        if self.hidden == style.visible() {
            self.hidden = !style.visible();
            log::info!(
                "hero overlay {}",
                if self.hidden { "hidden" } else { "shown" }
            );
        }
    }
}

/// Writes the overlay style into an element's inline CSS.
#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
pub struct DomOverlay {
    element: web_sys::HtmlElement,
}

#[cfg(target_arch = "wasm32")]
impl DomOverlay {
    /// Look up the overlay element. A page without one gets no overlay
    /// animation, which is logged but not an error.
    pub fn find(document: &web_sys::Document, selector: &str) -> Option<Self> {
        use wasm_bindgen::JsCast;

        match document.query_selector(selector) {
            Ok(Some(element)) => element
                .dyn_into::<web_sys::HtmlElement>()
                .ok()
                .map(|element| Self { element }),
            Ok(None) => {
                log::warn!("no overlay element matches {:?}", selector);
                None
            }
            Err(e) => {
                log::error!("invalid overlay selector {:?}: {:?}", selector, e);
                None
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl OverlaySink for DomOverlay {
    fn apply(&mut self, style: &OverlayStyle) {
        let declaration = self.element.style();
        for (property, value) in style.css() {
            if let Err(e) = declaration.set_property(property, &value) {
                log::error!("cannot set overlay {}: {:?}", property, e);
            }
        }
    }
}
