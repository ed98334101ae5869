// Mapping of the fixed logical canvas onto the physical window.
// Aspect ratio is intentionally not preserved: each display fills its own window.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewportGeometry {
    pub fn compute(window: WindowSize, logical_width: f64, logical_height: f64) -> Self {
        Self {
            scale_x: window.width / logical_width,
            scale_y: window.height / logical_height,
            translate_x: (window.width - logical_width) / 2.0,
            translate_y: (window.height - logical_height) / 2.0,
        }
    }

    /// CSS-style transform string for hosts that position the canvas with a style attribute.
    pub fn css_transform(&self) -> String {
        format!(
            "scale({}, {}) translateX({}px) translateY({}px)",
            self.scale_x, self.scale_y, self.translate_x, self.translate_y
        )
    }
}
