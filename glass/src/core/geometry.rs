use glass_ipc::Bounds;

use super::glass::GlassPhase;

/// Overlay height while the glass bar rests collapsed.
pub const GLASS_HEIGHT: u32 = 16;
/// Overlay height while the glass bar is expanded.
pub const GLASS_OUT_HEIGHT: u32 = 120;
/// Share of the main window width covered by the overlay, in percent (ratio 0.9).
pub const GLASS_WIDTH_PERCENT: u32 = 90;

/// Main window bounds and the surfaces derived from them.
#[derive(Debug, Clone)]
pub struct Geometry {
    main: Bounds,
    content_visible: bool,
}

impl Geometry {
    pub fn new(main: Bounds) -> Self {
        Self {
            main,
            content_visible: false,
        }
    }

    pub fn main(&self) -> Bounds {
        self.main
    }

    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    // Integer arithmetic keeps width 1000 at exactly x 50 / width 900.
    pub fn overlay_x(&self) -> i32 {
        (u64::from(self.main.width) * u64::from(100 - GLASS_WIDTH_PERCENT) / 200) as i32
    }

    pub fn overlay_width(&self) -> u32 {
        (u64::from(self.main.width) * u64::from(GLASS_WIDTH_PERCENT) / 100) as u32
    }

    pub fn overlay_bounds(&self, phase: GlassPhase) -> Bounds {
        let height = match phase {
            GlassPhase::Collapsed => GLASS_HEIGHT,
            GlassPhase::Expanded => GLASS_OUT_HEIGHT,
        };
        Bounds::new(self.overlay_x(), 0, self.overlay_width(), height)
    }

    /// Content surface fills the window while shown and is zero-sized while hidden.
    pub fn content_bounds(&self) -> Bounds {
        if self.content_visible {
            Bounds::at_origin(self.main.width, self.main.height)
        } else {
            Bounds::default()
        }
    }

    pub fn show_content(&mut self) -> Bounds {
        self.content_visible = true;
        self.content_bounds()
    }

    pub fn hide_content(&mut self) -> Bounds {
        self.content_visible = false;
        self.content_bounds()
    }

    pub fn resize(&mut self, bounds: Bounds) {
        tracing::debug!("Main window resized to {}", bounds);
        self.main = bounds;
    }

    /// Moves keep the current size.
    pub fn move_to(&mut self, bounds: Bounds) {
        tracing::debug!("Main window moved to ({}, {})", bounds.x, bounds.y);
        self.main.x = bounds.x;
        self.main.y = bounds.y;
    }
}
