/// Physical layout of the presentation surface. Conversions run over
/// the screen diagonal so they hold for any resolution on a display of
/// the configured diagonal size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    /// Diagonal size of the physical display, in inches.
    pub screen_size_in: f64,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32, screen_size_in: f64) -> Self {
        Self {
            width,
            height,
            screen_size_in,
        }
    }

    pub fn diagonal_px(&self) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        (w * w + h * h).sqrt()
    }

    /// Millimetres from the screen origin for a pixel offset.
    pub fn to_mm(&self, px: f64) -> f64 {
        px * (self.screen_size_in / self.diagonal_px()) * 2.54 * 10.0
    }

    /// Pixel radius of a reach target of the given physical diameter.
    pub fn stimulus_radius_px(&self, diameter_mm: f64) -> f32 {
        let diameter_px =
            (diameter_mm / 10.0) * (1.0 / 2.54) * (self.diagonal_px() / self.screen_size_in);
        (diameter_px / 2.0) as f32
    }

    /// The three target locations: 40%, 50% and 60% of the width, on
    /// the vertical midline.
    pub fn candidates(&self) -> [(f32, f32); 3] {
        let w = self.width as f64;
        let mid_y = (self.height as f64 / 2.0).floor() as f32;
        [
            ((w * 0.4).floor() as f32, mid_y),
            ((w / 2.0).floor() as f32, mid_y),
            ((w * 0.6).floor() as f32, mid_y),
        ]
    }

    /// Instruction font size, 0.6 of the pixels-per-degree of visual
    /// angle at the configured viewing distance.
    pub fn font_px(&self, display_width_cm: f64, viewing_distance_cm: f64) -> f32 {
        let width_degrees =
            (((display_width_cm / 2.0) / viewing_distance_cm).atan() * 2.0).to_degrees();
        let ppd = self.width as f64 / width_degrees;
        (ppd * 0.6).floor() as f32
    }
}
