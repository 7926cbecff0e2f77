/// Drawing surface for a single page. Coordinates are PDF points with the
/// origin at the bottom-left corner of the page.
pub trait Canvas {
    fn text(&mut self, text: &str, size: f32, weight: FontWeight, x: f32, y: f32);

    fn line(&mut self, from: (f32, f32), to: (f32, f32));

    /// Stroked (unfilled) rectangle whose lower-left corner is `(x, y)`.
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn set_stroke(&mut self, width: f32, color: Rgb);

    fn save_state(&mut self);

    fn restore_state(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const DUTY_BLUE: Rgb = Rgb { r: 0.05, g: 0.25, b: 0.75 };
}
