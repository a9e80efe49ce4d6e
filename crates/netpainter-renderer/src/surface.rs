use serde::{Deserialize, Serialize};

use netpainter_core::{Point, Rgb, Size};

/// How a polyline is stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    /// Alternating on/off lengths; `None` strokes a solid line.
    pub dash: Option<Vec<f64>>,
    pub color: Rgb,
}

impl StrokeStyle {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            dash: None,
            color: Rgb::BLACK,
        }
    }

    pub fn dashed(width: f64, pattern: Vec<f64>) -> Self {
        Self {
            width,
            dash: Some(pattern),
            color: Rgb::BLACK,
        }
    }
}

/// Font and color of placed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: String,
    pub size: f64,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            color: Rgb::BLACK,
        }
    }
}

/// Primitive drawing capability a backend provides to the painter.
///
/// Calls arrive in paint order; later primitives cover earlier ones.
pub trait DrawingSurface {
    /// Fill an axis-aligned rectangle. `size` may be zero or negative.
    fn fill_rectangle(&mut self, top_left: Point, size: Size, color: Rgb);

    /// Fill a closed polygon through `vertices` in order.
    fn fill_polygon(&mut self, vertices: &[Point], color: Rgb);

    /// Stroke an open polyline through `vertices` in order.
    fn stroke_polyline(&mut self, vertices: &[Point], stroke: &StrokeStyle);

    /// Draw `text` with its baseline starting at `origin`.
    fn place_text(&mut self, origin: Point, text: &str, style: &TextStyle);
}
