use std::path::Path as FsPath;

use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform,
};

use netpainter_core::{Point, Rgb, Size};
use netpainter_renderer::{DrawingSurface, StrokeStyle, TextStyle};

use crate::error::OutputError;
use crate::glyphs;

/// A `tiny-skia` pixmap that implements the drawing contract.
///
/// Starts fully transparent. Text uses `font8x8` bitmap glyphs; the
/// requested font family is not resolved.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, OutputError> {
        let pixmap = Pixmap::new(width, height).ok_or(OutputError::InvalidCanvas { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight RGBA bytes of the whole canvas, row-major.
    pub fn rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode the canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, OutputError> {
        crate::export::encode_rgba(self.width(), self.height(), &self.rgba())
    }

    /// Encode the canvas and write it to `path`.
    pub fn write_png(&self, path: impl AsRef<FsPath>) -> Result<(), OutputError> {
        let bytes = self.encode_png()?;
        crate::export::write_bytes(path.as_ref(), &bytes)
    }
}

fn solid_paint(color: Rgb, anti_alias: bool) -> Paint<'static> {
    let [r, g, b] = color.to_rgb8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = anti_alias;
    paint
}

fn polyline_path(vertices: &[Point], close: bool) -> Option<Path> {
    let (first, rest) = vertices.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

impl DrawingSurface for PixmapSurface {
    fn fill_rectangle(&mut self, top_left: Point, size: Size, color: Rgb) {
        let (x0, x1) = (top_left.x, top_left.x + size.width);
        let (y0, y1) = (top_left.y, top_left.y + size.height);
        let rect = Rect::from_ltrb(
            x0.min(x1) as f32,
            y0.min(y1) as f32,
            x0.max(x1) as f32,
            y0.max(y1) as f32,
        )
        .filter(|r| r.width() > 0.0 && r.height() > 0.0);
        match rect {
            Some(rect) => {
                self.pixmap
                    .fill_rect(rect, &solid_paint(color, true), Transform::identity(), None)
            }
            None => log::trace!("Skipping degenerate rectangle at {:?}", top_left),
        }
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Rgb) {
        match polyline_path(vertices, true) {
            Some(path) => self.pixmap.fill_path(
                &path,
                &solid_paint(color, true),
                FillRule::Winding,
                Transform::identity(),
                None,
            ),
            None => log::trace!("Skipping degenerate polygon of {} vertices", vertices.len()),
        }
    }

    fn stroke_polyline(&mut self, vertices: &[Point], stroke: &StrokeStyle) {
        let Some(path) = polyline_path(vertices, false) else {
            log::trace!("Skipping degenerate polyline of {} vertices", vertices.len());
            return;
        };
        let dash = stroke.dash.as_ref().and_then(|pattern| {
            StrokeDash::new(pattern.iter().map(|v| *v as f32).collect(), 0.0)
        });
        let sk_stroke = Stroke {
            width: stroke.width as f32,
            dash,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &solid_paint(stroke.color, true),
            &sk_stroke,
            Transform::identity(),
            None,
        );
    }

    fn place_text(&mut self, origin: Point, text: &str, style: &TextStyle) {
        let cell = glyphs::cell_size(style.size);
        let top = origin.y - f64::from(glyphs::ASCENT_ROWS) * cell;
        let mut pb = PathBuilder::new();
        for (i, c) in text.chars().enumerate() {
            let left = origin.x + (i as u32 * glyphs::ADVANCE_COLUMNS) as f64 * cell;
            for (col, row) in glyphs::lit_cells(c) {
                let x = left + f64::from(col) * cell;
                let y = top + f64::from(row) * cell;
                if let Some(rect) = Rect::from_xywh(x as f32, y as f32, cell as f32, cell as f32) {
                    pb.push_rect(rect);
                }
            }
        }
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &solid_paint(style.color, false),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}
