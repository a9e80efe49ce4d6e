use serde::{Deserialize, Serialize};

use netpainter_core::geometry::{FRONT_SHADE, SIDE_SHADE, TOP_SHADE};
use netpainter_core::{
    EncoderShape, Extent, KernelFrame, KernelSpec, LegendEntry, Model, Point, Result, Rgb,
    SlabFaces,
};

use crate::surface::{DrawingSurface, StrokeStyle, TextStyle};

const KERNEL_LINE_WIDTH: f64 = 2.0;
const KERNEL_DASH: [f64; 2] = [4.0, 4.0];
const KERNEL_FONT_FAMILY: &str = "arial";
const KERNEL_FONT_SIZE: f64 = 25.0;

const LEGEND_SHAPE_INSET: f64 = 300.0;
const LEGEND_LABEL_INSET: f64 = 200.0;
const LEGEND_BOTTOM_INSET: f64 = 100.0;
const LEGEND_ROW_STEP: f64 = 80.0;
const LEGEND_FONT_SIZE: f64 = 40.0;
const LEGEND_SLAB: Extent = Extent {
    height: 30.0,
    length: 25.0,
    width: 50.0,
};
const LEGEND_ENCODER: Extent = Extent {
    height: 30.0,
    length: 30.0,
    width: 50.0,
};

/// Which optional parts of the diagram are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOptions {
    /// Legend of used layer kinds in the lower-right corner.
    pub legend: bool,
    /// `res_x*res_y*channels` labels above annotated layers.
    pub notations: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            legend: true,
            notations: true,
        }
    }
}

/// Draw a full diagram: legend, then every layer in sequence order, then notations.
///
/// Centers the model before any layer is drawn.
pub fn paint<S: DrawingSurface + ?Sized>(
    model: &mut Model,
    surface: &mut S,
    options: &DrawOptions,
) -> Result<()> {
    log::info!(
        "Painting {} layers on a {}x{} canvas",
        model.layer_count(),
        model.width(),
        model.height()
    );

    if options.legend {
        let entries = model.legend_entries()?;
        paint_legend(model, &entries, surface);
    }

    model.center();
    paint_layers(model, surface)?;

    if options.notations {
        paint_notations(model, surface);
    }
    log::info!("Painted diagram of total length {:.1}", model.total_length());
    Ok(())
}

fn paint_layers<S: DrawingSurface + ?Sized>(model: &Model, surface: &mut S) -> Result<()> {
    for layer in model.layers() {
        let color = model.palette().color_of(&layer.kind)?;
        if layer.kind.is_encoder() {
            paint_encoder(surface, model.slice_anchor(layer, 0), layer.extent, color);
            continue;
        }
        let frame = model.kernel_frame(layer);
        for index in 0..layer.slices {
            paint_slab(surface, model.slice_anchor(layer, index), layer.extent, color);
            // Re-emitted after each slice so the diagram stays above the slices.
            if let (Some(frame), Some(kernel)) = (&frame, layer.kernel()) {
                paint_kernel(surface, frame, kernel);
            }
        }
    }
    Ok(())
}

fn paint_notations<S: DrawingSurface + ?Sized>(model: &Model, surface: &mut S) {
    let font = model.font();
    let style = TextStyle::new(&font.family, font.size);
    for layer in model.layers().iter().filter(|l| l.show_notation) {
        surface.place_text(
            model.notation_position(layer),
            &layer.shape.notation(),
            &style,
        );
    }
}

fn paint_legend<S: DrawingSurface + ?Sized>(
    model: &Model,
    entries: &[LegendEntry],
    surface: &mut S,
) {
    let width = f64::from(model.width());
    let height = f64::from(model.height());
    let style = TextStyle::new(&model.font().family, LEGEND_FONT_SIZE);

    for (row, entry) in entries.iter().enumerate() {
        let y = height - LEGEND_BOTTOM_INSET - LEGEND_ROW_STEP * row as f64;
        let anchor = Point::new(width - LEGEND_SHAPE_INSET, y);
        if entry.encoder {
            paint_encoder(surface, anchor, LEGEND_ENCODER, entry.color);
        } else {
            paint_slab(surface, anchor, LEGEND_SLAB, entry.color);
        }
        surface.place_text(
            Point::new(width - LEGEND_LABEL_INSET, y),
            &entry.label,
            &style,
        );
    }
}

/// Front, top, then side face of one slab.
pub fn paint_slab<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    anchor: Point,
    extent: Extent,
    color: Rgb,
) {
    let faces = SlabFaces::project(anchor, extent);
    surface.fill_rectangle(faces.front_origin, faces.front_size, color.shade(FRONT_SHADE));
    surface.fill_polygon(&faces.top, color.shade(TOP_SHADE));
    surface.fill_polygon(&faces.side, color.shade(SIDE_SHADE));
}

pub fn paint_encoder<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    anchor: Point,
    extent: Extent,
    color: Rgb,
) {
    for facet in EncoderShape::project(anchor, extent).facets() {
        surface.fill_polygon(&facet.vertices, color.shade(facet.shade));
    }
}

/// Solid kernel outline, dashed rays to the target, and the two size labels.
pub fn paint_kernel<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    frame: &KernelFrame,
    kernel: &KernelSpec,
) {
    surface.stroke_polyline(&frame.outline(), &StrokeStyle::solid(KERNEL_LINE_WIDTH));

    let dashed = StrokeStyle::dashed(KERNEL_LINE_WIDTH, KERNEL_DASH.to_vec());
    for corner in frame.corners {
        surface.stroke_polyline(&[corner, frame.target], &dashed);
    }

    let style = TextStyle::new(KERNEL_FONT_FAMILY, KERNEL_FONT_SIZE);
    surface.place_text(frame.x_label_position(), &kernel.x().to_string(), &style);
    surface.place_text(frame.y_label_position(), &kernel.y().to_string(), &style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_data::{DrawCommand, RecordingSurface};
    use netpainter_core::{EncoderSpec, LayerSpec, Size};

    fn conv_model() -> Model {
        let mut model = Model::new(1000, 1000, 10.0);
        model.add_conv2d(
            LayerSpec::new(256, 256, 3),
            Some(KernelSpec::square(5).unwrap()),
        );
        model.add_relu(LayerSpec::default());
        model
    }

    #[test]
    fn test_slab_primitives() {
        let mut surface = RecordingSurface::new();
        let color = Rgb::new(0.5, 0.5, 0.5);
        paint_slab(&mut surface, Point::new(0.0, 0.0), Extent::new(10.0, 0.0, 4.0), color);
        assert_eq!(surface.len(), 3);
        match &surface.commands[0] {
            DrawCommand::FillRectangle { size, color, .. } => {
                assert_eq!(*size, Size::new(4.0, 10.0));
                assert!((color.r - 0.4).abs() < 1e-10);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &surface.commands[1] {
            DrawCommand::FillPolygon { color, vertices } => {
                assert_eq!(vertices.len(), 4);
                assert!((color.g - 0.6).abs() < 1e-10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_kernel_primitives() {
        let mut surface = RecordingSurface::new();
        let frame = KernelFrame::project(Point::new(0.0, 0.0), Extent::new(10.0, 10.0, 1.0), 0.4, 10.0);
        paint_kernel(&mut surface, &frame, &KernelSpec::new(3, 5).unwrap());
        assert_eq!(surface.len(), 7);
        match &surface.commands[0] {
            DrawCommand::StrokePolyline { vertices, stroke } => {
                assert_eq!(vertices.len(), 5);
                assert!(stroke.dash.is_none());
                assert_eq!(stroke.width, 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        for command in &surface.commands[1..5] {
            match command {
                DrawCommand::StrokePolyline { vertices, stroke } => {
                    assert_eq!(vertices[1], frame.target);
                    assert_eq!(stroke.dash, Some(vec![4.0, 4.0]));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(surface.texts(), vec!["3", "5"]);
    }

    #[test]
    fn test_paint_order() {
        let mut model = conv_model();
        let mut surface = RecordingSurface::new();
        paint(&mut model, &mut surface, &DrawOptions::default()).unwrap();

        // legend: Conv2d and ReLu rows; ReLu comes first in legend order
        let texts = surface.texts();
        assert_eq!(texts, vec!["ReLu", "Conv2d", "5", "5", "256*256*3"]);

        // 2 legend slabs (3 + 1 each) + conv slab + kernel (7) + relu slab + notation
        assert_eq!(surface.len(), 8 + 3 + 7 + 3 + 1);
        match surface.commands.last() {
            Some(DrawCommand::PlaceText { style, .. }) => assert_eq!(style.size, 30.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_legend_rows() {
        let mut model = Model::new(800, 600, 10.0);
        model.add_encoder(EncoderSpec::default());
        model.add_softmax(LayerSpec::default());
        let mut surface = RecordingSurface::new();
        let entries = model.legend_entries().unwrap();
        paint_legend(&model, &entries, &mut surface);

        let origins: Vec<Point> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::PlaceText { origin, style, .. } => {
                    assert_eq!(style.size, 40.0);
                    Some(*origin)
                }
                _ => None,
            })
            .collect();
        assert_eq!(origins, vec![Point::new(600.0, 500.0), Point::new(600.0, 420.0)]);
        assert_eq!(surface.texts(), vec!["Softmax", "Encoder"]);
    }

    #[test]
    fn test_options_skip_legend_and_notations() {
        let mut model = conv_model();
        let mut surface = RecordingSurface::new();
        let options = DrawOptions {
            legend: false,
            notations: false,
        };
        paint(&mut model, &mut surface, &options).unwrap();
        assert_eq!(surface.texts(), vec!["5", "5"]);
        assert!((model.layer(0).unwrap().centered_offset() - (500.0 - model.total_length() / 2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_kernel_repeats_per_slice() {
        let mut model = Model::new(1000, 1000, 10.0);
        model.add_conv2d(
            LayerSpec::new(32, 32, 4).with_slices(3),
            Some(KernelSpec::square(3).unwrap()),
        );
        let mut surface = RecordingSurface::new();
        let options = DrawOptions {
            legend: false,
            notations: false,
        };
        paint(&mut model, &mut surface, &options).unwrap();
        assert_eq!(surface.len(), 3 * (3 + 7));
        assert_eq!(surface.texts().len(), 6);
    }

    #[test]
    fn test_encoder_layer_is_single_volume() {
        let mut model = Model::new(1000, 1000, 10.0);
        model.add_encoder(EncoderSpec::new(100.0, 10.0, 300.0));
        let mut surface = RecordingSurface::new();
        let options = DrawOptions {
            legend: false,
            notations: false,
        };
        paint(&mut model, &mut surface, &options).unwrap();
        // no filler, right cap
        assert_eq!(surface.len(), 5);
        assert!(surface
            .commands
            .iter()
            .all(|c| matches!(c, DrawCommand::FillPolygon { .. })));
    }
}
