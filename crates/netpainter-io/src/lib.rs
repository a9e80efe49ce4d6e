//! # NetPainter I/O
//!
//! Raster backend and PNG output. [`draw`] is the one-call entry point: it
//! paints a model onto a fresh [`PixmapSurface`] and writes the result.

pub mod error;
pub mod export;
pub mod glyphs;
pub mod raster;

use std::path::Path;

use netpainter_core::Model;
use netpainter_renderer::{paint, DrawOptions};

pub use error::OutputError;
pub use raster::PixmapSurface;

/// Paint `model` onto a canvas of the model's size.
pub fn render(model: &mut Model, options: &DrawOptions) -> Result<PixmapSurface, OutputError> {
    let mut surface = PixmapSurface::new(model.width(), model.height())?;
    paint(model, &mut surface, options)?;
    Ok(surface)
}

/// Paint `model` and return the encoded PNG.
pub fn render_png(model: &mut Model, options: &DrawOptions) -> Result<Vec<u8>, OutputError> {
    render(model, options)?.encode_png()
}

/// Paint `model` and write it as a PNG file.
pub fn draw(
    model: &mut Model,
    path: impl AsRef<Path>,
    options: &DrawOptions,
) -> Result<(), OutputError> {
    render(model, options)?.write_png(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpainter_core::{KernelSpec, LayerSpec, Rgb};

    fn scenario(fused: bool) -> Model {
        let mut model = Model::new(1000, 1000, 10.0);
        let spec = LayerSpec::new(256, 256, 3);
        let kernel = Some(KernelSpec::square(5).unwrap());
        if fused {
            model.add_conv2d_relu(spec, kernel);
        } else {
            model.add_conv2d(spec, kernel);
            model.add_relu(LayerSpec::default());
        }
        model
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_standalone_relu_scenario() {
        let mut model = scenario(false);
        let png = render_png(&mut model, &DrawOptions::default()).unwrap();
        assert!(!png.is_empty());

        let w = 10.0 * 3f64.sqrt();
        // conv: (w + 10) + 10 - 10; relu: 0 + 10
        let total = w + 20.0;
        assert!(close(model.total_length(), total));
        let conv = model.layer(0).unwrap();
        let relu = model.layer(1).unwrap();
        assert!(close(relu.origin_offset(), w + 10.0));
        assert!(close(conv.centered_offset(), 500.0 - total / 2.0));
        assert!(close(relu.centered_offset(), w + 10.0 + 500.0 - total / 2.0));
    }

    #[test]
    fn test_fused_relu_scenario() {
        let mut model = scenario(true);
        render_png(&mut model, &DrawOptions::default()).unwrap();

        let w = 10.0 * 3f64.sqrt();
        let total = (w + 10.0) + (w + 10.0);
        assert!(close(model.total_length(), total));
        assert!(close(model.layer(1).unwrap().centered_offset(), w + 10.0 + 500.0 - total / 2.0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_png(&mut scenario(false), &DrawOptions::default()).unwrap();
        let second = render_png(&mut scenario(false), &DrawOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conv_front_face_pixels() {
        let mut model = scenario(false);
        let surface = render(&mut model, &DrawOptions::default()).unwrap();
        // front face of the conv slab spans x in [390.8, 408.2], y in [462.5, 718.5]
        let px = surface.pixel(404, 520).unwrap();
        let expected = Rgb::new(0.9, 0.5, 0.8).shade(0.8).to_rgb8();
        assert_eq!(px[3], 255);
        for (got, want) in px.iter().zip(expected.iter()) {
            assert!(got.abs_diff(*want) <= 1);
        }
        // corner stays transparent
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_unknown_custom_color_fails() {
        let mut model = Model::new(200, 200, 10.0);
        model.add_custom("Gate", Rgb::new(0.2, 0.4, 0.6), LayerSpec::new(8, 8, 4));
        *model.palette_mut() = netpainter_core::Palette::new();
        assert!(matches!(
            render(&mut model, &DrawOptions::default()),
            Err(OutputError::Model(netpainter_core::Error::UnknownLayerKind(_)))
        ));
    }

    #[test]
    fn test_draw_writes_file() {
        let path = std::env::temp_dir().join(format!("netpainter-{}.png", std::process::id()));
        let mut model = scenario(true);
        draw(&mut model, &path, &DrawOptions::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_zero_canvas_is_an_error() {
        let mut model = Model::new(0, 0, 10.0);
        assert!(matches!(
            render_png(&mut model, &DrawOptions::default()),
            Err(OutputError::InvalidCanvas { .. })
        ));
    }
}
