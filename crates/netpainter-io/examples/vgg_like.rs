//! Draws a small VGG-style network to `network.png` (or the path given as
//! the first argument).

use netpainter_core::{EncoderSpec, FontSettings, KernelSpec, LayerSpec, Model, Rgb};
use netpainter_renderer::DrawOptions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let output = std::env::args().nth(1).unwrap_or_else(|| "network.png".to_string());

    let mut model = Model::new(1600, 1000, 10.0);
    model.set_font(FontSettings {
        size: 24.0,
        offset_y: 10.0,
        ..Default::default()
    });

    model.add_conv2d_relu(
        LayerSpec::new(224, 224, 3).with_gap(60.0),
        Some(KernelSpec::square(7)?),
    );
    model.add_batch_norm(LayerSpec::new(224, 224, 1).with_width(8.0));
    model.add_max_pooling(LayerSpec::new(112, 112, 64).with_width(20.0).with_gap(30.0));
    model.add_conv2d(
        LayerSpec::new(112, 112, 128).with_slices(2).with_gap(60.0),
        Some(KernelSpec::new(3, 3)?),
    );
    model.add_residual(LayerSpec::new(56, 56, 256).with_width(30.0).with_slices(2));
    model.add_custom(
        "Attention",
        Rgb::new(0.95, 0.6, 0.2),
        LayerSpec::new(28, 28, 512).with_width(30.0).with_gap(40.0),
    );
    model.add_encoder(EncoderSpec::new(120.0, 120.0, 160.0).with_gap(40.0));
    model.add_softmax(LayerSpec::new(1, 1, 10).with_extent(netpainter_core::Extent::new(80.0, 20.0, 15.0)));
    model.set_color("Maxpooling", Rgb::new(0.85, 0.2, 0.2))?;

    netpainter_io::draw(&mut model, &output, &DrawOptions::default())?;
    println!("{} layers written to {}", model.layer_count(), output);
    Ok(())
}
