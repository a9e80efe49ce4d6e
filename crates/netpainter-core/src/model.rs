use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{
    kernel_gamma, Extent, KernelFrame, Point, DEPTH_DIVISOR, NOTATION_DEPTH_DIVISOR,
};
use crate::layer::{
    BuiltinKind, EncoderSpec, KernelSpec, Layer, LayerKind, LayerSpec, LogicalShape, Rgb,
};
use crate::palette::Palette;
use crate::settings::{CanvasSettings, FontSettings};

/// One row of the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    /// Drawn as an encoder miniature instead of a slab.
    pub encoder: bool,
}

/// The ordered layer sequence of one diagram plus everything needed to lay it out.
///
/// Layers are appended left to right; `total_length` tracks the extent of the
/// whole sequence so it can be centered on the canvas before drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    settings: CanvasSettings,
    layers: Vec<Layer>,
    total_length: f64,
    palette: Palette,
    used_builtin: [bool; 7],
    used_custom: Vec<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self::with_settings(CanvasSettings::default())
    }
}

impl Model {
    pub fn new(width: u32, height: u32, slice_gap: f64) -> Self {
        Self::with_settings(CanvasSettings::new(width, height, slice_gap))
    }

    pub fn with_settings(settings: CanvasSettings) -> Self {
        Self {
            settings,
            layers: Vec::new(),
            total_length: 0.0,
            palette: Palette::new(),
            used_builtin: [false; 7],
            used_custom: Vec::new(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn slice_gap(&self) -> f64 {
        self.settings.slice_gap
    }

    pub fn font(&self) -> &FontSettings {
        &self.settings.font
    }

    pub fn set_font(&mut self, font: FontSettings) {
        self.settings.font = font;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Recolor a kind by its display name (built-in or registered custom).
    pub fn set_color(&mut self, name: &str, color: Rgb) -> Result<()> {
        self.palette.set_by_name(name, color)
    }

    // ── Sequence access ──────────────────────────────────────────────

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Extent of the whole sequence along the baseline.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    // ── Layer appends ────────────────────────────────────────────────

    /// Append a convolution. Returns the index of the new layer.
    pub fn add_conv2d(&mut self, spec: LayerSpec, kernel: Option<KernelSpec>) -> usize {
        let extent = spec.resolve();
        let advance = self.slice_advance(extent.width, spec.slices, spec.gap_after);
        self.push(
            LayerKind::Convolution { kernel },
            spec.shape,
            extent,
            spec.slices,
            spec.gap_after,
            spec.notation,
            advance,
        )
    }

    /// Append a convolution followed by a ReLU of the same extent.
    ///
    /// The convolution contributes only its slices; the trailing ReLU carries
    /// `gap_after`. Returns the index of the convolution.
    pub fn add_conv2d_relu(&mut self, spec: LayerSpec, kernel: Option<KernelSpec>) -> usize {
        let extent = spec.resolve();
        let advance = (extent.width + self.slice_gap()) * f64::from(spec.slices);
        let conv = self.push(
            LayerKind::Convolution { kernel },
            spec.shape,
            extent,
            spec.slices,
            spec.gap_after,
            spec.notation,
            advance,
        );
        self.push(
            LayerKind::ReLU,
            LogicalShape::default(),
            extent,
            1,
            spec.gap_after,
            false,
            extent.width + spec.gap_after,
        );
        conv
    }

    pub fn add_residual(&mut self, spec: LayerSpec) -> usize {
        self.push_sliced(LayerKind::Residual, spec)
    }

    pub fn add_max_pooling(&mut self, spec: LayerSpec) -> usize {
        self.push_sliced(LayerKind::MaxPooling, spec)
    }

    /// ReLU layers are single-slice and never annotated.
    pub fn add_relu(&mut self, spec: LayerSpec) -> usize {
        self.push_single(LayerKind::ReLU, spec, false)
    }

    pub fn add_softmax(&mut self, spec: LayerSpec) -> usize {
        let notation = spec.notation;
        self.push_single(LayerKind::Softmax, spec, notation)
    }

    /// BatchNorm layers are single-slice and never annotated.
    pub fn add_batch_norm(&mut self, spec: LayerSpec) -> usize {
        self.push_single(LayerKind::BatchNorm, spec, false)
    }

    /// Encoders take explicit dimensions and skip auto-sizing.
    pub fn add_encoder(&mut self, spec: EncoderSpec) -> usize {
        self.push(
            LayerKind::Encoder,
            LogicalShape::default(),
            spec.extent,
            1,
            spec.gap_after,
            false,
            spec.extent.width + spec.gap_after,
        )
    }

    /// Append a caller-named layer and register its color.
    ///
    /// A name equal to a built-in legend label recolors that built-in and
    /// shares its legend row.
    pub fn add_custom(&mut self, name: &str, color: Rgb, spec: LayerSpec) -> usize {
        match BuiltinKind::from_display_name(name) {
            Some(kind) => self.palette.set_builtin(kind, color),
            None => self.palette.set_custom(name, color),
        }
        self.push_sliced(
            LayerKind::Custom {
                name: name.to_string(),
            },
            spec,
        )
    }

    /// `(width + G) * slices + gap_after - G`
    fn slice_advance(&self, width: f64, slices: u32, gap_after: f64) -> f64 {
        let gap = self.slice_gap();
        (width + gap) * f64::from(slices) + gap_after - gap
    }

    fn push_sliced(&mut self, kind: LayerKind, spec: LayerSpec) -> usize {
        let extent = spec.resolve();
        let advance = self.slice_advance(extent.width, spec.slices, spec.gap_after);
        self.push(
            kind,
            spec.shape,
            extent,
            spec.slices,
            spec.gap_after,
            spec.notation,
            advance,
        )
    }

    fn push_single(&mut self, kind: LayerKind, spec: LayerSpec, notation: bool) -> usize {
        let extent = spec.resolve();
        self.push(
            kind,
            spec.shape,
            extent,
            1,
            spec.gap_after,
            notation,
            extent.width + spec.gap_after,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind: LayerKind,
        shape: LogicalShape,
        extent: Extent,
        slices: u32,
        gap_after: f64,
        notation: bool,
        advance: f64,
    ) -> usize {
        self.mark_used(&kind);
        let layer = Layer::new(
            kind,
            shape,
            extent,
            slices,
            gap_after,
            notation,
            self.total_length,
        );
        self.total_length += advance;
        log::debug!(
            "Appended {} at {:.2} ({}x{}x{}), sequence length {:.2}",
            layer.kind.display_name(),
            layer.origin_offset(),
            extent.height,
            extent.length,
            extent.width,
            self.total_length
        );
        self.layers.push(layer);
        self.layers.len() - 1
    }

    fn mark_used(&mut self, kind: &LayerKind) {
        match kind {
            LayerKind::Custom { name } => match BuiltinKind::from_display_name(name) {
                Some(b) => self.used_builtin[b.index()] = true,
                None => {
                    if !self.used_custom.iter().any(|n| n == name) {
                        self.used_custom.push(name.clone());
                    }
                }
            },
            other => {
                if let Some(b) = other.builtin() {
                    self.used_builtin[b.index()] = true;
                }
            }
        }
    }

    // ── Layout ───────────────────────────────────────────────────────

    /// Center the whole sequence on the canvas midpoint.
    ///
    /// Derives every centered offset from the origin offset, so repeated
    /// calls without appends are no-ops.
    pub fn center(&mut self) {
        let shift = f64::from(self.settings.width) / 2.0 - self.total_length / 2.0;
        for layer in &mut self.layers {
            layer.recenter(shift);
        }
    }

    /// Vertical position of the baseline.
    pub fn baseline_y(&self) -> f64 {
        f64::from(self.settings.height) / 2.0
    }

    /// Left-face center of slice `index` of `layer`.
    pub fn slice_anchor(&self, layer: &Layer, index: u32) -> Point {
        Point::new(
            layer.centered_offset() + (layer.extent.width + self.slice_gap()) * f64::from(index),
            self.baseline_y(),
        )
    }

    /// Kernel convergence geometry for convolution layers that carry a kernel.
    pub fn kernel_frame(&self, layer: &Layer) -> Option<KernelFrame> {
        let kernel = layer.kernel()?;
        let gamma = kernel_gamma(
            layer.shape.resolution_x,
            layer.shape.resolution_y,
            kernel.x(),
        );
        let anchor = Point::new(
            layer.centered_offset() + layer.extent.width,
            self.baseline_y(),
        );
        Some(KernelFrame::project(
            anchor,
            layer.extent,
            gamma,
            layer.gap_after,
        ))
    }

    /// Baseline origin of the notation text above `layer`.
    pub fn notation_position(&self, layer: &Layer) -> Point {
        let font = &self.settings.font;
        let Extent { height, length, .. } = layer.extent;
        Point::new(
            layer.centered_offset() + length / DEPTH_DIVISOR + font.offset_x,
            self.baseline_y() - height / 2.0 - length / NOTATION_DEPTH_DIVISOR - 15.0 - font.offset_y,
        )
    }

    /// Used kinds in legend order: built-ins first, then custom kinds in
    /// first-use order.
    pub fn legend_entries(&self) -> Result<Vec<LegendEntry>> {
        let mut entries = Vec::new();
        for kind in BuiltinKind::ALL {
            if self.used_builtin[kind.index()] {
                entries.push(LegendEntry {
                    label: kind.display_name().to_string(),
                    color: self.palette.builtin(kind),
                    encoder: kind == BuiltinKind::Encoder,
                });
            }
        }
        for name in &self.used_custom {
            let kind = LayerKind::Custom { name: name.clone() };
            entries.push(LegendEntry {
                label: name.clone(),
                color: self.palette.color_of(&kind)?,
                encoder: false,
            });
        }
        Ok(entries)
    }
}
