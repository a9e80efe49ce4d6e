use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Extent;

/// Default spacing inserted after a layer.
pub const DEFAULT_GAP_AFTER: f64 = 10.0;

/// RGB color with components nominally in `0.0..=1.0`.
///
/// Shaded variants may exceed 1.0; backends clamp when they quantize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Multiply every component by `factor`.
    pub fn shade(&self, factor: f64) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }

    /// Quantize to 8-bit channels, clamping out-of-range components.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// Layer kinds with a fixed palette slot and legend position.
///
/// Variants are declared in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinKind {
    Softmax,
    ReLU,
    Convolution,
    BatchNorm,
    Residual,
    MaxPooling,
    Encoder,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 7] = [
        BuiltinKind::Softmax,
        BuiltinKind::ReLU,
        BuiltinKind::Convolution,
        BuiltinKind::BatchNorm,
        BuiltinKind::Residual,
        BuiltinKind::MaxPooling,
        BuiltinKind::Encoder,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name shown in the legend.
    pub fn display_name(self) -> &'static str {
        match self {
            BuiltinKind::Softmax => "Softmax",
            BuiltinKind::ReLU => "ReLu",
            BuiltinKind::Convolution => "Conv2d",
            BuiltinKind::BatchNorm => "BN",
            BuiltinKind::Residual => "Residual",
            BuiltinKind::MaxPooling => "Maxpooling",
            BuiltinKind::Encoder => "Encoder",
        }
    }

    pub fn default_color(self) -> Rgb {
        match self {
            BuiltinKind::Softmax => Rgb::new(0.8, 0.8, 0.1),
            BuiltinKind::ReLU => Rgb::new(0.3, 0.6, 1.0),
            BuiltinKind::Convolution => Rgb::new(0.9, 0.5, 0.8),
            BuiltinKind::BatchNorm => Rgb::new(0.5, 0.1, 0.8),
            BuiltinKind::Residual => Rgb::new(0.1, 0.88, 0.88),
            BuiltinKind::MaxPooling => Rgb::new(0.9, 0.1, 0.1),
            BuiltinKind::Encoder => Rgb::new(0.3, 0.3, 0.8),
        }
    }

    /// Look a kind up by its display name or variant name, ignoring case.
    /// Exact legend label match, as used for custom layer names.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.display_name() == name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "softmax" => Some(BuiltinKind::Softmax),
            "relu" => Some(BuiltinKind::ReLU),
            "conv2d" | "convolution" => Some(BuiltinKind::Convolution),
            "bn" | "batchnorm" => Some(BuiltinKind::BatchNorm),
            "residual" => Some(BuiltinKind::Residual),
            "maxpooling" => Some(BuiltinKind::MaxPooling),
            "encoder" => Some(BuiltinKind::Encoder),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Convolution kernel size drawn as a convergence diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    x: u32,
    y: u32,
}

impl KernelSpec {
    pub fn new(x: i64, y: i64) -> Result<Self> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(kx), Ok(ky)) if kx > 0 && ky > 0 => Ok(Self { x: kx, y: ky }),
            _ => Err(Error::InvalidKernel { x, y }),
        }
    }

    /// A `size x size` kernel.
    pub fn square(size: i64) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }
}

/// What a layer is. Kind-specific data rides on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerKind {
    Convolution { kernel: Option<KernelSpec> },
    ReLU,
    Softmax,
    BatchNorm,
    Residual,
    MaxPooling,
    Encoder,
    Custom { name: String },
}

impl LayerKind {
    /// The built-in palette slot, or `None` for custom layers.
    pub fn builtin(&self) -> Option<BuiltinKind> {
        match self {
            LayerKind::Convolution { .. } => Some(BuiltinKind::Convolution),
            LayerKind::ReLU => Some(BuiltinKind::ReLU),
            LayerKind::Softmax => Some(BuiltinKind::Softmax),
            LayerKind::BatchNorm => Some(BuiltinKind::BatchNorm),
            LayerKind::Residual => Some(BuiltinKind::Residual),
            LayerKind::MaxPooling => Some(BuiltinKind::MaxPooling),
            LayerKind::Encoder => Some(BuiltinKind::Encoder),
            LayerKind::Custom { .. } => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            LayerKind::Custom { name } => name,
            other => other
                .builtin()
                .map(BuiltinKind::display_name)
                .unwrap_or_default(),
        }
    }

    pub fn kernel(&self) -> Option<&KernelSpec> {
        match self {
            LayerKind::Convolution { kernel } => kernel.as_ref(),
            _ => None,
        }
    }

    pub fn is_encoder(&self) -> bool {
        matches!(self, LayerKind::Encoder)
    }
}

/// Logical tensor shape of a layer: used for auto-sizing and notation text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalShape {
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub channels: u32,
}

impl LogicalShape {
    pub fn new(resolution_x: u32, resolution_y: u32, channels: u32) -> Self {
        Self {
            resolution_x,
            resolution_y,
            channels,
        }
    }

    /// Parameter label in the form `res_x*res_y*channels`.
    pub fn notation(&self) -> String {
        format!(
            "{}*{}*{}",
            self.resolution_x, self.resolution_y, self.channels
        )
    }
}

/// Fill in draw dimensions the caller left unset.
///
/// Width defaults to `10 * sqrt(channels)`. Height and length default to the
/// resolution when both are unset, otherwise the missing one mirrors the other.
pub fn resolve_extent(
    shape: &LogicalShape,
    height: Option<f64>,
    length: Option<f64>,
    width: Option<f64>,
) -> Extent {
    let width = width.unwrap_or_else(|| 10.0 * f64::from(shape.channels).sqrt());
    let (height, length) = match (height, length) {
        (None, None) => (
            f64::from(shape.resolution_y),
            f64::from(shape.resolution_x),
        ),
        (None, Some(l)) => (l, l),
        (Some(h), None) => (h, h),
        (Some(h), Some(l)) => (h, l),
    };
    Extent::new(height, length, width)
}

/// Caller-facing description of a layer to append.
///
/// Unset draw dimensions are resolved with [`resolve_extent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub shape: LogicalShape,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub slices: u32,
    pub gap_after: f64,
    pub notation: bool,
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            shape: LogicalShape::default(),
            height: None,
            length: None,
            width: None,
            slices: 1,
            gap_after: DEFAULT_GAP_AFTER,
            notation: true,
        }
    }
}

impl LayerSpec {
    pub fn new(resolution_x: u32, resolution_y: u32, channels: u32) -> Self {
        Self {
            shape: LogicalShape::new(resolution_x, resolution_y, channels),
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set all three draw dimensions at once.
    pub fn with_extent(self, extent: Extent) -> Self {
        self.with_height(extent.height)
            .with_length(extent.length)
            .with_width(extent.width)
    }

    pub fn with_slices(mut self, slices: u32) -> Self {
        self.slices = slices;
        self
    }

    pub fn with_gap(mut self, gap_after: f64) -> Self {
        self.gap_after = gap_after;
        self
    }

    pub fn with_notation(mut self, notation: bool) -> Self {
        self.notation = notation;
        self
    }

    pub fn resolve(&self) -> Extent {
        resolve_extent(&self.shape, self.height, self.length, self.width)
    }
}

/// Encoder volumes take explicit dimensions only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncoderSpec {
    pub extent: Extent,
    pub gap_after: f64,
}

impl Default for EncoderSpec {
    fn default() -> Self {
        Self {
            extent: Extent::new(300.0, 300.0, 400.0),
            gap_after: DEFAULT_GAP_AFTER,
        }
    }
}

impl EncoderSpec {
    pub fn new(height: f64, length: f64, width: f64) -> Self {
        Self {
            extent: Extent::new(height, length, width),
            ..Default::default()
        }
    }

    pub fn with_gap(mut self, gap_after: f64) -> Self {
        self.gap_after = gap_after;
        self
    }
}

/// One drawable unit of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub shape: LogicalShape,
    pub extent: Extent,
    pub slices: u32,
    pub gap_after: f64,
    pub show_notation: bool,
    origin_offset: f64,
    centered_offset: f64,
}

impl Layer {
    pub(crate) fn new(
        kind: LayerKind,
        shape: LogicalShape,
        extent: Extent,
        slices: u32,
        gap_after: f64,
        show_notation: bool,
        origin_offset: f64,
    ) -> Self {
        Self {
            kind,
            shape,
            extent,
            slices,
            gap_after,
            show_notation,
            origin_offset,
            centered_offset: origin_offset,
        }
    }

    /// Baseline position assigned at append time.
    pub fn origin_offset(&self) -> f64 {
        self.origin_offset
    }

    /// Baseline position after the last centering pass.
    pub fn centered_offset(&self) -> f64 {
        self.centered_offset
    }

    pub(crate) fn recenter(&mut self, shift: f64) {
        self.centered_offset = self.origin_offset + shift;
    }

    pub fn kernel(&self) -> Option<&KernelSpec> {
        self.kind.kernel()
    }
}
