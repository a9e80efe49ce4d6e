//! # NetPainter Core
//!
//! Layer model and layout engine for schematic neural-network diagrams.
//! Layers are appended to a [`Model`] left to right, auto-sized from their
//! logical shape, centered on the canvas, and projected into the 2D faces of
//! pseudo-3D slabs, encoder volumes, and kernel convergence diagrams.
//!
//! Nothing here draws; see `netpainter-renderer` for the surface contract.

pub mod error;
pub mod geometry;
pub mod layer;
pub mod model;
pub mod palette;
pub mod settings;

pub use error::{Error, Result};
pub use geometry::{EncoderShape, Extent, Facet, KernelFrame, Point, Size, SlabFaces};
pub use layer::{BuiltinKind, EncoderSpec, KernelSpec, Layer, LayerKind, LayerSpec, LogicalShape, Rgb};
pub use model::{LegendEntry, Model};
pub use palette::Palette;
pub use settings::{CanvasSettings, FontSettings};
