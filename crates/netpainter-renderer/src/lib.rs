//! # NetPainter Renderer
//!
//! Turns a laid-out [`netpainter_core::Model`] into drawing primitives.
//! Backends implement [`DrawingSurface`]; [`paint`] drives them in the fixed
//! order legend → layers (with kernel diagrams) → notations.
//!
//! [`RecordingSurface`] captures the primitive stream as serializable
//! [`DrawCommand`]s, which is what the tests inspect.

pub mod painter;
pub mod render_data;
pub mod surface;

pub use painter::{paint, paint_encoder, paint_kernel, paint_slab, DrawOptions};
pub use render_data::{DrawCommand, RecordingSurface};
pub use surface::{DrawingSurface, StrokeStyle, TextStyle};
