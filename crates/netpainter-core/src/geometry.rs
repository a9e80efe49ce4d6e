use serde::{Deserialize, Serialize};

/// Foreshortening divisor applied to the depth (length) axis, roughly `2 * sqrt(2)`.
pub const DEPTH_DIVISOR: f64 = 2.828;

/// Divisor used only when placing notation text above a layer.
/// Not interchangeable with [`DEPTH_DIVISOR`].
pub const NOTATION_DEPTH_DIVISOR: f64 = 2.8;

/// An encoder gets its upper filler triangle when `width < length / ENCODER_FILLER_DIVISOR`.
pub const ENCODER_FILLER_DIVISOR: f64 = 1.414;

/// Shading multipliers for the three visible slab faces.
pub const FRONT_SHADE: f64 = 0.8;
pub const TOP_SHADE: f64 = 1.2;
pub const SIDE_SHADE: f64 = 1.0;

/// A 2D point in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Width and height of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Logical box extent of a drawn layer, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Vertical extent.
    pub height: f64,
    /// Diagonal depth axis.
    pub length: f64,
    /// Extent along the baseline.
    pub width: f64,
}

impl Extent {
    pub fn new(height: f64, length: f64, width: f64) -> Self {
        Self {
            height,
            length,
            width,
        }
    }
}

/// A filled polygon with the shading multiplier to apply to its base color.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub vertices: Vec<Point>,
    pub shade: f64,
}

impl Facet {
    fn new(vertices: Vec<Point>, shade: f64) -> Self {
        Self { vertices, shade }
    }
}

/// The three visible faces of a slab under the oblique projection.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabFaces {
    /// Top-left corner of the front rectangle.
    pub front_origin: Point,
    pub front_size: Size,
    pub top: [Point; 4],
    pub side: [Point; 4],
}

impl SlabFaces {
    /// Project a slab whose left face is centered on `anchor`.
    pub fn project(anchor: Point, extent: Extent) -> Self {
        let Extent {
            height,
            length,
            width,
        } = extent;
        let depth = length / DEPTH_DIVISOR;

        let top_y = anchor.y - height / 2.0 - depth;
        let middle_y = anchor.y - height / 2.0 + depth;
        let bottom_y = anchor.y + height / 2.0 + depth;
        let left_x = anchor.x - depth + width;
        let right_x = anchor.x + depth + width;

        Self {
            front_origin: Point::new(left_x - width, middle_y),
            front_size: Size::new(width, height),
            top: [
                Point::new(left_x - width, middle_y),
                Point::new(right_x - width, top_y),
                Point::new(right_x, top_y),
                Point::new(left_x, middle_y),
            ],
            side: [
                Point::new(left_x, bottom_y),
                Point::new(left_x, middle_y),
                Point::new(right_x, top_y),
                Point::new(right_x, anchor.y + height / 2.0 - depth),
            ],
        }
    }
}

/// Cross-section corners of a square face of depth `length` and `height`,
/// centered on `center`, scaled by `gamma`.
fn section_corners(center: Point, length: f64, height: f64, gamma: f64) -> [Point; 4] {
    let depth = length / DEPTH_DIVISOR;
    let half = 0.5 * height;
    [
        Point::new(center.x - gamma * depth, center.y - gamma * (half - depth)),
        Point::new(center.x + gamma * depth, center.y - gamma * (half + depth)),
        Point::new(center.x + gamma * depth, center.y + gamma * (half - depth)),
        Point::new(center.x - gamma * depth, center.y + gamma * (half + depth)),
    ]
}

/// Triangle decomposition of an encoder volume.
///
/// The left and right cross-sections converge on a centroid at half the
/// width. Which triangles are emitted depends on the aspect of the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderShape {
    pub left: [Point; 4],
    pub right: [Point; 4],
    pub centroid: Point,
    upper_filler: bool,
    right_cap: bool,
}

impl EncoderShape {
    pub fn project(anchor: Point, extent: Extent) -> Self {
        let Extent {
            height,
            length,
            width,
        } = extent;
        Self {
            left: section_corners(anchor, length, height, 1.0),
            right: section_corners(anchor.translate(width, 0.0), length, height, 1.0),
            centroid: Point::new(anchor.x + width / 2.0, anchor.y),
            upper_filler: width < length / ENCODER_FILLER_DIVISOR,
            right_cap: width > height,
        }
    }

    /// Whether the left-side upper filler triangle is emitted.
    pub fn has_upper_filler(&self) -> bool {
        self.upper_filler
    }

    /// Whether the right cap triangle is emitted instead of the left-lower one.
    pub fn has_right_cap(&self) -> bool {
        self.right_cap
    }

    /// Facets in paint order.
    pub fn facets(&self) -> Vec<Facet> {
        let [l1, l2, l3, l4] = self.left;
        let [r1, r2, r3, r4] = self.right;
        let c = self.centroid;

        let mut facets = Vec::with_capacity(6);
        if self.upper_filler {
            facets.push(Facet::new(vec![l2, l3, c], 0.8));
        }
        facets.push(Facet::new(vec![l1, l2, c], 1.2));
        facets.push(Facet::new(vec![l1, l4, c], 0.7));
        if self.right_cap {
            facets.push(Facet::new(vec![r1, r2, c], 1.3));
        } else {
            facets.push(Facet::new(vec![l4, l3, c], 0.5));
        }
        facets.push(Facet::new(vec![r1, r4, c], 0.8));
        facets.push(Facet::new(vec![r1, r2, r3, r4], 1.0));
        facets
    }
}

/// Scale factor of the kernel square relative to the slab face.
///
/// Falls back to 0.4 when either resolution is zero.
pub fn kernel_gamma(resolution_x: u32, resolution_y: u32, kernel_x: u32) -> f64 {
    if resolution_x == 0 || resolution_y == 0 {
        return 0.4;
    }
    let rate = f64::from(kernel_x) / f64::from(resolution_x.max(resolution_y));
    0.1 + 0.9 * rate.sqrt()
}

/// Geometry of a kernel convergence diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelFrame {
    pub corners: [Point; 4],
    pub target: Point,
}

impl KernelFrame {
    /// `anchor` is the center of the slab's right face; the target lies
    /// `reach` units further along the baseline.
    pub fn project(anchor: Point, extent: Extent, gamma: f64, reach: f64) -> Self {
        Self {
            corners: section_corners(anchor, extent.length, extent.height, gamma),
            target: anchor.translate(reach, 0.0),
        }
    }

    /// Closed outline through the four corners.
    pub fn outline(&self) -> Vec<Point> {
        let mut points = self.corners.to_vec();
        points.push(self.corners[0]);
        points
    }

    /// Baseline position of the horizontal kernel size label.
    pub fn x_label_position(&self) -> Point {
        self.corners[0].midpoint(&self.corners[1]).translate(0.0, -15.0)
    }

    /// Baseline position of the vertical kernel size label.
    pub fn y_label_position(&self) -> Point {
        self.corners[3].midpoint(&self.corners[0]).translate(-20.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_slab_faces() {
        let faces = SlabFaces::project(Point::new(100.0, 500.0), Extent::new(40.0, 28.28, 20.0));
        let d = 28.28 / DEPTH_DIVISOR;
        assert!(close(faces.front_origin.x, 100.0 - d));
        assert!(close(faces.front_origin.y, 500.0 - 20.0 + d));
        assert_eq!(faces.front_size, Size::new(20.0, 40.0));
        // top face shares its lower edge with the front rectangle
        assert_eq!(faces.top[0], faces.front_origin);
        assert!(close(faces.top[3].x - faces.top[0].x, 20.0));
        assert!(close(faces.top[1].y, 500.0 - 20.0 - d));
        // side face hangs off the right edge of the front face
        assert!(close(faces.side[0].x, 100.0 - d + 20.0));
        assert!(close(faces.side[0].y, 500.0 + 20.0 + d));
        assert!(close(faces.side[3].y, 500.0 + 20.0 - d));
    }

    #[test]
    fn test_zero_extent_collapses() {
        let faces = SlabFaces::project(Point::new(10.0, 10.0), Extent::new(0.0, 0.0, 0.0));
        for p in faces.top.iter().chain(faces.side.iter()) {
            assert_eq!(*p, Point::new(10.0, 10.0));
        }
    }

    #[test]
    fn test_kernel_gamma() {
        assert!(close(kernel_gamma(256, 256, 64), 0.55));
        assert!(close(kernel_gamma(0, 256, 64), 0.4));
        assert!(close(kernel_gamma(256, 0, 3), 0.4));
        // larger side of the resolution is the denominator
        assert!(close(kernel_gamma(64, 256, 64), 0.55));
    }

    #[test]
    fn test_kernel_frame() {
        let frame = KernelFrame::project(
            Point::new(200.0, 500.0),
            Extent::new(100.0, 28.28, 10.0),
            0.5,
            10.0,
        );
        let d = 28.28 / DEPTH_DIVISOR;
        assert!(close(frame.corners[0].x, 200.0 - 0.5 * d));
        assert!(close(frame.corners[1].y, 500.0 - 0.5 * (50.0 + d)));
        assert!(close(frame.corners[2].y, 500.0 + 0.5 * (50.0 - d)));
        assert_eq!(frame.target, Point::new(210.0, 500.0));
        let outline = frame.outline();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], outline[4]);
        let label = frame.x_label_position();
        assert!(close(label.y, (frame.corners[0].y + frame.corners[1].y) / 2.0 - 15.0));
    }

    #[test]
    fn test_encoder_wide_and_flat() {
        // width > height, width >= length / 1.414
        let shape = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(100.0, 100.0, 400.0));
        assert!(!shape.has_upper_filler());
        assert!(shape.has_right_cap());
        let shades: Vec<f64> = shape.facets().iter().map(|f| f.shade).collect();
        assert_eq!(shades, vec![1.2, 0.7, 1.3, 0.8, 1.0]);
    }

    #[test]
    fn test_encoder_narrow_and_tall() {
        let shape = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(300.0, 10.0, 100.0));
        assert!(!shape.has_upper_filler());
        assert!(!shape.has_right_cap());
        let facets = shape.facets();
        assert_eq!(facets.len(), 5);
        assert_eq!(facets[2].shade, 0.5);
        assert_eq!(facets[2].vertices[0], shape.left[3]);
    }

    #[test]
    fn test_encoder_upper_filler() {
        // 50 < 300 / 1.414
        let shape = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(30.0, 300.0, 50.0));
        assert!(shape.has_upper_filler());
        assert!(shape.has_right_cap());
        let facets = shape.facets();
        assert_eq!(facets.len(), 6);
        assert_eq!(facets[0].shade, 0.8);
        assert_eq!(facets[0].vertices, vec![shape.left[1], shape.left[2], shape.centroid]);
    }

    #[test]
    fn test_encoder_thresholds_are_strict() {
        // width == height selects the left-lower triangle
        let equal = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(50.0, 1.0, 50.0));
        assert!(!equal.has_right_cap());
        // length / 1.414 is just above 20
        let above = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(10.0, 28.28, 21.0));
        assert!(!above.has_upper_filler());
        let below = EncoderShape::project(Point::new(0.0, 0.0), Extent::new(10.0, 28.28, 19.0));
        assert!(below.has_upper_filler());
    }

    #[test]
    fn test_encoder_centroid() {
        let shape = EncoderShape::project(Point::new(30.0, 40.0), Extent::new(300.0, 300.0, 400.0));
        assert_eq!(shape.centroid, Point::new(230.0, 40.0));
        assert!(close(shape.right[0].x - shape.left[0].x, 400.0));
    }
}
