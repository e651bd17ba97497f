use glam::Vec2;

/// Tolerance used for collinearity pruning and convexity checks.
/// Cross products with magnitude below this count as a straight angle.
pub const COLLINEAR_EPSILON: f32 = 1e-5;

/// A closed polygonal outline. The last vertex connects back to the first
/// implicitly; callers must not duplicate the first vertex at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Build from raw `[x, y]` pairs (the format the outline art uses).
    pub fn from_points(points: &[[f32; 2]]) -> Self {
        Self {
            vertices: points.iter().map(|p| Vec2::new(p[0], p[1])).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area with sign: positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Force counter-clockwise winding, reversing in place if needed.
    pub fn ensure_ccw(&mut self) {
        if !self.is_ccw() {
            self.vertices.reverse();
        }
    }

    /// Area centroid. Falls back to the vertex average for degenerate
    /// (near-zero-area) outlines so callers always get a finite point.
    pub fn centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        if n == 0 {
            return Vec2::ZERO;
        }
        let area = self.signed_area();
        if area.abs() < f32::EPSILON {
            let sum: Vec2 = self.vertices.iter().copied().sum();
            return sum / n as f32;
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let w = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        Vec2::new(cx, cy) / (6.0 * area)
    }

    /// Drop vertices whose adjacent edges are parallel within `tolerance`,
    /// relative to the edge lengths. Slivers like these produce degenerate
    /// fragments in the decomposer.
    pub fn prune_collinear(&mut self, tolerance: f32) {
        loop {
            let n = self.vertices.len();
            if n <= 3 {
                return;
            }
            let mut removed = false;
            for i in 0..self.vertices.len() {
                let n = self.vertices.len();
                if n <= 3 {
                    return;
                }
                let prev = self.vertices[(i + n - 1) % n];
                let here = self.vertices[i];
                let next = self.vertices[(i + 1) % n];
                let e0 = here - prev;
                let e1 = next - here;
                let scale = e0.length() * e1.length();
                if scale <= f32::EPSILON || cross(e0, e1).abs() <= tolerance * scale {
                    self.vertices.remove(i);
                    removed = true;
                    break;
                }
            }
            if !removed {
                return;
            }
        }
    }

    /// Whether every interior angle is convex (for CCW outlines: every turn
    /// is a left turn, within tolerance).
    pub fn is_convex(&self, tolerance: f32) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            if cross(b - a, c - b) < -tolerance {
                return false;
            }
        }
        true
    }

    /// Axis-aligned bounding box as (min, max). Zero rect when empty.
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        if self.vertices.is_empty() {
            return (Vec2::ZERO, Vec2::ZERO);
        }
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        (min, max)
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v * factor).collect(),
        }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v + offset).collect(),
        }
    }
}

/// 2D cross product (z component of the 3D cross).
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon {
        Polygon::from_points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }

    #[test]
    fn square_area_and_centroid() {
        let square = unit_square();
        assert_relative_eq!(square.area(), 1.0);
        assert_relative_eq!(square.centroid().x, 0.5);
        assert_relative_eq!(square.centroid().y, 0.5);
    }

    #[test]
    fn winding_detection_and_normalization() {
        let mut cw = unit_square();
        cw.vertices.reverse();
        assert!(!cw.is_ccw());
        cw.ensure_ccw();
        assert!(cw.is_ccw());
        assert_relative_eq!(cw.area(), 1.0);
    }

    #[test]
    fn prune_removes_collinear_midpoint() {
        let mut poly = Polygon::from_points(&[
            [0.0, 0.0],
            [0.5, 0.0], // on the bottom edge
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]);
        poly.prune_collinear(COLLINEAR_EPSILON);
        assert_eq!(poly.len(), 4);
        assert_relative_eq!(poly.area(), 1.0);
    }

    #[test]
    fn convexity() {
        assert!(unit_square().is_convex(COLLINEAR_EPSILON));
        let ell = Polygon::from_points(&[
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ]);
        assert!(!ell.is_convex(COLLINEAR_EPSILON));
    }

    #[test]
    fn centroid_of_degenerate_outline_is_finite() {
        let line = Polygon::from_points(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let c = line.centroid();
        assert!(c.x.is_finite() && c.y.is_finite());
    }
}
