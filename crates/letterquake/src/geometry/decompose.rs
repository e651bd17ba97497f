use glam::Vec2;

use crate::geometry::polygon::{cross, Polygon, COLLINEAR_EPSILON};

/// Fragments smaller than this fraction of the input area are dropped;
/// they only ever appear as numerical slivers from the clipping fallback.
const MIN_FRAGMENT_AREA_RATIO: f32 = 1e-7;

/// Split a simple (possibly concave) outline into convex fragments whose
/// union tiles the input area. The outline is normalized to CCW winding and
/// pruned of near-collinear vertices first.
///
/// Triangulates by ear clipping, then greedily merges fragments across
/// shared diagonals while the union stays convex (Hertel–Mehlhorn style).
/// Fully deterministic: fixed scan order, no randomization.
///
/// Precondition: the outline must not self-intersect. Self-intersecting
/// input yields an undefined decomposition; glyph art is validated offline,
/// not at runtime.
pub fn decompose(outline: &Polygon) -> Vec<Polygon> {
    let mut normalized = outline.clone();
    normalized.ensure_ccw();
    normalized.prune_collinear(COLLINEAR_EPSILON);
    if normalized.len() < 3 {
        return Vec::new();
    }
    if normalized.is_convex(COLLINEAR_EPSILON) {
        return vec![normalized];
    }

    let verts = &normalized.vertices;
    let mut pieces: Vec<Vec<usize>> = triangulate(verts)
        .into_iter()
        .map(|t| t.to_vec())
        .collect();

    // Greedy merge across shared diagonals, restarting after every merge so
    // the scan order stays deterministic.
    'merge: loop {
        for a in 0..pieces.len() {
            for b in (a + 1)..pieces.len() {
                if let Some(merged) = try_merge(&pieces[a], &pieces[b], verts) {
                    pieces[a] = merged;
                    pieces.remove(b);
                    continue 'merge;
                }
            }
        }
        break;
    }

    let min_area = normalized.area() * MIN_FRAGMENT_AREA_RATIO;
    pieces
        .into_iter()
        .map(|indices| Polygon::new(indices.into_iter().map(|i| verts[i]).collect()))
        .filter(|p| p.area() > min_area)
        .collect()
}

/// Ear-clipping triangulation of a CCW simple polygon, returning index
/// triples into `verts`.
fn triangulate(verts: &[Vec2]) -> Vec<[usize; 3]> {
    let mut ring: Vec<usize> = (0..verts.len()).collect();
    let mut triangles = Vec::with_capacity(verts.len().saturating_sub(2));

    while ring.len() > 3 {
        let n = ring.len();
        let mut clipped = false;
        for i in 0..n {
            let i0 = ring[(i + n - 1) % n];
            let i1 = ring[i];
            let i2 = ring[(i + 1) % n];
            let (a, b, c) = (verts[i0], verts[i1], verts[i2]);
            // An ear needs a convex corner...
            if cross(b - a, c - b) <= 0.0 {
                continue;
            }
            // ...with no remaining vertex inside it.
            let blocked = ring.iter().any(|&j| {
                j != i0 && j != i1 && j != i2 && point_in_triangle(verts[j], a, b, c)
            });
            if !blocked {
                triangles.push([i0, i1, i2]);
                ring.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            // Numerical dead end (should not happen for simple input after
            // pruning). Clip the widest convex corner so we always terminate.
            let n = ring.len();
            let widest = (0..n)
                .max_by(|&x, &y| {
                    let turn = |i: usize| {
                        let a = verts[ring[(i + n - 1) % n]];
                        let b = verts[ring[i]];
                        let c = verts[ring[(i + 1) % n]];
                        cross(b - a, c - b)
                    };
                    turn(x).total_cmp(&turn(y))
                })
                .unwrap_or(0);
            triangles.push([
                ring[(widest + n - 1) % n],
                ring[widest],
                ring[(widest + 1) % n],
            ]);
            ring.remove(widest);
        }
    }
    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

/// Merge two fragments if they share a diagonal and the union is convex.
/// In a triangulation-derived piece set two fragments share at most one edge.
fn try_merge(p: &[usize], q: &[usize], verts: &[Vec2]) -> Option<Vec<usize>> {
    let (np, nq) = (p.len(), q.len());
    for i in 0..np {
        let u = p[i];
        let v = p[(i + 1) % np];
        for j in 0..nq {
            if q[j] == v && q[(j + 1) % nq] == u {
                // Walk all of p starting just past the shared edge, then the
                // interior vertices of q. Both are CCW, so the result is too.
                let mut merged = Vec::with_capacity(np + nq - 2);
                for k in 0..np {
                    merged.push(p[(i + 1 + k) % np]);
                }
                for k in 0..nq - 2 {
                    merged.push(q[(j + 2 + k) % nq]);
                }
                if indices_convex(&merged, verts) {
                    return Some(merged);
                }
                return None;
            }
        }
    }
    None
}

fn indices_convex(indices: &[usize], verts: &[Vec2]) -> bool {
    let n = indices.len();
    for i in 0..n {
        let a = verts[indices[i]];
        let b = verts[indices[(i + 1) % n]];
        let c = verts[indices[(i + 2) % n]];
        if cross(b - a, c - b) < -COLLINEAR_EPSILON {
            return false;
        }
    }
    true
}

/// Boundary counts as inside, which keeps ears conservative.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d0 = cross(b - a, p - a);
    let d1 = cross(c - b, p - b);
    let d2 = cross(a - c, p - c);
    d0 >= -f32::EPSILON && d1 >= -f32::EPSILON && d2 >= -f32::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ell() -> Polygon {
        Polygon::from_points(&[
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
        ])
    }

    fn total_area(fragments: &[Polygon]) -> f32 {
        fragments.iter().map(|f| f.area()).sum()
    }

    #[test]
    fn convex_input_passes_through() {
        let square =
            Polygon::from_points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let fragments = decompose(&square);
        assert_eq!(fragments.len(), 1);
        assert_relative_eq!(fragments[0].area(), 1.0);
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let mut square =
            Polygon::from_points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        square.vertices.reverse();
        let fragments = decompose(&square);
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].is_ccw());
    }

    #[test]
    fn ell_shape_splits_into_convex_fragments() {
        let fragments = decompose(&ell());
        assert!(fragments.len() >= 2);
        for f in &fragments {
            assert!(f.is_convex(COLLINEAR_EPSILON), "fragment not convex: {:?}", f);
            assert!(f.area() > 0.0);
        }
        assert_relative_eq!(total_area(&fragments), ell().area(), max_relative = 1e-4);
    }

    #[test]
    fn merge_beats_raw_triangulation() {
        // An L has 6 vertices → 4 triangles, but only needs 2 convex pieces.
        let fragments = decompose(&ell());
        assert!(fragments.len() <= 3, "expected merged fragments, got {}", fragments.len());
    }

    #[test]
    fn comb_shape_area_is_conserved() {
        // E-like comb with three teeth; heavily concave.
        let comb = Polygon::from_points(&[
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [3.0, 2.0],
            [3.0, 3.0],
            [1.0, 3.0],
            [1.0, 4.0],
            [4.0, 4.0],
            [4.0, 5.0],
            [0.0, 5.0],
        ]);
        let fragments = decompose(&comb);
        assert_relative_eq!(total_area(&fragments), comb.area(), max_relative = 1e-4);
        for f in &fragments {
            assert!(f.is_convex(COLLINEAR_EPSILON));
            assert!(f.area() > 0.0);
        }
    }

    #[test]
    fn decomposition_is_deterministic() {
        let a = decompose(&ell());
        let b = decompose(&ell());
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        let line = Polygon::from_points(&[[0.0, 0.0], [1.0, 0.0]]);
        assert!(decompose(&line).is_empty());
    }
}
