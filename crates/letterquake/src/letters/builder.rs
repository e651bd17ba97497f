use glam::Vec2;

use crate::config::{GameConfig, AVG_LETTER_WIDTH_RAW};
use crate::geometry::{decompose, Polygon};
use crate::letters::{outlines, Letter};
use crate::{Error, Result};

/// One convex collision shape of a compound letter body. Vertices are
/// centroid-local; `offset` places the fragment relative to the body origin
/// (the compound center of mass).
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub vertices: Vec<Vec2>,
    pub offset: Vec2,
    pub area: f32,
}

/// Area-weighted average of the fragment placements. Exposed as a pure
/// function so the two-pass center-of-mass correction is testable on its
/// own (uniform density, so area stands in for mass).
pub fn compute_compound_center_of_mass(fragments: &[Fragment]) -> Vec2 {
    let total: f32 = fragments.iter().map(|f| f.area).sum();
    if total <= f32::EPSILON {
        return Vec2::ZERO;
    }
    fragments
        .iter()
        .map(|f| f.offset * f.area)
        .sum::<Vec2>()
        / total
}

/// The single art-units → meters factor. Identical for every letter so all
/// glyphs keep their relative sizes (size parity invariant).
pub fn letter_scale(config: &GameConfig) -> f32 {
    config.desired_letter_width_m / AVG_LETTER_WIDTH_RAW
}

/// Scale the outlines, decompose each into convex fragments, express every
/// fragment in its own centroid frame, then re-anchor all offsets on the
/// true compound center of mass.
///
/// The second pass matters: per-fragment centroids do not sum to the
/// aggregate centroid once fragment areas differ, and a body origin away
/// from the center of mass skews the inertia the physics engine derives.
pub fn build_fragments(letter_outlines: &[Polygon], scale: f32) -> Result<Vec<Fragment>> {
    if letter_outlines.is_empty() {
        return Err(Error::EmptyLetter);
    }
    let mut fragments = Vec::new();
    for outline in letter_outlines {
        for piece in decompose(&outline.scaled(scale)) {
            let centroid = piece.centroid();
            fragments.push(Fragment {
                vertices: piece.vertices.iter().map(|v| *v - centroid).collect(),
                offset: centroid,
                area: piece.area(),
            });
        }
    }
    if fragments.is_empty() {
        return Err(Error::DegenerateOutline);
    }
    let center = compute_compound_center_of_mass(&fragments);
    for fragment in &mut fragments {
        fragment.offset -= center;
    }
    Ok(fragments)
}

/// Convenience: fragments for a letter glyph at the configured scale.
pub fn letter_fragments(letter: Letter, config: &GameConfig) -> Result<Vec<Fragment>> {
    build_fragments(&outlines::outlines(letter), letter_scale(config))
}
