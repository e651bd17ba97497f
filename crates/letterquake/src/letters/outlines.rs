//! Stencil outline art for the 26 letters, in raw art units (average glyph
//! width [`AVG_LETTER_WIDTH_RAW`](crate::config::AVG_LETTER_WIDTH_RAW),
//! cap height 2000, y-up). Simply-connected glyphs are single concave
//! outlines; glyphs whose true shape encloses holes (A B D O P Q R) are
//! built from several stroke outlines instead, since a collision outline
//! cannot carry an interior loop.
//!
//! Outlines must be simple (non-self-intersecting); that is an authoring
//! precondition of the decomposer, checked by the tests below, not at
//! runtime.

use crate::geometry::Polygon;
use crate::letters::Letter;

/// Glyph grid constants (raw art units).
const W: f32 = 1400.0; // glyph width
const H: f32 = 2000.0; // cap height
const T: f32 = 350.0; // stroke thickness

/// The outlines making up one glyph. Never empty.
pub fn outlines(letter: Letter) -> Vec<Polygon> {
    match letter {
        Letter::A => vec![
            // Two legs meeting at the apex, plus the crossbar.
            poly(&[[0.0, 0.0], [350.0, 0.0], [875.0, H], [525.0, H]]),
            poly(&[[1050.0, 0.0], [1400.0, 0.0], [875.0, H], [525.0, H]]),
            bar(200.0, 700.0, 1200.0, 1050.0),
        ],
        Letter::B => vec![
            bar(0.0, 0.0, T, H),
            bar(0.0, 1650.0, 1250.0, H),
            bar(0.0, 825.0, 1250.0, 1175.0),
            bar(0.0, 0.0, 1250.0, T),
            bar(1050.0, 1100.0, W, 1700.0),
            bar(1050.0, 300.0, W, 900.0),
        ],
        Letter::C => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, T],
            [T, T],
            [T, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
        ])],
        Letter::D => vec![
            bar(0.0, 0.0, T, H),
            bar(0.0, 1650.0, 1150.0, H),
            bar(0.0, 0.0, 1150.0, T),
            bar(1050.0, 250.0, W, 1750.0),
        ],
        Letter::E => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, T],
            [T, T],
            [T, 825.0],
            [1100.0, 825.0],
            [1100.0, 1175.0],
            [T, 1175.0],
            [T, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
        ])],
        Letter::F => vec![poly(&[
            [0.0, 0.0],
            [T, 0.0],
            [T, 825.0],
            [1100.0, 825.0],
            [1100.0, 1175.0],
            [T, 1175.0],
            [T, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
        ])],
        Letter::G => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, 1000.0],
            [700.0, 1000.0],
            [700.0, 650.0],
            [1050.0, 650.0],
            [1050.0, T],
            [T, T],
            [T, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
        ])],
        Letter::H => vec![poly(&[
            [0.0, 0.0],
            [T, 0.0],
            [T, 825.0],
            [1050.0, 825.0],
            [1050.0, 0.0],
            [W, 0.0],
            [W, H],
            [1050.0, H],
            [1050.0, 1175.0],
            [T, 1175.0],
            [T, H],
            [0.0, H],
        ])],
        Letter::I => vec![poly(&[
            // Serifed I: top and bottom bars joined by the stem.
            [0.0, 0.0],
            [W, 0.0],
            [W, T],
            [875.0, T],
            [875.0, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
            [0.0, 1650.0],
            [525.0, 1650.0],
            [525.0, T],
            [0.0, T],
        ])],
        Letter::J => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, H],
            [1050.0, H],
            [1050.0, T],
            [T, T],
            [T, 700.0],
            [0.0, 700.0],
        ])],
        Letter::K => vec![
            bar(0.0, 0.0, T, H),
            poly(&[[350.0, 825.0], [350.0, 1175.0], [1000.0, H], [1400.0, H]]),
            poly(&[[350.0, 1175.0], [350.0, 825.0], [1000.0, 0.0], [1400.0, 0.0]]),
        ],
        Letter::L => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, T],
            [T, T],
            [T, H],
            [0.0, H],
        ])],
        Letter::M => vec![poly(&[
            [0.0, 0.0],
            [T, 0.0],
            [T, 1350.0],
            [700.0, 850.0],
            [1050.0, 1350.0],
            [1050.0, 0.0],
            [W, 0.0],
            [W, H],
            [1030.0, H],
            [700.0, 1480.0],
            [370.0, H],
            [0.0, H],
        ])],
        Letter::N => vec![poly(&[
            [0.0, 0.0],
            [T, 0.0],
            [T, 1250.0],
            [1050.0, 0.0],
            [W, 0.0],
            [W, H],
            [1050.0, H],
            [1050.0, 750.0],
            [T, H],
            [0.0, H],
        ])],
        Letter::O => vec![
            // Ring of four non-overlapping bars.
            bar(0.0, 0.0, T, H),
            bar(1050.0, 0.0, W, H),
            bar(T, 1650.0, 1050.0, H),
            bar(T, 0.0, 1050.0, T),
        ],
        Letter::P => vec![
            bar(0.0, 0.0, T, H),
            bar(T, 1650.0, 1050.0, H),
            bar(T, 825.0, 1050.0, 1175.0),
            bar(1050.0, 825.0, W, H),
        ],
        Letter::Q => vec![
            bar(0.0, 0.0, T, H),
            bar(1050.0, 0.0, W, H),
            bar(T, 1650.0, 1050.0, H),
            bar(T, 0.0, 1050.0, T),
            poly(&[[850.0, 500.0], [1100.0, 500.0], [1400.0, 0.0], [1100.0, 0.0]]),
        ],
        Letter::R => vec![
            bar(0.0, 0.0, T, H),
            bar(T, 1650.0, 1050.0, H),
            bar(T, 825.0, 1050.0, 1175.0),
            bar(1050.0, 825.0, W, H),
            poly(&[[600.0, 825.0], [950.0, 825.0], [1400.0, 0.0], [1050.0, 0.0]]),
        ],
        Letter::S => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, 1175.0],
            [T, 1175.0],
            [T, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
            [0.0, 825.0],
            [1050.0, 825.0],
            [1050.0, T],
            [0.0, T],
        ])],
        Letter::T => vec![poly(&[
            [525.0, 0.0],
            [875.0, 0.0],
            [875.0, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
            [0.0, 1650.0],
            [525.0, 1650.0],
        ])],
        Letter::U => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, H],
            [1050.0, H],
            [1050.0, T],
            [T, T],
            [T, H],
            [0.0, H],
        ])],
        Letter::V => vec![chevron(0.0, W)],
        Letter::W => vec![chevron(0.0, 740.0), chevron(660.0, 740.0)],
        Letter::X => vec![
            poly(&[[0.0, 0.0], [T, 0.0], [W, H], [1050.0, H]]),
            poly(&[[1050.0, 0.0], [W, 0.0], [T, H], [0.0, H]]),
        ],
        Letter::Y => vec![
            bar(525.0, 0.0, 875.0, 950.0),
            poly(&[[525.0, 800.0], [875.0, 800.0], [350.0, H], [0.0, H]]),
            poly(&[[525.0, 800.0], [875.0, 800.0], [1400.0, H], [1050.0, H]]),
        ],
        Letter::Z => vec![poly(&[
            [0.0, 0.0],
            [W, 0.0],
            [W, T],
            [490.0, 1650.0],
            [W, 1650.0],
            [W, H],
            [0.0, H],
            [0.0, 1650.0],
            [910.0, T],
            [0.0, T],
        ])],
    }
}

fn poly(points: &[[f32; 2]]) -> Polygon {
    Polygon::from_points(points)
}

/// Axis-aligned stroke from (x0, y0) to (x1, y1).
fn bar(x0: f32, y0: f32, x1: f32, y1: f32) -> Polygon {
    poly(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
}

/// V-shaped stroke spanning `[x0, x0 + width]`, feet at y = 0.
fn chevron(x0: f32, width: f32) -> Polygon {
    let x = |f: f32| x0 + f * width;
    poly(&[
        [x(0.375), 0.0],
        [x(0.625), 0.0],
        [x(1.0), H],
        [x(0.714), H],
        [x(0.5), 650.0],
        [x(0.286), H],
        [x(0.0), H],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::decompose;
    use crate::geometry::polygon::COLLINEAR_EPSILON;
    use approx::assert_relative_eq;

    #[test]
    fn every_letter_has_outlines_with_area() {
        for letter in Letter::ALL {
            let outlines = outlines(letter);
            assert!(!outlines.is_empty(), "{:?} has no outlines", letter);
            for outline in &outlines {
                assert!(
                    outline.area() > 0.0,
                    "{:?} has a zero-area outline",
                    letter
                );
            }
        }
    }

    #[test]
    fn every_outline_decomposes_into_convex_fragments() {
        for letter in Letter::ALL {
            for outline in outlines(letter) {
                let fragments = decompose(&outline);
                assert!(!fragments.is_empty(), "{:?} produced no fragments", letter);
                let total: f32 = fragments.iter().map(|f| f.area()).sum();
                assert_relative_eq!(total, outline.area(), max_relative = 1e-3);
                for fragment in &fragments {
                    assert!(
                        fragment.is_convex(COLLINEAR_EPSILON),
                        "{:?} yielded a non-convex fragment",
                        letter
                    );
                }
            }
        }
    }

    #[test]
    fn glyph_widths_sit_on_the_shared_grid() {
        for letter in Letter::ALL {
            let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
            for outline in outlines(letter) {
                let (min, max) = outline.aabb();
                min_x = min_x.min(min.x);
                max_x = max_x.max(max.x);
            }
            let width = max_x - min_x;
            assert!(
                (w_low()..=w_high()).contains(&width),
                "{:?} width {} off grid",
                letter,
                width
            );
        }
    }

    fn w_low() -> f32 {
        W * 0.9
    }

    fn w_high() -> f32 {
        W * 1.1
    }
}
