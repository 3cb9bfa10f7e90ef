//! Line masks for obstruction-difference slider attacks, plus the
//! `between` and `line` geometry tables.

use once_cell::sync::Lazy;

pub(crate) const HORIZONTAL: usize = 0;
pub(crate) const VERTICAL: usize = 1;
pub(crate) const DIAGONAL: usize = 2;
pub(crate) const ANTI_DIAGONAL: usize = 3;

/// (file, rank) step toward lower square indices for each direction.
/// The upper ray walks the negated step.
const LOWER_STEPS: [(i32, i32); 4] = [(-1, 0), (0, -1), (-1, -1), (1, -1)];

/// The two half-rays through a square along one direction.
#[derive(Clone, Copy, Default)]
pub(crate) struct LineMask {
    /// Squares below the origin (smaller indices)
    pub lower: u64,
    /// Squares above the origin (larger indices)
    pub upper: u64,
    /// `lower | upper`; never contains the origin
    pub combined: u64,
}

fn ray(sq: usize, (df, dr): (i32, i32)) -> u64 {
    let mut mask = 0u64;
    let mut file = (sq % 8) as i32 + df;
    let mut rank = (sq / 8) as i32 + dr;
    while (0..8).contains(&file) && (0..8).contains(&rank) {
        mask |= 1u64 << (rank * 8 + file);
        file += df;
        rank += dr;
    }
    mask
}

pub(crate) static LINE_MASKS: Lazy<[[LineMask; 64]; 4]> = Lazy::new(|| {
    let mut masks = [[LineMask::default(); 64]; 4];
    for (dir, &(df, dr)) in LOWER_STEPS.iter().enumerate() {
        for (sq, mask) in masks[dir].iter_mut().enumerate() {
            let lower = ray(sq, (df, dr));
            let upper = ray(sq, (-df, -dr));
            *mask = LineMask {
                lower,
                upper,
                combined: lower | upper,
            };
        }
    }
    masks
});

/// Attacks along one line given occupancy.
///
/// The nearest lower blocker is the most significant set bit of
/// `lower & occ`, the nearest upper blocker the least significant bit of
/// `upper & occ`. `2 * ls1b - ms1b` sets every bit from the lower blocker
/// up to and including the upper blocker; masking with the line keeps the
/// visible squares. With no lower blocker `ms1b` degenerates to bit 0, and
/// with no upper blocker the subtraction wraps and sets all high bits.
#[inline(always)]
pub(crate) fn line_attacks(occ: u64, mask: &LineMask) -> u64 {
    let lower = mask.lower & occ;
    let upper = mask.upper & occ;
    let ms1b = 0x8000_0000_0000_0000u64 >> (lower | 1).leading_zeros();
    let ls1b = upper & upper.wrapping_neg();
    let odiff = ls1b.wrapping_shl(1).wrapping_sub(ms1b);
    mask.combined & odiff
}

struct Geometry {
    between: [[u64; 64]; 64],
    line: [[u64; 64]; 64],
}

static GEOMETRY: Lazy<Box<Geometry>> = Lazy::new(|| {
    let mut geo = Box::new(Geometry {
        between: [[0; 64]; 64],
        line: [[0; 64]; 64],
    });
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            for dir in [HORIZONTAL, VERTICAL, DIAGONAL, ANTI_DIAGONAL] {
                let from_a = &LINE_MASKS[dir][a];
                if from_a.combined & (1u64 << b) == 0 {
                    continue;
                }
                let from_b = &LINE_MASKS[dir][b];
                geo.between[a][b] =
                    line_attacks(1u64 << b, from_a) & line_attacks(1u64 << a, from_b);
                geo.line[a][b] = from_a.combined | (1u64 << a);
            }
        }
    }
    geo
});

/// Squares strictly between `a` and `b` when they share a line, else 0
#[inline]
pub(crate) fn between(a: usize, b: usize) -> u64 {
    GEOMETRY.between[a][b]
}

/// The full line through `a` and `b` (edge to edge) when they share one, else 0
#[inline]
pub(crate) fn line(a: usize, b: usize) -> u64 {
    GEOMETRY.line[a][b]
}
