//! Named scalar features of a position.
//!
//! A fixed, enumerable list of extractors used for statistics dumps and
//! tuning data. None of them feed back into the search evaluation, which is
//! the incremental interpolated score alone.

use super::attack_tables::piece_attacks;
use super::pst::MATERIAL_MG;
use super::types::{Color, Piece};
use super::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvalTerm {
    MidgameScore,
    EndgameScore,
    Phase,
    Interpolated,
    MaterialBalance,
    NonPawnMaterial(Color),
    MobilityBalance,
}

impl EvalTerm {
    pub const ALL: [EvalTerm; 8] = [
        EvalTerm::MidgameScore,
        EvalTerm::EndgameScore,
        EvalTerm::Phase,
        EvalTerm::Interpolated,
        EvalTerm::MaterialBalance,
        EvalTerm::NonPawnMaterial(Color::White),
        EvalTerm::NonPawnMaterial(Color::Black),
        EvalTerm::MobilityBalance,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EvalTerm::MidgameScore => "mg_score",
            EvalTerm::EndgameScore => "eg_score",
            EvalTerm::Phase => "phase",
            EvalTerm::Interpolated => "interpolated",
            EvalTerm::MaterialBalance => "material_balance",
            EvalTerm::NonPawnMaterial(Color::White) => "npm_white",
            EvalTerm::NonPawnMaterial(Color::Black) => "npm_black",
            EvalTerm::MobilityBalance => "mobility_balance",
        }
    }

    /// Value of this term, White-positive where it has a sign
    #[must_use]
    pub fn extract(self, pos: &Position) -> i32 {
        match self {
            EvalTerm::MidgameScore => pos.mg_score(),
            EvalTerm::EndgameScore => pos.eg_score(),
            EvalTerm::Phase => pos.phase(),
            EvalTerm::Interpolated => pos.interpolated_score(),
            EvalTerm::MaterialBalance => {
                material(pos, Color::White, &Piece::ALL) - material(pos, Color::Black, &Piece::ALL)
            }
            EvalTerm::NonPawnMaterial(color) => material(pos, color, &NON_PAWN),
            EvalTerm::MobilityBalance => mobility(pos, Color::White) - mobility(pos, Color::Black),
        }
    }
}

const NON_PAWN: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// Midgame material of the given piece kinds
fn material(pos: &Position, color: Color, pieces: &[Piece]) -> i32 {
    pieces
        .iter()
        .map(|&p| pos.pieces(color, p).popcount() as i32 * MATERIAL_MG[p.index()])
        .sum()
}

/// Pseudo-legal target squares of minor and major pieces
fn mobility(pos: &Position, color: Color) -> i32 {
    let occ = pos.occupied();
    let own = pos.occupancy(color);
    NON_PAWN
        .iter()
        .flat_map(|&p| pos.pieces(color, p).iter().map(move |sq| (p, sq)))
        .map(|(p, sq)| (piece_attacks(p, sq, occ) & !own).popcount() as i32)
        .sum()
}

/// `(name, value)` for every term in `EvalTerm::ALL` order
#[must_use]
pub fn eval_report(pos: &Position) -> Vec<(&'static str, i32)> {
    EvalTerm::ALL
        .iter()
        .map(|term| (term.name(), term.extract(pos)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(EvalTerm::MaterialBalance.extract(&pos), 0);
        assert_eq!(EvalTerm::MobilityBalance.extract(&pos), 0);
        assert_eq!(
            EvalTerm::NonPawnMaterial(Color::White).extract(&pos),
            EvalTerm::NonPawnMaterial(Color::Black).extract(&pos)
        );
        assert_eq!(EvalTerm::Phase.extract(&pos), 0);
    }

    #[test]
    fn report_lists_every_term_once() {
        let report = eval_report(&Position::startpos());
        assert_eq!(report.len(), EvalTerm::ALL.len());
        let mut names: Vec<&str> = report.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EvalTerm::ALL.len());
    }

    #[test]
    fn extra_queen_shows_up() {
        let pos: Position = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().expect("valid FEN");
        assert_eq!(
            EvalTerm::MaterialBalance.extract(&pos),
            MATERIAL_MG[Piece::Queen.index()]
        );
        assert_eq!(EvalTerm::NonPawnMaterial(Color::Black).extract(&pos), 0);
        assert!(EvalTerm::MobilityBalance.extract(&pos) > 0);
    }
}
