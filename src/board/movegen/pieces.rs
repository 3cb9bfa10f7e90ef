use super::super::attack_tables::{bishop_attacks, knight_attacks, line, rook_attacks};
use super::super::types::{Bitboard, Move, MoveList, Piece, Square};
use super::super::Position;
use super::{GenContext, GenMode};

fn push_targets(from: Square, targets: Bitboard, ctx: &GenContext, list: &mut MoveList) {
    for to in targets & ctx.capture_mask {
        list.push(Move::capture(from, to));
    }
    if ctx.mode == GenMode::All {
        for to in targets & ctx.quiet_mask {
            list.push(Move::quiet(from, to));
        }
    }
}

impl Position {
    /// Knight and slider moves for unpinned pieces
    pub(super) fn push_piece_moves(&self, ctx: &GenContext, list: &mut MoveList) {
        let free = !ctx.pinned;

        for from in self.pieces(ctx.us, Piece::Knight) & free {
            push_targets(from, knight_attacks(from), ctx, list);
        }
        for from in self.diagonal_sliders(ctx.us) & free {
            push_targets(from, bishop_attacks(from, ctx.all), ctx, list);
        }
        for from in self.orthogonal_sliders(ctx.us) & free {
            push_targets(from, rook_attacks(from, ctx.all), ctx, list);
        }
    }

    /// Moves of pinned pieces along their pin line. Only called when not in
    /// check; a pinned piece can never resolve a check. Pinned knights have
    /// no moves at all.
    pub(super) fn push_pinned_moves(&self, ctx: &GenContext, list: &mut MoveList) {
        let pinned = ctx.pinned & !self.pieces(ctx.us, Piece::Knight);

        for from in pinned & self.diagonal_sliders(ctx.us) {
            let targets = bishop_attacks(from, ctx.all) & line(ctx.king, from);
            push_targets(from, targets, ctx, list);
        }
        for from in pinned & self.orthogonal_sliders(ctx.us) {
            let targets = rook_attacks(from, ctx.all) & line(ctx.king, from);
            push_targets(from, targets, ctx, list);
        }
        for from in pinned & self.pieces(ctx.us, Piece::Pawn) {
            self.push_pinned_pawn(from, ctx, list);
        }
    }
}
