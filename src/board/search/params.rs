/// Search tunables and pruning switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Null-move pruning on/off
    pub null_move: bool,
    /// Minimum remaining depth for a null-move try
    pub null_min_depth: i32,
    /// Late-move reductions on/off
    pub lmr: bool,
    /// LMR applies only above this depth
    pub lmr_min_depth: i32,
    /// LMR applies only to moves after this index
    pub lmr_min_move: usize,
    /// Half-width of the aspiration window in centipawns
    pub aspiration_window: i32,
    /// Transposition-table score cutoffs on/off; the hash move is used for
    /// ordering either way
    pub tt_cutoffs: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_move: true,
            null_min_depth: 2,
            lmr: true,
            lmr_min_depth: 2,
            lmr_min_move: 1,
            aspiration_window: 25,
            tt_cutoffs: true,
        }
    }
}

impl SearchParams {
    /// Every selective technique disabled, so that the search returns the
    /// same score as plain minimax over the same tree.
    #[must_use]
    pub fn unpruned() -> Self {
        SearchParams {
            null_move: false,
            lmr: false,
            tt_cutoffs: false,
            ..SearchParams::default()
        }
    }
}
