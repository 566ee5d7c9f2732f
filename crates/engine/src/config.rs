//! Engine configuration.
//!
//! The search constants are empirically tuned values carried over as
//! data; they are not derived from anything.

#[derive(Clone, Debug)]
pub struct Config {
    /// Transposition table budget in megabytes.
    pub tt_size_mb: usize,
    /// At this remaining depth and below, null-move verification uses a
    /// static quiescence probe instead of a reduced search.
    pub null_move_static_depth: i32,
    /// Depth reduction for the dynamic null-move verification search.
    pub null_move_reduction: i32,
    /// Minimum remaining depth before late moves are reduced at all.
    pub lmr_min_depth: i32,
    /// From this depth the reduction grows to depth / 3.
    pub lmr_deep_depth: i32,
    /// How many nodes between wall-clock checks of the stop flag.
    pub stop_check_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tt_size_mb: 64,
            null_move_static_depth: 3,
            null_move_reduction: 4,
            lmr_min_depth: 3,
            lmr_deep_depth: 5,
            stop_check_interval: 2048,
        }
    }
}
