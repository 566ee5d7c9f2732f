//! IronBit engine: iterative-deepening principal-variation search over
//! the `ironbit_core` board, with a depth/age-aware transposition table,
//! null-move pruning, late-move reduction, killer/history move ordering
//! and SEE-based quiescence. One `Engine` session object owns all search
//! state; there are no process-wide singletons.

pub mod config;
pub mod controller;
pub mod eval;
pub mod ordering;
pub mod search;
pub mod see;
pub mod time_control;
pub mod tt;

pub use config::Config;
pub use controller::{Command, KeyInfo, SearchController};
pub use search::Engine;
pub use see::see;
pub use time_control::{SearchLimits, TimeControl};
pub use tt::TransTable;

/// Mate score magnitude; actual mate scores are ply-adjusted below this.
pub const MATE: i32 = 30_000;
pub const MAX_EVAL: i32 = MATE;
pub const MIN_EVAL: i32 = -MATE;
/// Below any reachable score, including mates.
pub const NO_SCORE: i32 = MIN_EVAL - 1;
/// Deepest supported search ply; killer slots are sized by it.
pub const MAX_PLY: usize = 100;
