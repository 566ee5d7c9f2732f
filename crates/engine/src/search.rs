//! Iterative-deepening principal-variation search.
//!
//! One `Engine` owns the board, the transposition table, the killer and
//! history tables and the limits: a self-contained session, passed
//! around explicitly. The search itself is the classic shape — PVS over
//! an ordered move stream with null-move pruning and late-move
//! reductions, dropping into a SEE-based quiescence at the horizon.

use ironbit_core::movegen::gen_legal;
use ironbit_core::{fen, perft_divide, Bitboard, Board, Move, MoveList, ParseError, PieceType};

use crate::config::Config;
use crate::eval::{evaluate, sign_eval, PIECE_TYPE_VAL};
use crate::ordering::{History, Killers, MovePicker, STAGE_QUIET_VALUE};
use crate::see::see;
use crate::time_control::SearchLimits;
use crate::tt::{
    add_mate_ply, is_mate_score, score_type, TransTable, SCORE_EXACT, SCORE_LOWER, SCORE_UPPER,
};
use crate::{MATE, MAX_EVAL, MIN_EVAL, NO_SCORE};

/// Principal variation as a move list, child lines concatenated upward.
#[derive(Clone, Debug, Default)]
pub struct PvList(Vec<Move>);

impl PvList {
    pub fn new() -> PvList {
        PvList(Vec::new())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace this line with `mv` followed by `tail`.
    pub fn lead(&mut self, mv: Move, tail: &PvList) {
        self.0.clear();
        self.0.push(mv);
        self.0.extend_from_slice(&tail.0);
    }

    pub fn moves(&self) -> &[Move] {
        &self.0
    }
}

impl std::fmt::Display for PvList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, mv) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

/// Diagnostics for the `key` debug command.
#[derive(Clone, Copy, Debug)]
pub struct KeyInfo {
    pub key: u64,
    pub full_key: u64,
    pub index: u64,
    pub lock: u32,
}

/// A complete search session: board plus every table the search mutates.
/// Exactly one search runs on it at a time.
pub struct Engine {
    pub board: Board,
    pub tt: TransTable,
    pub killers: Killers,
    pub history: History,
    pub limits: SearchLimits,
    pub config: Config,
    pub nodes: u64,
}

impl Engine {
    pub fn new(config: Config) -> Engine {
        let mut limits = SearchLimits::new();
        limits.check_interval = config.stop_check_interval;
        Engine {
            board: fen::startpos(),
            tt: TransTable::new(config.tt_size_mb),
            killers: Killers::new(),
            history: History::new(),
            limits,
            config,
            nodes: 0,
        }
    }

    /// Reset for a fresh game: start position, cleared tables.
    pub fn new_game(&mut self) {
        self.board = fen::startpos();
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    /// Load a position (or the start position) and apply a move list.
    /// Fails without touching the current position.
    pub fn set_position(&mut self, fen_str: Option<&str>, moves: &[&str]) -> Result<(), ParseError> {
        let mut board = match fen_str {
            Some(s) => fen::parse_fen(s)?,
            None => fen::startpos(),
        };
        fen::apply_moves(&mut board, moves)?;
        self.board = board;
        Ok(())
    }

    /// Run one full search on the current position, reporting `info`
    /// lines through `report`, and return the best move found (NONE when
    /// the side to move has no legal move).
    pub fn search_root(&mut self, report: &mut dyn FnMut(String)) -> Move {
        self.limits.start();
        self.nodes = 0;
        self.killers.clear();
        self.tt.begin_search();

        let mut ml = MoveList::with_capacity(60);
        self.gen_and_sort(0, &mut ml);
        if ml.is_empty() {
            return Move::NONE;
        }

        let in_check = self.board.in_check(self.board.stm);
        let mut pv = PvList::new();
        let mut child_pv = PvList::new();

        // Best from the previous iteration survives an immediate stop.
        let mut best_move = ml[0];
        let mut best_score = NO_SCORE;
        let mut completed_depth = 0;
        let mut alpha = MIN_EVAL;
        let mut beta = MAX_EVAL;

        let mut depth = 1;
        while depth <= self.limits.depth && !self.limits.tc.is_stopped() {
            ml.sort();
            best_score = NO_SCORE;
            alpha = MIN_EVAL;
            beta = MAX_EVAL;

            for ix in 0..ml.len() {
                let mv = ml[ix];
                child_pv.clear();
                if !self.board.make(mv) {
                    continue;
                }

                // Root ordering stands in for picker stages: late root
                // moves are reduction candidates.
                let reduction = self.lmr(mv, in_check, depth, ix as i32 + 1);
                let score = if ix == 0 {
                    -self.search(-beta, -alpha, depth - 1, 1, &mut child_pv)
                } else {
                    let mut s =
                        -self.search(-alpha - 1, -alpha, depth - 1 - reduction, 1, &mut child_pv);
                    if s > alpha && !self.limits.tc.is_stopped() {
                        // Null-window surprise: re-search at full width.
                        s = -self.search(-beta, -alpha, depth - 1, 1, &mut child_pv);
                    }
                    s
                };

                self.board.unmake(mv);

                if self.limits.tc.is_stopped() {
                    break;
                }

                ml[ix].set_score(score);
                if score > best_score {
                    best_score = score;
                    best_move = ml[ix];
                    alpha = score;
                    completed_depth = depth;
                    pv.lead(mv, &child_pv);
                    self.tt.store(
                        self.board.full_key(),
                        mv,
                        completed_depth,
                        0,
                        score,
                        SCORE_LOWER,
                    );
                    report(format!(
                        "info score cp {} depth {} nodes {} time {} pv {}",
                        score,
                        depth,
                        self.nodes,
                        self.limits.elapsed().as_millis(),
                        pv
                    ));
                }
            }

            depth += 1;
        }

        ml.sort();
        self.tt.store(
            self.board.full_key(),
            best_move,
            completed_depth,
            0,
            best_score,
            score_type(best_score, alpha, beta),
        );

        let elapsed = self.limits.elapsed();
        let nps = if elapsed.as_secs_f64() > 0.0 {
            (self.nodes as f64 / elapsed.as_secs_f64()) as u64
        } else {
            0
        };
        report(format!(
            "info score cp {} depth {} nodes {} time {} nps {} pv {}",
            best_move.score(),
            completed_depth,
            self.nodes,
            elapsed.as_millis(),
            nps,
            pv
        ));

        best_move
    }

    /// Interior alpha-beta node. `depth` is remaining depth, `ply` the
    /// distance from the root.
    fn search(&mut self, mut alpha: i32, mut beta: i32, depth: i32, ply: i32, pv: &mut PvList) -> i32 {
        self.nodes += 1;
        // nodes advances by exactly one per interior node, so this hits
        // every multiple of the polling interval.
        if self.limits.should_check_time(self.nodes) {
            self.limits.check_time(self.nodes);
        }
        if depth <= 0 {
            return self.qs(beta);
        }

        // Mate-distance pruning: a shorter mate elsewhere already bounds
        // what this subtree can be worth.
        let mate_bound = add_mate_ply(MATE - 1, ply);
        if mate_bound < beta {
            beta = mate_bound;
            if mate_bound <= alpha {
                return mate_bound;
            }
        }

        pv.clear();
        let pv_node = beta != alpha + 1;
        let in_check = self.board.in_check(self.board.stm);
        let full_key = self.board.full_key();

        let mut trans_move = Move::NONE;
        if let Some(probe) = self.tt.probe(full_key, depth, ply) {
            trans_move = probe.mv;
            if probe.usable && !pv_node {
                // Bound kinds decide whether the cached score cuts off.
                if probe.score_type == SCORE_EXACT
                    || (probe.score_type == SCORE_LOWER && probe.score >= beta)
                    || (probe.score_type == SCORE_UPPER && probe.score <= alpha)
                {
                    return probe.score;
                }
            }
        }

        let mut child_pv = PvList::new();

        // Null move: hand the opponent a free shot. If the position is
        // still at least beta, a real move will be too.
        let static_eval = sign_eval(self.board.stm, evaluate(&self.board));
        if !pv_node
            && !is_mate_score(beta)
            && !in_check
            && self.board.has_non_pawn_material(self.board.stm)
            && static_eval >= beta
        {
            let null = self.board.make_null();
            let score = if depth <= self.config.null_move_static_depth {
                -self.qs(-beta + 1)
            } else {
                -self.search(
                    -beta,
                    -beta + 1,
                    depth - self.config.null_move_reduction,
                    ply,
                    &mut child_pv,
                )
            };
            self.board.undo_null(null);

            if score >= beta {
                self.tt
                    .store(full_key, Move::NONE, depth, ply, score, SCORE_LOWER);
                return score;
            }
        }

        let mut best_score = NO_SCORE;
        let mut moves_tried = 0;
        let mut picker = MovePicker::new(trans_move, ply as usize);

        while let Some((mv, stage)) = picker.next(&self.board, &self.killers, &self.history) {
            if !self.board.make(mv) {
                continue;
            }

            child_pv.clear();
            let reduction = self.lmr(mv, in_check, depth, stage.value());
            let score = if pv_node && moves_tried == 0 {
                -self.search(-beta, -alpha, depth - 1, ply + 1, &mut child_pv)
            } else {
                let mut s =
                    -self.search(-alpha - 1, -alpha, depth - 1 - reduction, ply + 1, &mut child_pv);
                if s > alpha {
                    s = -self.search(-beta, -alpha, depth - 1, ply + 1, &mut child_pv);
                }
                s
            };

            self.board.unmake(mv);
            moves_tried += 1;

            if score > best_score {
                best_score = score;
                pv.lead(mv, &child_pv);

                if score > alpha {
                    alpha = score;
                    self.tt
                        .store(full_key, mv, depth, ply, score, score_type(score, alpha, beta));
                }

                if score >= beta {
                    // Quiet cutoff movers feed the ordering tables.
                    if !mv.is_capture() && !mv.is_promotion() {
                        self.killers.add(mv, ply as usize);
                        self.history.inc(mv.from(), mv.to(), self.board.stm, depth);
                    }
                    return score;
                }
            }

            if self.limits.tc.is_stopped() {
                return alpha;
            }
        }

        if moves_tried == 0 {
            // No legal move: mate (ply-adjusted) or stalemate.
            let score = if in_check { -MATE + ply + 1 } else { 0 };
            self.tt
                .store(full_key, Move::NONE, depth, ply, score, SCORE_EXACT);
            return score;
        }

        best_score
    }

    /// Quiescence: stand pat on the static eval, then try only captures
    /// whose static exchange wins material. Each target square is
    /// resolved once — generation order serves cheap attackers first, so
    /// the first capture of a square is the best one.
    fn qs(&mut self, beta: i32) -> i32 {
        let stand_pat = sign_eval(self.board.stm, evaluate(&self.board));
        if stand_pat >= beta {
            return stand_pat;
        }
        let mut best = stand_pat;

        let mut captures = MoveList::with_capacity(60);
        ironbit_core::movegen::gen_captures(&self.board, &mut captures);

        let mut resolved = Bitboard::EMPTY;
        for ix in 0..captures.len() {
            let mv = captures[ix];
            let to = mv.to();
            if resolved.contains(to) {
                continue;
            }
            resolved.set(to);

            let mut gain = see(&self.board, mv.from(), to);
            if gain == 0 && mv.cp().is_empty() {
                // A promotion that neither captured nor got captured.
                gain = PIECE_TYPE_VAL[PieceType::Queen.idx()] - PIECE_TYPE_VAL[PieceType::Pawn.idx()];
            }
            if gain <= 0 {
                continue;
            }

            let score = stand_pat + gain;
            if score > best {
                best = score;
                if score >= beta {
                    return score;
                }
            }
        }

        best
    }

    /// Late-move reduction, computed with the move already made on the
    /// board. Tactically interesting moves are never reduced.
    fn lmr(&self, mv: Move, was_in_check: bool, depth: i32, stage_value: i32) -> i32 {
        use ironbit_core::types::square::{A6, H3};

        let gives_check = self.board.in_check(self.board.stm);
        let pc = mv.pc();
        let pawn_push_far = !pc.is_empty()
            && pc.kind() == PieceType::Pawn
            && match pc.color() {
                ironbit_core::Color::White => mv.to() >= A6,
                ironbit_core::Color::Black => mv.to() <= H3,
            };

        let interesting = was_in_check
            || mv.is_capture()
            || mv.is_promotion()
            || gives_check
            || pawn_push_far;

        let mut reduction = 0;
        if !interesting && depth >= self.config.lmr_min_depth && stage_value >= STAGE_QUIET_VALUE {
            reduction = 1;
            if depth >= self.config.lmr_deep_depth {
                reduction = depth / 3;
            }
        }
        reduction
    }

    /// Legal root moves, scored by a one-ply eval plus killer bonuses
    /// and sorted best first.
    fn gen_and_sort(&mut self, ply: usize, ml: &mut MoveList) {
        gen_legal(&mut self.board, ml);
        for ix in 0..ml.len() {
            let mv = ml[ix];
            if !self.board.make(mv) {
                continue;
            }
            let mut v = evaluate(&self.board);
            self.board.unmake(mv);

            v = sign_eval(self.board.stm, v);
            if self.killers.first(ply).same_move(mv) {
                v += 1000;
            } else if self.killers.second(ply).same_move(mv) {
                v += 900;
            }
            ml[ix].set_score(v);
        }
        ml.sort();
    }

    // Diagnostics consumed by the protocol layer's debug commands.

    pub fn eval_current(&self) -> i32 {
        evaluate(&self.board)
    }

    pub fn see_current(&self, from: u8, to: u8) -> i32 {
        see(&self.board, from, to)
    }

    pub fn key_info(&self) -> KeyInfo {
        let full_key = self.board.full_key();
        KeyInfo {
            key: self.board.key,
            full_key,
            index: self.tt.index(full_key),
            lock: TransTable::lock(full_key),
        }
    }

    pub fn history_top(&self, n: usize) -> Vec<(ironbit_core::Color, u8, u8, u32)> {
        self.history.top(n)
    }

    pub fn perft(&mut self, depth: u8) -> (Vec<(Move, u64)>, u64) {
        perft_divide(&mut self.board, depth)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
