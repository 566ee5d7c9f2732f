//! The search controller: the concurrency boundary between the engine
//! and its caller.
//!
//! The engine session lives on one dedicated thread that owns every
//! mutable table; the protocol layer talks to it over channels. A
//! search is started with one command and produces exactly one
//! `bestmove` line on the output channel. The only state shared across
//! the boundary is the cooperative stop flag, so `stop()` reaches a
//! search already in flight.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, warn};

use ironbit_core::{sq_to_coord, Move, ParseError};

use crate::config::Config;
use crate::search::Engine;
pub use crate::search::KeyInfo;
use crate::time_control::TimeControl;

/// Commands understood by the engine thread. Queries carry a reply
/// channel; `Go` answers asynchronously on the output channel instead.
pub enum Command {
    NewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
        reply: Sender<Result<(), ParseError>>,
    },
    Go,
    SetDepth(i32),
    SetMoveTime(u64),
    SetInfinite(bool),
    Perft {
        depth: u8,
        reply: Sender<(Vec<(Move, u64)>, u64)>,
    },
    Eval {
        reply: Sender<i32>,
    },
    See {
        from: u8,
        to: u8,
        reply: Sender<i32>,
    },
    Key {
        reply: Sender<KeyInfo>,
    },
    HistoryTop {
        reply: Sender<Vec<(ironbit_core::Color, u8, u8, u32)>>,
    },
    Quit,
}

pub struct SearchController {
    cmd_tx: Sender<Command>,
    out_rx: Receiver<String>,
    tc: TimeControl,
    handle: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Spawn the engine thread and hand back its control surface.
    pub fn spawn(config: Config) -> SearchController {
        let (cmd_tx, cmd_rx) = unbounded::<Command>();
        let (out_tx, out_rx) = unbounded::<String>();

        let engine = Engine::new(config);
        let tc = engine.limits.tc.clone();

        let handle = thread::Builder::new()
            .name("ironbit-search".into())
            .spawn(move || run(engine, cmd_rx, out_tx))
            .expect("failed to spawn search thread");

        SearchController {
            cmd_tx,
            out_rx,
            tc,
            handle: Some(handle),
        }
    }

    /// Lines produced by the engine: `info ...` during search and one
    /// `bestmove ...` per search lifecycle.
    pub fn output(&self) -> &Receiver<String> {
        &self.out_rx
    }

    pub fn new_game(&self) {
        self.send(Command::NewGame);
    }

    /// Load a position and apply moves; waits for the engine's verdict.
    pub fn set_position(&self, fen: Option<String>, moves: Vec<String>) -> Result<(), ParseError> {
        let (reply, rx) = bounded(1);
        self.send(Command::Position { fen, moves, reply });
        rx.recv().expect("engine thread hung up")
    }

    /// Begin a search; the best move arrives on the output channel.
    pub fn go(&self) {
        self.send(Command::Go);
    }

    /// Cooperatively stop the running search. The search finalizes and
    /// still emits its best move.
    pub fn stop(&self) {
        self.tc.stop();
    }

    pub fn set_depth(&self, depth: i32) {
        self.send(Command::SetDepth(depth));
    }

    pub fn set_move_time(&self, millis: u64) {
        self.send(Command::SetMoveTime(millis));
    }

    pub fn set_infinite(&self, infinite: bool) {
        self.send(Command::SetInfinite(infinite));
    }

    pub fn perft(&self, depth: u8) -> (Vec<(Move, u64)>, u64) {
        let (reply, rx) = bounded(1);
        self.send(Command::Perft { depth, reply });
        rx.recv().expect("engine thread hung up")
    }

    pub fn eval(&self) -> i32 {
        let (reply, rx) = bounded(1);
        self.send(Command::Eval { reply });
        rx.recv().expect("engine thread hung up")
    }

    pub fn see(&self, from: u8, to: u8) -> i32 {
        let (reply, rx) = bounded(1);
        self.send(Command::See { from, to, reply });
        rx.recv().expect("engine thread hung up")
    }

    pub fn key(&self) -> KeyInfo {
        let (reply, rx) = bounded(1);
        self.send(Command::Key { reply });
        rx.recv().expect("engine thread hung up")
    }

    pub fn history_top(&self) -> Vec<(ironbit_core::Color, u8, u8, u32)> {
        let (reply, rx) = bounded(1);
        self.send(Command::HistoryTop { reply });
        rx.recv().expect("engine thread hung up")
    }

    /// Shut the engine thread down and wait for it.
    pub fn quit(mut self) {
        self.tc.stop();
        let _ = self.cmd_tx.send(Command::Quit);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn send(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine thread is gone; command dropped");
        }
    }
}

fn run(mut engine: Engine, cmd_rx: Receiver<Command>, out_tx: Sender<String>) {
    for cmd in cmd_rx {
        match cmd {
            Command::NewGame => {
                debug!("new game");
                engine.new_game();
            }
            Command::Position { fen, moves, reply } => {
                let tokens: Vec<&str> = moves.iter().map(String::as_str).collect();
                let result = engine.set_position(fen.as_deref(), &tokens);
                let _ = reply.send(result);
            }
            Command::Go => {
                let out = out_tx.clone();
                let mut report = |line: String| {
                    let _ = out.send(line);
                };
                let best = engine.search_root(&mut report);
                let line = if best == Move::NONE {
                    "bestmove 0000".to_string()
                } else {
                    format!(
                        "bestmove {}{}",
                        sq_to_coord(best.from()),
                        sq_to_coord(best.to())
                    )
                };
                let _ = out_tx.send(line);
            }
            Command::SetDepth(depth) => engine.limits.set_depth(depth),
            Command::SetMoveTime(millis) => engine.limits.set_move_time(millis),
            Command::SetInfinite(infinite) => engine.limits.set_infinite(infinite),
            Command::Perft { depth, reply } => {
                let _ = reply.send(engine.perft(depth));
            }
            Command::Eval { reply } => {
                let _ = reply.send(engine.eval_current());
            }
            Command::See { from, to, reply } => {
                let _ = reply.send(engine.see_current(from, to));
            }
            Command::Key { reply } => {
                let _ = reply.send(engine.key_info());
            }
            Command::HistoryTop { reply } => {
                let _ = reply.send(engine.history_top(20));
            }
            Command::Quit => break,
        }
    }
    debug!("engine thread exiting");
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
