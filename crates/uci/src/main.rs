//! UCI front-end: translates the text protocol on stdin/stdout into
//! engine commands. Thin by design — all chess knowledge lives behind
//! the controller.

use std::io::{self, BufRead, Write};
use std::thread;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use ironbit_core::{coord_to_sq, sq_to_coord};
use ironbit_engine::{Config, SearchController};

const NAME: &str = "IronBit 0.1";
const AUTHOR: &str = "IronBit authors";

fn main() {
    // Diagnostics go to stderr; stdout belongs to the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let ctl = SearchController::spawn(Config::default());

    // Search output (info lines, bestmove) arrives asynchronously;
    // forward it to stdout as it comes.
    let out_rx = ctl.output().clone();
    let printer = thread::spawn(move || {
        let mut stdout = io::stdout();
        for line in out_rx {
            let _ = writeln!(stdout, "{line}");
            let _ = stdout.flush();
        }
    });

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        debug!(cmd = words[0], "uci command");

        match words[0].to_ascii_lowercase().as_str() {
            "uci" => {
                println!("id name {NAME}");
                println!("id author {AUTHOR}");
                println!("option name Depth type spin default 100 min 1 max 100");
                println!("option name MoveTime type spin default 0 min 0 max 600000");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => ctl.new_game(),
            "setoption" => handle_setoption(&ctl, &words),
            "position" => handle_position(&ctl, &words),
            "go" => handle_go(&ctl, &words),
            "stop" => ctl.stop(),
            "quit" | "q" => break,

            // Debug commands beyond the protocol proper.
            "perft" => handle_perft(&ctl, &words),
            "eval" => println!("info string eval cp {}", ctl.eval()),
            "see" => handle_see(&ctl, &words),
            "key" => {
                let info = ctl.key();
                println!(
                    "info string key {:x} fullkey {:x} index {:x} lock {:x}",
                    info.key, info.full_key, info.index, info.lock
                );
            }
            "hist" => {
                for (i, (side, from, to, score)) in ctl.history_top().iter().enumerate() {
                    println!(
                        "info string hist {:2}: {:?} {}{} {}",
                        i + 1,
                        side,
                        sq_to_coord(*from),
                        sq_to_coord(*to),
                        score
                    );
                }
            }
            other => println!("info string unknown cmd {other}"),
        }
        io::stdout().flush().ok();
    }

    ctl.quit();
    let _ = printer.join();
}

/// `setoption name <Name> value <n>`
fn handle_setoption(ctl: &SearchController, words: &[&str]) {
    let name_ix = words.iter().position(|&w| w == "name");
    let value_ix = words.iter().position(|&w| w == "value");
    let (Some(ni), Some(vi)) = (name_ix, value_ix) else {
        println!("info string setoption needs name and value");
        return;
    };
    let (Some(&name), Some(&value)) = (words.get(ni + 1), words.get(vi + 1)) else {
        println!("info string setoption needs name and value");
        return;
    };

    match name.to_ascii_lowercase().as_str() {
        "depth" => match value.parse::<i32>() {
            Ok(d) => ctl.set_depth(d),
            Err(_) => println!("info string option value {value} is not a number"),
        },
        "movetime" => match value.parse::<u64>() {
            Ok(ms) => ctl.set_move_time(ms),
            Err(_) => println!("info string option value {value} is not a number"),
        },
        _ => println!("info string unknown option {name}"),
    }
}

/// `position [startpos | fen <fen...>] [moves <m1> <m2> ...]`
fn handle_position(ctl: &SearchController, words: &[&str]) {
    let mut fen: Option<String> = None;
    let mut moves: Vec<String> = Vec::new();

    let mut ix = 1;
    match words.get(ix) {
        Some(&"startpos") => ix += 1,
        Some(&"fen") => {
            ix += 1;
            let mut parts = Vec::new();
            while ix < words.len() && words[ix] != "moves" {
                parts.push(words[ix]);
                ix += 1;
            }
            fen = Some(parts.join(" "));
        }
        _ => {
            println!("info string position needs startpos or fen");
            return;
        }
    }

    if words.get(ix) == Some(&"moves") {
        moves.extend(words[ix + 1..].iter().map(|s| s.to_string()));
    }

    if let Err(e) = ctl.set_position(fen, moves) {
        error!("position rejected: {e}");
        println!("info string {e}");
    }
}

/// `go [depth <n>] [movetime <ms>] [infinite]`
fn handle_go(ctl: &SearchController, words: &[&str]) {
    let mut ix = 1;
    let mut infinite = false;
    while ix < words.len() {
        match words[ix] {
            "depth" => {
                if let Some(d) = words.get(ix + 1).and_then(|w| w.parse().ok()) {
                    ctl.set_depth(d);
                    ix += 1;
                }
            }
            "movetime" => {
                if let Some(ms) = words.get(ix + 1).and_then(|w| w.parse().ok()) {
                    ctl.set_move_time(ms);
                    ix += 1;
                }
            }
            "infinite" => infinite = true,
            _ => {}
        }
        ix += 1;
    }
    ctl.set_infinite(infinite);
    ctl.go();
}

fn handle_perft(ctl: &SearchController, words: &[&str]) {
    let Some(depth) = words.get(1).and_then(|w| w.parse::<u8>().ok()) else {
        println!("info string perft needs a depth");
        return;
    };
    let (divide, total) = ctl.perft(depth);
    for (i, (mv, count)) in divide.iter().enumerate() {
        println!("{:2}: {} \t{}", i + 1, mv, count);
    }
    println!("------------------");
    println!("Total:\t{total}");
}

/// `see <from> <to>`, e.g. `see e4 d5`
fn handle_see(ctl: &SearchController, words: &[&str]) {
    let (Some(from), Some(to)) = (
        words.get(1).and_then(|w| coord_to_sq(w)),
        words.get(2).and_then(|w| coord_to_sq(w)),
    ) else {
        println!("info string see needs two squares, e.g. see e4 d5");
        return;
    };
    println!("info string see {} {} = {}", sq_to_coord(from), sq_to_coord(to), ctl.see(from, to));
}
