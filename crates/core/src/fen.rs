//! Position setup: FEN parsing and move-sequence application.
//!
//! Both entry points validate field by field and fail on the first bad
//! token with a descriptive error, leaving the caller's board untouched:
//! parsing builds a scratch board that is committed only on success.

use thiserror::Error;

use crate::board::Board;
use crate::castling::Castling;
use crate::moves::Move;
use crate::types::{coord_to_sq, Color, Piece, PieceType};
use crate::zobrist::flip_side;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("position string has a malformed board field")]
    BadBoard,
    #[error("invalid piece character '{0}' in position string")]
    BadPiece(char),
    #[error("invalid side to move '{0}'")]
    BadSideToMove(String),
    #[error("invalid castling field '{0}'")]
    BadCastling(String),
    #[error("invalid en-passant field '{0}'")]
    BadEnPassant(String),
    #[error("invalid halfmove clock '{0}'")]
    BadClock(String),
    #[error("move token '{0}' is malformed")]
    BadMoveToken(String),
    #[error("move '{0}' starts from an empty square")]
    EmptyFromSquare(String),
    #[error("move '{0}' moves a piece of the wrong color")]
    WrongColor(String),
    #[error("move '{0}' has an invalid promotion piece")]
    BadPromotion(String),
    #[error("move '{0}' is illegal in this position")]
    IllegalMove(String),
}

/// Parse a FEN string into a fresh board.
pub fn parse_fen(fen: &str) -> Result<Board, ParseError> {
    let mut fields = fen.split_whitespace();
    let board_field = fields.next().ok_or(ParseError::BadBoard)?;

    let mut b = Board::new();

    let ranks: Vec<&str> = board_field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::BadBoard);
    }
    // FEN lists rank 8 first.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(d) = c.to_digit(10) {
                if d == 0 || d > 8 {
                    return Err(ParseError::BadBoard);
                }
                file += d as u8;
            } else {
                let pc = Piece::from_char(c).ok_or(ParseError::BadPiece(c))?;
                if file >= 8 {
                    return Err(ParseError::BadBoard);
                }
                b.set_sq(pc, rank * 8 + file);
                file += 1;
            }
            if file > 8 {
                return Err(ParseError::BadBoard);
            }
        }
        if file != 8 {
            return Err(ParseError::BadBoard);
        }
    }

    let stm_field = fields.next().unwrap_or("w");
    b.stm = match stm_field {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(ParseError::BadSideToMove(other.to_string())),
    };
    if b.stm == Color::Black {
        b.key = flip_side(b.key);
    }

    let castle_field = fields.next().unwrap_or("-");
    b.castling = Castling::parse(castle_field)
        .ok_or_else(|| ParseError::BadCastling(castle_field.to_string()))?;

    let ep_field = fields.next().unwrap_or("-");
    b.ep = if ep_field == "-" {
        0
    } else {
        coord_to_sq(ep_field).ok_or_else(|| ParseError::BadEnPassant(ep_field.to_string()))?
    };

    let clock_field = fields.next().unwrap_or("0");
    b.rule50 = clock_field
        .parse()
        .map_err(|_| ParseError::BadClock(clock_field.to_string()))?;

    // The fullmove number is accepted and ignored.

    Ok(b)
}

/// The standard starting position.
pub fn startpos() -> Board {
    parse_fen(START_FEN).expect("start position FEN is valid")
}

/// Apply a sequence of long-algebraic move tokens (`e2e4`, `e7e8q`).
///
/// Each token is validated field by field and then checked for legality
/// by actually playing it. On the first failure the original board is
/// left untouched and the error names the offending token.
pub fn apply_moves(board: &mut Board, tokens: &[&str]) -> Result<(), ParseError> {
    let mut b = board.clone();

    for &token in tokens {
        let mv = parse_move(&b, token)?;
        if !b.make(mv) {
            return Err(ParseError::IllegalMove(token.to_string()));
        }
    }

    *board = b;
    Ok(())
}

/// Validate one move token against the current position and pack it.
pub fn parse_move(b: &Board, token: &str) -> Result<Move, ParseError> {
    let token_lc = token.trim().to_ascii_lowercase();
    if token_lc.len() < 4 || token_lc.len() > 5 {
        return Err(ParseError::BadMoveToken(token.to_string()));
    }

    let fr = coord_to_sq(&token_lc[0..2])
        .ok_or_else(|| ParseError::BadMoveToken(token.to_string()))?;
    let to = coord_to_sq(&token_lc[2..4])
        .ok_or_else(|| ParseError::BadMoveToken(token.to_string()))?;

    let pc = b.squares[fr as usize];
    if pc.is_empty() {
        return Err(ParseError::EmptyFromSquare(token.to_string()));
    }
    if pc.color() != b.stm {
        return Err(ParseError::WrongColor(token.to_string()));
    }

    let promotion = if token_lc.len() == 5 {
        let kind = match token_lc.as_bytes()[4] {
            b'q' => PieceType::Queen,
            b'r' => PieceType::Rook,
            b'n' => PieceType::Knight,
            b'b' => PieceType::Bishop,
            _ => return Err(ParseError::BadPromotion(token.to_string())),
        };
        Piece::new(kind, b.stm)
    } else {
        Piece::EMPTY
    };

    // En-passant captures land on an empty square but still remove a pawn.
    let cp = if pc.kind() == PieceType::Pawn && to == b.ep && b.ep != 0 {
        Piece::new(PieceType::Pawn, b.stm.opposite())
    } else {
        b.squares[to as usize]
    };

    let mv = Move::pack(fr, to, pc, cp, promotion, b.ep, b.castling);
    if !b.is_pseudo_legal(mv) {
        return Err(ParseError::IllegalMove(token.to_string()));
    }
    Ok(mv)
}

/// Render the current position as a FEN string.
pub fn to_fen(b: &Board) -> String {
    let mut s = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            let pc = b.squares[rank * 8 + file];
            if pc.is_empty() {
                empty += 1;
            } else {
                if empty > 0 {
                    s.push_str(&empty.to_string());
                    empty = 0;
                }
                s.push(pc.to_char());
            }
        }
        if empty > 0 {
            s.push_str(&empty.to_string());
        }
        if rank > 0 {
            s.push('/');
        }
    }
    s.push(' ');
    s.push(match b.stm {
        Color::White => 'w',
        Color::Black => 'b',
    });
    s.push(' ');
    s.push_str(&b.castling.to_string());
    s.push(' ');
    if b.ep == 0 {
        s.push('-');
    } else {
        s.push_str(&crate::types::sq_to_coord(b.ep));
    }
    s.push_str(&format!(" {} 1", b.rule50));
    s
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
