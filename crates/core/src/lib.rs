//! IronBit core: bitboard board representation, magic-bitboard attack
//! generation, packed moves, Zobrist hashing, legal move generation and
//! perft. Search lives in `ironbit_engine`; this crate is the rules
//! layer it is built on.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod castling;
pub mod fen;
pub mod magics;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod types;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::Board;
pub use castling::Castling;
pub use fen::{apply_moves, parse_fen, parse_move, startpos, to_fen, ParseError, START_FEN};
pub use moves::{Move, MoveList};
pub use perft::{perft, perft_divide};
pub use types::{coord_to_sq, file_of, make_sq, rank_of, sq_to_coord, Color, Piece, PieceType};
pub use zobrist::ZOBRIST;
