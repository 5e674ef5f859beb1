//! Chess rules: the board, piece movement, threats and game state.

pub mod board;
pub mod core;
pub mod game;

mod attacks;
mod rules;
