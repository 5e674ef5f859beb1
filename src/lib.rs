//! Chess rules engine with a greedy single-ply move selector.
//!
//! - [`chess`] models the board, the movement rules (including castling, en
//!   passant and promotion), threats and the derived game state.
//! - [`evaluation`] defines the score units used to compare moves.
//! - [`search`] implements the move selector ([`chess::game::Game::next_move`]).
//! - [`Engine`] exposes all of it through a line-based text protocol.

pub mod chess;
pub mod evaluation;
pub mod search;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {}{})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH,
        if shadow_rs::git_clean() { "" } else { ", dirty" }
    )
}
