#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};
use tabiya::chess::core::{Move, PieceKind};
use tabiya::chess::game::Game;

// Every byte picks one of the legal moves, the game is replayed on both
// implementations and the legal moves are compared after each ply.
fuzz_target!(|data: &[u8]| {
    let mut game = Game::new();
    let mut reference = Chess::default();
    for &choice in data {
        let ours = game
            .legal_moves(game.turn())
            .iter()
            .map(Move::to_string)
            .sorted()
            .collect::<Vec<_>>();
        let legal_moves = reference.legal_moves();
        let expected = legal_moves
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string()[..4].to_string())
            .sorted()
            .dedup()
            .collect::<Vec<_>>();
        assert_eq!(ours, expected);
        if legal_moves.is_empty() {
            return;
        }
        let chosen = &legal_moves[usize::from(choice) % legal_moves.len()];
        let uci = chosen.to_uci(CastlingMode::Standard).to_string();
        let next_move = Move::try_from(&uci[..4]).unwrap();
        let _ = game.try_make_move(next_move.from, next_move.to).unwrap();
        if let Some(role) = chosen.promotion() {
            game.try_promote_piece(next_move.to, PieceKind::try_from(role.char()).unwrap())
                .unwrap();
        }
        reference.play_unchecked(chosen);
    }
});
