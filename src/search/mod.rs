//! Greedy single-ply move selection.
//!
//! This is a heuristic rather than a search: every legal move is simulated
//! once and the outcomes are compared with a fixed order of preference.
//!
//! 1. A move that checkmates is played immediately.
//! 2. A move that stalemates is only kept until anything else shows up.
//! 3. A move that gives check replaces the best candidate when it scores at
//!    least as much.
//! 4. A quiet move replaces the best candidate when it scores more. Exact ties
//!    prefer castling, avoid moving the king or the rooks, and prefer pushing
//!    pawns further.
//!
//! Scores are material gains minus the penalty for leaving pieces where the
//! opponent can take them, see [`crate::evaluation::Score`]. Candidates are
//! visited in random order so that equal moves are picked fairly. A move that
//! undoes the mover's previous move comes last and is only played when
//! nothing else is legal.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::chess::core::{Color, Move, MoveEffects, PieceKind};
use crate::chess::game::{Game, GameState};
use crate::evaluation::Score;

/// Bonus for a move that promotes a pawn (to a queen, always).
pub const PROMOTION_BONUS: Score = Score::cp(800);
/// Bonus for castling when it ties with the best quiet move.
pub const CASTLING_BONUS: Score = Score::cp(50);
/// A piece left en prise is penalized by 90% of its value.
const HANGING_PENALTY_TENTHS: i32 = 9;

/// Outcome of a simulated move.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    next_move: Move,
    score: Score,
    state: GameState,
    kind: PieceKind,
    effects: MoveEffects,
    /// The moved piece can be captured on its destination square.
    hanging: bool,
    /// Distance between the destination and the mover's home rank.
    advancement: i8,
}

impl Candidate {
    /// Compares the candidate with the best one found so far. Returns the
    /// reason for rejection, if any.
    fn challenge(&mut self, best: Option<&Self>) -> Result<(), &'static str> {
        let Some(best) = best else {
            return Ok(());
        };
        match (self.state, best.state) {
            (GameState::CheckMate, _) => Ok(()),
            (_, GameState::CheckMate) => Err("best move mates"),
            (GameState::StaleMate, _) => Err("stalemates"),
            (_, GameState::StaleMate) => Ok(()),
            (GameState::Check, _) if self.score >= best.score => Ok(()),
            (GameState::Check, _) => Err("check loses material"),
            (GameState::Idle, _) if self.score > best.score => Ok(()),
            (GameState::Idle, _) if self.score < best.score => Err("lower score"),
            (GameState::Idle, _) => self.break_tie(best),
        }
    }

    fn break_tie(&mut self, best: &Self) -> Result<(), &'static str> {
        if self.hanging {
            return Err("leaves the piece hanging");
        }
        if self.effects.contains(MoveEffects::CASTLE) {
            self.score += CASTLING_BONUS;
            return Ok(());
        }
        match self.kind {
            PieceKind::King | PieceKind::Rook => Err("moves king or rook"),
            PieceKind::Pawn if best.kind != PieceKind::Pawn => Ok(()),
            PieceKind::Pawn if self.advancement > best.advancement => Ok(()),
            _ => Err("tie"),
        }
    }
}

impl Game {
    /// Picks a move for `color` or returns `None` when `color` has no legal
    /// moves (checkmate or stalemate).
    ///
    /// The returned move never leaves the king of `color` in check. A pawn
    /// reaching the last rank is assumed to be promoted to a queen. `rng`
    /// only shuffles the candidates, so seeded generators give reproducible
    /// choices.
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use tabiya::chess::core::Color;
    /// use tabiya::chess::game::Game;
    ///
    /// let game = Game::new();
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let next_move = game.next_move(Color::White, &mut rng).unwrap();
    /// assert!(game.is_legal(next_move.from, next_move.to));
    /// ```
    pub fn next_move<R: Rng + ?Sized>(&self, color: Color, rng: &mut R) -> Option<Move> {
        let mut candidates = self.candidate_moves(color);
        candidates.shuffle(rng);
        let previous = self.previous_move_of(color);
        // Undoing the previous move is only considered after everything else.
        if let Some(index) = previous.and_then(|previous| {
            candidates
                .iter()
                .position(|&candidate| candidate == previous.reversed())
        }) {
            let reversal = candidates.remove(index);
            candidates.push(reversal);
        }
        let mut best: Option<Candidate> = None;
        for next_move in candidates {
            if best.is_some() && previous == Some(next_move.reversed()) {
                log::trace!("{next_move} rejected: reverses the previous move");
                continue;
            }
            let Some(mut candidate) = self.simulate(color, next_move) else {
                log::trace!("{next_move} rejected: leaves the king in check");
                continue;
            };
            if let Err(reason) = candidate.challenge(best.as_ref()) {
                log::trace!("{next_move} ({}) rejected: {reason}", candidate.score);
                continue;
            }
            if candidate.state == GameState::CheckMate {
                log::debug!("{color} mates with {next_move}");
                return Some(next_move);
            }
            best = Some(candidate);
        }
        match best {
            Some(best) => log::debug!(
                "{color} plays {} ({}, {})",
                best.next_move,
                best.score,
                best.state
            ),
            None => log::debug!("{color} has no moves"),
        }
        best.map(|best| best.next_move)
    }

    /// The most recent move made by `color`.
    fn previous_move_of(&self, color: Color) -> Option<Move> {
        let last = *self.history().last()?;
        if self.turn() == color {
            // The last move was made by the opponent.
            let length = self.history().len();
            length.checked_sub(2).map(|index| self.history()[index])
        } else {
            Some(last)
        }
    }

    /// Makes the move on a copy of the game and scores the outcome. Returns
    /// `None` if the move leaves the king of `color` in check.
    fn simulate(&self, color: Color, next_move: Move) -> Option<Candidate> {
        let piece = self.board().piece(next_move.from)?;
        let mut score = self
            .captured_piece(next_move)
            .map_or(Score::ZERO, |captured| Score::material(captured.kind()));
        let mut next = self.clone();
        let effects = next.make_move(next_move.from, next_move.to);
        if next.king_is_in_check(color) {
            return None;
        }
        if next.can_promote_piece(next_move.to) {
            next.promote_piece(next_move.to, PieceKind::Queen);
            score += PROMOTION_BONUS;
        }
        let state = next.state();
        let hanging = next.piece_is_threatened(next_move.to);
        match state {
            GameState::Check if hanging => {
                let moved = next
                    .board()
                    .piece(next_move.to)
                    .map_or(Score::ZERO, |moved| Score::material(moved.kind()));
                score -= moved.tenths(HANGING_PENALTY_TENTHS);
            },
            GameState::Idle => {
                let exposed = next
                    .threatened_pieces(color)
                    .filter_map(|at| next.board().piece(at))
                    .map(|threatened| Score::material(threatened.kind()))
                    .max()
                    .unwrap_or(Score::ZERO);
                score -= exposed.tenths(HANGING_PENALTY_TENTHS);
            },
            _ => (),
        }
        Some(Candidate {
            next_move,
            score,
            state,
            kind: piece.kind(),
            effects,
            hanging,
            advancement: (next_move.to.y - color.home_rank()).abs(),
        })
    }
}
