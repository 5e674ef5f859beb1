//! The engine puts the game and the move selector together and talks to the
//! outside world through a simple line-based text protocol.
//!
//! [`Engine::run`] is the "main loop": it reads commands from the input
//! stream, executes them and writes responses to the output stream. Commands
//! that can not be parsed or executed produce an `error ...` line and leave
//! the game untouched.

use std::io::{BufRead, Write};

use anyhow::bail;
use itertools::Itertools;
use rand::rngs::StdRng;

use crate::chess::core::{Color, Move, PieceKind, Position};
use crate::chess::game::Game;
use crate::engine::protocol::Command;

mod protocol;

/// Connects the [`Game`] with the I/O streams and, optionally, plays one of
/// the sides with [`Game::next_move`].
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    rng: StdRng,
    /// The side that is played automatically after each accepted move.
    autoplay: Option<Color>,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with the starting position and
    /// provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W, rng: StdRng) -> Self {
        Self {
            game: Game::new(),
            rng,
            autoplay: None,
            input,
            output,
        }
    }

    /// Makes the engine reply automatically whenever it is `color`'s turn.
    #[must_use]
    pub fn with_autoplay(mut self, color: Option<Color>) -> Self {
        self.autoplay = color;
        self
    }

    /// Continuously reads the input stream and executes commands until "quit"
    /// is sent or the input is closed.
    ///
    /// # Errors
    ///
    /// Only I/O failures are propagated; invalid commands are reported to the
    /// output stream.
    pub fn run(&mut self) -> anyhow::Result<()> {
        if self.autoplay == Some(self.game.turn()) {
            self.reply()?;
        }
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    log::debug!("can not parse {:?}: {e:#}", line.trim());
                    writeln!(self.output, "error {e:#}")?;
                    continue;
                },
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                writeln!(self.output, "error {e:#}")?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::NewGame => self.handle_new(),
            Command::Show => self.handle_show(),
            Command::State => Ok(writeln!(self.output, "{}", self.game.state())?),
            Command::Turn => Ok(writeln!(self.output, "{}", self.game.turn())?),
            Command::Moves { from } => self.handle_moves(from),
            Command::Play {
                next_move,
                promotion,
            } => self.handle_play(next_move, promotion),
            Command::Go => self.handle_go(),
            Command::History => Ok(writeln!(
                self.output,
                "{}",
                self.game.history().iter().join(" ")
            )?),
            Command::Version => Ok(writeln!(
                self.output,
                "{} {}",
                env!("CARGO_PKG_NAME"),
                crate::engine_version()
            )?),
            Command::Quit => Ok(()),
        }
    }

    fn handle_new(&mut self) -> anyhow::Result<()> {
        self.game = Game::new();
        writeln!(self.output, "ok")?;
        if self.autoplay == Some(self.game.turn()) {
            self.reply()?;
        }
        Ok(())
    }

    /// Prints the board diagram along with the side to move and the state.
    fn handle_show(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{:?}", self.game.board())?;
        writeln!(self.output, "turn: {}", self.game.turn())?;
        writeln!(self.output, "state: {}", self.game.state())?;
        Ok(())
    }

    fn handle_moves(&mut self, from: Position) -> anyhow::Result<()> {
        if !self.game.can_select_piece(from) {
            bail!("no piece of the side to move at {from}");
        }
        writeln!(
            self.output,
            "{}",
            self.game.moves_for_piece(from).iter().join(" ")
        )?;
        Ok(())
    }

    /// Plays a move of the side to move, promoting the pawn (to a queen by
    /// default) when it reaches the last rank.
    fn handle_play(&mut self, next_move: Move, promotion: Option<PieceKind>) -> anyhow::Result<()> {
        if self.game.state().is_over() {
            bail!("the game is over: {}", self.game.state());
        }
        let mut next = self.game.clone();
        let _ = next.try_make_move(next_move.from, next_move.to)?;
        if next.can_promote_piece(next_move.to) {
            next.try_promote_piece(next_move.to, promotion.unwrap_or(PieceKind::Queen))?;
        } else if let Some(kind) = promotion {
            bail!("{next_move} does not promote a pawn to {kind}");
        }
        self.game = next;
        writeln!(self.output, "ok {next_move}")?;
        if self.report_game_over()? {
            return Ok(());
        }
        if self.autoplay == Some(self.game.turn()) {
            self.reply()?;
        }
        Ok(())
    }

    fn handle_go(&mut self) -> anyhow::Result<()> {
        if self.game.state().is_over() {
            bail!("the game is over: {}", self.game.state());
        }
        self.reply()
    }

    /// Picks and plays a move for the side to move.
    fn reply(&mut self) -> anyhow::Result<()> {
        let color = self.game.turn();
        let Some(next_move) = self.game.next_move(color, &mut self.rng) else {
            bail!("{color} has no moves");
        };
        let _ = self.game.try_make_move(next_move.from, next_move.to)?;
        if self.game.can_promote_piece(next_move.to) {
            self.game.promote_piece(next_move.to, PieceKind::Queen);
        }
        writeln!(self.output, "move {next_move}")?;
        let _ = self.report_game_over()?;
        Ok(())
    }

    /// Announces checkmate or stalemate. Returns `true` if the game is over.
    fn report_game_over(&mut self) -> anyhow::Result<bool> {
        let state = self.game.state();
        if state.is_over() {
            writeln!(self.output, "game over: {state}")?;
        }
        Ok(state.is_over())
    }
}
