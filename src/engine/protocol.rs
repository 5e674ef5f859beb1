//! Line-based commands understood by [`crate::engine::Engine`].

use anyhow::{bail, Context};

use crate::chess::core::{Move, PieceKind, Position};

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    NewGame,
    Show,
    State,
    Turn,
    Moves { from: Position },
    Play {
        next_move: Move,
        promotion: Option<PieceKind>,
    },
    Go,
    History,
    Version,
    Quit,
}

/// Parses `e7e8` or `e7e8q`.
fn parse_move(token: &str) -> anyhow::Result<Command> {
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        bail!("expected move like e2e4 or e7e8q, got \"{token}\"");
    }
    let next_move = Move::try_from(&token[..4])?;
    let promotion = match token[4..].chars().next() {
        None => None,
        Some(symbol) => {
            let kind = PieceKind::try_from(symbol)?;
            if matches!(kind, PieceKind::Pawn | PieceKind::King) {
                bail!("pawn can not be promoted to {kind}");
            }
            Some(kind)
        },
    };
    Ok(Command::Play {
        next_move,
        promotion,
    })
}

impl Command {
    pub(super) fn parse(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, arguments)) = parts.split_first() else {
            bail!("empty command");
        };
        let command = match (command, arguments) {
            ("new", []) => Self::NewGame,
            ("d" | "board", []) => Self::Show,
            ("state", []) => Self::State,
            ("turn", []) => Self::Turn,
            ("moves", [square]) => Self::Moves {
                from: Position::try_from(*square)
                    .with_context(|| format!("parsing square \"{square}\""))?,
            },
            ("move", [token]) => parse_move(token)?,
            ("go", []) => Self::Go,
            ("history", []) => Self::History,
            ("version", []) => Self::Version,
            ("quit", []) => Self::Quit,
            ("new" | "d" | "board" | "state" | "turn" | "go" | "history" | "version" | "quit", _) => {
                bail!("{command} takes no arguments")
            },
            ("moves", _) => bail!("usage: moves <square>"),
            ("move", _) => bail!("usage: move <from><to>[q|r|b|n]"),
            _ => bail!("unknown command: {}", input.trim()),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_simple() {
        assert_eq!(Command::parse("new").unwrap(), Command::NewGame);
        assert_eq!(Command::parse("d").unwrap(), Command::Show);
        assert_eq!(Command::parse("  board \n").unwrap(), Command::Show);
        assert_eq!(Command::parse("state").unwrap(), Command::State);
        assert_eq!(Command::parse("turn").unwrap(), Command::Turn);
        assert_eq!(Command::parse("go").unwrap(), Command::Go);
        assert_eq!(Command::parse("history").unwrap(), Command::History);
        assert_eq!(Command::parse("version").unwrap(), Command::Version);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_moves() {
        assert_eq!(
            Command::parse("moves e2").unwrap(),
            Command::Moves {
                from: Position::new(4, 6)
            }
        );
        assert!(Command::parse("moves").is_err());
        assert!(Command::parse("moves z9").is_err());
    }

    #[test]
    fn parse_play() {
        assert_eq!(
            Command::parse("move e2e4").unwrap(),
            Command::Play {
                next_move: Move::new(Position::new(4, 6), Position::new(4, 4)),
                promotion: None,
            }
        );
        assert_eq!(
            Command::parse("move b7b8n").unwrap(),
            Command::Play {
                next_move: Move::new(Position::new(1, 1), Position::new(1, 0)),
                promotion: Some(PieceKind::Knight),
            }
        );
        assert!(Command::parse("move e2").is_err());
        assert!(Command::parse("move e2e4 e7e5").is_err());
        assert!(Command::parse("move b7b8k").is_err());
        assert!(Command::parse("move b7b8x").is_err());
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("uci").unwrap_err().to_string(),
            "unknown command: uci"
        );
        assert_eq!(
            Command::parse("go depth 3").unwrap_err().to_string(),
            "go takes no arguments"
        );
        assert!(Command::parse("").is_err());
    }
}
