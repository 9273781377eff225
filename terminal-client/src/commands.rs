use std::fmt;

pub const HELP_TEXT: &str = "\
Commands:
  0-8     place your mark (cells are numbered left to right, top to bottom)
  reset   start a new game
  state   show the board again
  help    show this message
  quit    leave the game";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    PlaceMark(usize),
    Reset,
    ShowState,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    Unknown(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandParseError::Empty => write!(f, "Empty command"),
            CommandParseError::Unknown(input) => {
                write!(f, "Unknown command '{}', type 'help' for the list", input)
            }
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Cell numbers are passed through unchecked so the controller decides
/// whether they are on the board.
pub fn parse_command(line: &str) -> Result<ClientCommand, CommandParseError> {
    let input = line.trim();
    if input.is_empty() {
        return Err(CommandParseError::Empty);
    }

    if let Ok(index) = input.parse::<usize>() {
        return Ok(ClientCommand::PlaceMark(index));
    }

    match input.to_ascii_lowercase().as_str() {
        "r" | "reset" | "new" => Ok(ClientCommand::Reset),
        "s" | "state" => Ok(ClientCommand::ShowState),
        "h" | "help" | "?" => Ok(ClientCommand::Help),
        "q" | "quit" | "exit" => Ok(ClientCommand::Quit),
        _ => Err(CommandParseError::Unknown(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_numbers() {
        assert_eq!(parse_command("4"), Ok(ClientCommand::PlaceMark(4)));
        assert_eq!(parse_command("  0\n"), Ok(ClientCommand::PlaceMark(0)));
        assert_eq!(parse_command("12"), Ok(ClientCommand::PlaceMark(12)));
    }

    #[test]
    fn test_parse_keywords_ignores_case() {
        assert_eq!(parse_command("RESET"), Ok(ClientCommand::Reset));
        assert_eq!(parse_command("new"), Ok(ClientCommand::Reset));
        assert_eq!(parse_command("s"), Ok(ClientCommand::ShowState));
        assert_eq!(parse_command("?"), Ok(ClientCommand::Help));
        assert_eq!(parse_command("Quit"), Ok(ClientCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command("   "), Err(CommandParseError::Empty));
        assert_eq!(parse_command("-1"), Err(CommandParseError::Unknown("-1".to_string())));
        assert_eq!(
            parse_command("place 4"),
            Err(CommandParseError::Unknown("place 4".to_string()))
        );
    }
}
