//! Parsing of the lines typed at the `termtutor >` prompt.

/// One shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Start { technology: String, module: String },
    Next,
    Prev,
    /// 1-based lesson number, as shown by `toc`.
    Goto(usize),
    Toc,
    Practice(String),
    Hint,
    Skip,
    More,
    Ask(String),
    Status,
    Summary,
    Help,
    Version,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' to see the available commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Name, arguments and description of every command, in `help` order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("list", "List all technologies and their learning modules."),
    ("start <technology> <module>", "Start a new learning module."),
    ("next, n", "Proceed to the next lesson."),
    ("prev", "Return to the previous lesson."),
    ("goto <number>", "Jump to a lesson number from 'toc'."),
    ("toc", "Show the table of contents for the current module."),
    ("practice <command>, p <command>", "Answer the current practice exercise."),
    ("hint", "Get a hint for the current practice exercise."),
    ("skip", "Skip the current exercise and move on."),
    ("more", "Generate more lessons after completing a module."),
    ("summary", "Generate a summary of the completed module."),
    ("ask <question>", "Ask the tutor about the current technology."),
    ("status", "Show your current progress."),
    ("version", "Show the application version."),
    ("help", "Show this list."),
    ("exit, quit", "Leave the tutor."),
];

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "list" => Command::List,
        "start" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(technology), Some(module), None) => Command::Start {
                    technology: technology.to_string(),
                    module: module.to_string(),
                },
                _ => return Err(ParseError::Usage("start <technology> <module>")),
            }
        }
        "next" | "n" => Command::Next,
        "prev" => Command::Prev,
        "goto" => rest
            .parse()
            .map(Command::Goto)
            .map_err(|_| ParseError::Usage("goto <lesson number>"))?,
        "toc" => Command::Toc,
        "practice" | "p" => {
            let answer = strip_quotes(rest);
            if answer.is_empty() {
                return Err(ParseError::Usage("p '<command>'"));
            }
            Command::Practice(answer.to_string())
        }
        "hint" => Command::Hint,
        "skip" => Command::Skip,
        "more" => Command::More,
        "ask" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("ask <question>"));
            }
            Command::Ask(rest.to_string())
        }
        "status" => Command::Status,
        "summary" => Command::Summary,
        "help" => Command::Help,
        "version" => Command::Version,
        "exit" | "quit" => Command::Exit,
        _ => return Err(ParseError::Unknown(verb.to_string())),
    };
    Ok(Some(command))
}

/// Removes one pair of matching surrounding quotes, single or double.
fn strip_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
