use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A script line that does not name a valid command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line:    usize,
    pub message: String,
}

/// One caller request against the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Command {
    Push(i32),
    Pop,
    Peek,
    Size,
    Empty,
    Full,
    Capacity,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Push(v)  => write!(f, "push {}", v),
            Command::Pop      => f.write_str("pop"),
            Command::Peek     => f.write_str("peek"),
            Command::Size     => f.write_str("size"),
            Command::Empty    => f.write_str("empty"),
            Command::Full     => f.write_str("full"),
            Command::Capacity => f.write_str("capacity"),
        }
    }
}

/// A parsed command plus the 1-based script line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub line:    usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped; `;`
/// separates several commands on one line.
pub fn parse(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let code = raw.split('#').next().unwrap_or("");
        for segment in code.split(';') {
            if segment.trim().is_empty() { continue; }
            let command = parse_command(segment)
                .map_err(|message| ScriptError { line, message })?;
            steps.push(Step { line, command });
        }
    }
    Ok(steps)
}

fn parse_command(segment: &str) -> Result<Command, String> {
    let mut words = segment.split_whitespace();
    let verb = words.next().unwrap_or("").to_ascii_lowercase();
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{}'", extra));
    }

    let cmd = match (verb.as_str(), arg) {
        ("push", Some(v)) => {
            let n = v.parse::<i32>()
                .map_err(|_| format!("push expects an integer, got '{}'", v))?;
            Command::Push(n)
        }
        ("push", None) => return Err("push expects a value".into()),

        ("pop",  None)                  => Command::Pop,
        ("peek", None)                  => Command::Peek,
        ("size", None) | ("len", None)  => Command::Size,
        ("empty", None)                 => Command::Empty,
        ("full", None)                  => Command::Full,
        ("capacity", None) | ("cap", None) => Command::Capacity,

        ("pop" | "peek" | "size" | "len" | "empty" | "full" | "capacity" | "cap", Some(a)) => {
            return Err(format!("'{}' takes no argument, got '{}'", verb, a));
        }
        _ => return Err(format!("unknown command '{}'", verb)),
    };
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(text: &str) -> Vec<Command> {
        parse(text).unwrap().into_iter().map(|s| s.command).collect()
    }

    #[test]
    fn parses_every_verb() {
        let got = commands("push 1\nPUSH -2\npop\npeek\nsize\nlen\nempty\nfull\ncapacity\ncap");
        assert_eq!(got, vec![
            Command::Push(1), Command::Push(-2), Command::Pop, Command::Peek,
            Command::Size, Command::Size, Command::Empty, Command::Full,
            Command::Capacity, Command::Capacity,
        ]);
    }

    #[test]
    fn comments_blanks_and_semicolons() {
        let text = "# header\n\n  push 5 ; pop   # trailing\n;;size\n";
        let steps = parse(text).unwrap();
        assert_eq!(steps, vec![
            Step { line: 3, command: Command::Push(5) },
            Step { line: 3, command: Command::Pop },
            Step { line: 4, command: Command::Size },
        ]);
    }

    #[test]
    fn errors_carry_line_number() {
        let err = parse("push 1\njump\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.to_string(), "line 2: unknown command 'jump'");
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse("push").is_err());
        assert!(parse("push x").is_err());
        assert!(parse("push 99999999999").is_err());
        assert!(parse("pop 3").is_err());
        assert!(parse("push 1 2").is_err());
    }

    #[test]
    fn display_round_trips_through_parser() {
        let cmd = Command::Push(-40);
        assert_eq!(commands(&cmd.to_string()), vec![cmd]);
    }
}
