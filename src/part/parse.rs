//! Path grammar parser: `M a L b C c1 c2 d z`.
//!
//! Tokens are separated by whitespace. Any token that is not a command
//! letter is a point key; bare keys repeat the previous command, so a key
//! after `M` or `L` draws a line and keys after `C` are read in triples.

use crate::error::{PartError, Result, SeamkitError};

use super::{Part, Path, PointId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move,
    Line,
    Curve,
    Close,
}

impl Command {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "M" => Some(Self::Move),
            "L" => Some(Self::Line),
            "C" => Some(Self::Curve),
            "z" | "Z" => Some(Self::Close),
            _ => None,
        }
    }
}

struct PathParser<'a> {
    part: &'a Part,
    tokens: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
    // command applied to bare keys
    prev_cmd: Option<Command>,
}

impl<'a> PathParser<'a> {
    fn new(text: &'a str, part: &'a Part) -> Self {
        Self {
            part,
            tokens: text.split_whitespace().peekable(),
            prev_cmd: None,
        }
    }

    fn error(reason: impl Into<String>) -> SeamkitError {
        PartError::InvalidPath(reason.into()).into()
    }

    fn parse_cmd(&mut self) -> Result<Command> {
        let Some(&token) = self.tokens.peek() else {
            return Err(Self::error("unexpected end of input"));
        };
        if let Some(cmd) = Command::from_token(token) {
            self.tokens.next();
            self.prev_cmd = match cmd {
                Command::Move => Some(Command::Line),
                Command::Close => None,
                other => Some(other),
            };
            return Ok(cmd);
        }
        self.prev_cmd
            .ok_or_else(|| Self::error(format!("expected a command before `{token}`")))
    }

    fn parse_point(&mut self, cmd: &str) -> Result<PointId> {
        match self.tokens.next() {
            Some(token) if Command::from_token(token).is_none() => self.part.point_id(token),
            Some(token) => Err(Self::error(format!(
                "`{cmd}` expects a point key, found `{token}`"
            ))),
            None => Err(Self::error(format!("`{cmd}` is missing a point key"))),
        }
    }

    fn parse(mut self) -> Result<Path> {
        if self.tokens.peek().is_none() {
            return Err(Self::error("empty path"));
        }
        let mut path = match self.parse_cmd()? {
            Command::Move => Path::new(self.parse_point("M")?),
            _ => return Err(Self::error("a path must start with `M`")),
        };

        while self.tokens.peek().is_some() {
            path = match self.parse_cmd()? {
                Command::Move => return Err(Self::error("`M` may only appear once")),
                Command::Line => path.line(self.parse_point("L")?),
                Command::Curve => {
                    let cp1 = self.parse_point("C")?;
                    let cp2 = self.parse_point("C")?;
                    let to = self.parse_point("C")?;
                    path.curve(cp1, cp2, to)
                }
                Command::Close => {
                    if let Some(extra) = self.tokens.next() {
                        return Err(Self::error(format!("unexpected `{extra}` after `z`")));
                    }
                    path.close()
                }
            };
        }

        Ok(path)
    }
}

/// Parses grammar text into a path over the points of `part`.
pub(super) fn parse_path(text: &str, part: &Part) -> Result<Path> {
    PathParser::new(text, part).parse()
}
