//! Splits an input line into tokens.
//!
//! Whitespace separates tokens. Single and double quotes group characters
//! into one token and are removed. A backslash outside single quotes takes
//! the next character literally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(&'static str),
    #[error("trailing backslash")]
    TrailingBackslash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Word,
    SingleQuote,
    DoubleQuote,
}

struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    state: State,
    buffer: String,
    /// Set once a quote opened the current token, so `""` yields an empty token.
    in_token: bool,
    out: Vec<String>,
}

impl<'a> Lexer<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            chars: line.chars(),
            state: State::Start,
            buffer: String::new(),
            in_token: false,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<String>, TokenizeError> {
        while let Some(ch) = self.chars.next() {
            match self.state {
                State::Start | State::Word => self.handle_word(ch)?,
                State::SingleQuote => self.handle_single_quote(ch),
                State::DoubleQuote => self.handle_double_quote(ch)?,
            }
        }

        match self.state {
            State::SingleQuote => return Err(TokenizeError::UnterminatedQuote("single")),
            State::DoubleQuote => return Err(TokenizeError::UnterminatedQuote("double")),
            State::Start | State::Word => {}
        }

        self.finish_token();
        Ok(self.out)
    }

    fn handle_word(&mut self, ch: char) -> Result<(), TokenizeError> {
        match ch {
            c if c.is_whitespace() => {
                self.finish_token();
                self.state = State::Start;
            }
            '\'' => {
                self.in_token = true;
                self.state = State::SingleQuote;
            }
            '"' => {
                self.in_token = true;
                self.state = State::DoubleQuote;
            }
            '\\' => {
                let escaped = self.chars.next().ok_or(TokenizeError::TrailingBackslash)?;
                self.push(escaped);
                self.state = State::Word;
            }
            c => {
                self.push(c);
                self.state = State::Word;
            }
        }
        Ok(())
    }

    fn handle_single_quote(&mut self, ch: char) {
        if ch == '\'' {
            self.state = State::Word;
        } else {
            self.buffer.push(ch);
        }
    }

    fn handle_double_quote(&mut self, ch: char) -> Result<(), TokenizeError> {
        match ch {
            '"' => self.state = State::Word,
            '\\' => {
                let escaped = self
                    .chars
                    .next()
                    .ok_or(TokenizeError::UnterminatedQuote("double"))?;
                self.buffer.push(escaped);
            }
            c => self.buffer.push(c),
        }
        Ok(())
    }

    fn push(&mut self, ch: char) {
        self.in_token = true;
        self.buffer.push(ch);
    }

    fn finish_token(&mut self) {
        if self.in_token {
            self.out.push(std::mem::take(&mut self.buffer));
            self.in_token = false;
        }
    }
}

/// Splits `line` into shell-style tokens.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    Lexer::new(line).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_split() {
        assert_eq!(
            tokenize("  daemon  -t 2s\tprod ").unwrap(),
            ["daemon", "-t", "2s", "prod"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quotes_group_words() {
        assert_eq!(
            tokenize(r#"echo "hello world" 'a b' mixed"in"side"#).unwrap(),
            ["echo", "hello world", "a b", "mixedinside"]
        );
        assert_eq!(tokenize(r#"x "" ''"#).unwrap(), ["x", "", ""]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(tokenize(r"a\ b c\\d").unwrap(), ["a b", r"c\d"]);
        assert_eq!(tokenize(r#""say \"hi\"""#).unwrap(), [r#"say "hi""#]);
        assert_eq!(tokenize(r"'no\escape'").unwrap(), [r"no\escape"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            tokenize("echo \"open").unwrap_err(),
            TokenizeError::UnterminatedQuote("double")
        );
        assert_eq!(
            tokenize("echo 'open").unwrap_err(),
            TokenizeError::UnterminatedQuote("single")
        );
        assert_eq!(
            tokenize("echo \\").unwrap_err(),
            TokenizeError::TrailingBackslash
        );
    }
}
