//! Line-oriented interactive input.
//!
//! [`LinePrompt`] writes a prompt, reads one line, remembers it in a history
//! list and tokenizes it with the parser's [`TokenizeMode`]. Reader and
//! writer are generic so tests can drive it with in-memory buffers.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::Parser;
use crate::error::PromptError;
use crate::target::Target;
use crate::tokenizer::{TokenizeMode, split_line};

pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
    prompt: String,
    history: Vec<String>,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            prompt: ">".to_string(),
            history: Vec::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    /// Non-blank lines read so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Writes the prompt and reads one line without its line terminator.
    ///
    /// Returns `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, PromptError> {
        write!(self.writer, "{} ", self.prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        if !line.trim().is_empty() {
            self.history.push(line.clone());
        }
        Ok(Some(line))
    }

    /// Reads one line and splits it with `mode`.
    pub fn read_tokens(&mut self, mode: TokenizeMode) -> Result<Option<Vec<String>>, PromptError> {
        Ok(self.read_line()?.map(|line| split_line(&line, mode)))
    }

    /// Reads one line and binds it to a fresh `T`.
    ///
    /// Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// [`PromptError::Io`] for read/write failures and [`PromptError::Parse`]
    /// when the line does not bind.
    pub fn read_command<T: Target>(&mut self, parser: &Parser) -> Result<Option<T>, PromptError> {
        let Some(tokens) = self.read_tokens(parser.config().tokenize_mode)? else {
            return Ok(None);
        };
        debug!(tokens = tokens.len(), "Read command line");
        Ok(Some(parser.parse(&tokens)?))
    }

    /// Writes `text` followed by a newline.
    pub fn write_line(&mut self, text: &str) -> Result<(), PromptError> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_reads_lines_and_records_history() {
        let input = Cursor::new("first line\r\n\nsecond\n");
        let mut prompt = LinePrompt::new(input, Vec::new()).with_prompt("argbind>");

        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("first line"));
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(prompt.read_line().unwrap(), None);

        assert_eq!(prompt.history(), ["first line", "second"]);
        let (_, output) = prompt.into_inner();
        assert_eq!(String::from_utf8(output).unwrap(), "argbind> ".repeat(4));
    }

    #[test]
    fn test_read_tokens_splits_quoted() {
        let input = Cursor::new("add 'two words' x\n");
        let mut prompt = LinePrompt::new(input, Vec::new());

        let tokens = prompt.read_tokens(TokenizeMode::Quoted).unwrap().unwrap();
        assert_eq!(tokens, vec!["add", "two words", "x"]);
    }
}
