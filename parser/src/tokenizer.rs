//! Splitting a single command line into argument tokens.
//!
//! Two modes are supported:
//!
//! - [`TokenizeMode::Quoted`]: whitespace separates tokens, and a run between
//!   matching `'` or `"` quotes is taken verbatim as one token.
//! - [`TokenizeMode::Argv`]: the rules a process-launch command line follows,
//!   including an executable-path first token and backslash folding before
//!   quotes.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// How [`split_line`] breaks a line into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// Quote-delimited splitting, for interactive input.
    #[default]
    Quoted,
    /// Process command-line rules, token 0 being the program path.
    Argv,
}

/// Splits `line` according to `mode`.
///
/// # Examples
///
/// ```
/// use argbind::{TokenizeMode, split_line};
///
/// let tokens = split_line(r#"--name "John Doe" -v"#, TokenizeMode::Quoted);
/// assert_eq!(tokens, vec!["--name", "John Doe", "-v"]);
///
/// let argv = split_line(r#"tool.exe --path "C:\dir\\" x"#, TokenizeMode::Argv);
/// assert_eq!(argv, vec!["tool.exe", "--path", r"C:\dir\", "x"]);
/// ```
pub fn split_line(line: &str, mode: TokenizeMode) -> Vec<String> {
    let tokens = match mode {
        TokenizeMode::Quoted => split_quoted(line),
        TokenizeMode::Argv => split_argv(line),
    };
    trace!(?mode, count = tokens.len(), "Split command line");
    tokens
}

/// Quote-aware splitting.
///
/// An opening quote ends any pending token; everything up to the matching
/// closing quote is one token, other quote characters included. Tokens that
/// are empty or whitespace-only are dropped. An unterminated quote keeps what
/// it collected.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => {
                push_token(&mut tokens, &mut current);
                quote = None;
            }
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                push_token(&mut tokens, &mut current);
                quote = Some(ch);
            }
            None if ch.is_whitespace() => push_token(&mut tokens, &mut current),
            None => current.push(ch),
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    if current.trim().is_empty() {
        current.clear();
    } else {
        tokens.push(std::mem::take(current));
    }
}

/// Process command-line splitting.
///
/// Token 0 is the program path: either the text inside a leading pair of
/// double quotes, or everything up to the first whitespace, with backslashes
/// kept literally. For later tokens, `N` backslashes followed by `"` emit
/// `N / 2` backslashes, and the quote is literal when `N` is odd. Three
/// consecutive quotes produce one literal quote. An empty quoted token (`""`)
/// is kept.
pub fn split_argv(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if i == chars.len() {
        return tokens;
    }

    let mut program = String::new();
    if chars[i] == '"' {
        i += 1;
        while i < chars.len() && chars[i] != '"' {
            program.push(chars[i]);
            i += 1;
        }
        // closing quote
        i += 1;
    } else {
        while i < chars.len() && !chars[i].is_whitespace() {
            program.push(chars[i]);
            i += 1;
        }
    }
    tokens.push(program);

    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                let start = i;
                while i < chars.len() && chars[i] == '\\' {
                    i += 1;
                }
                let count = i - start;
                if chars.get(i) == Some(&'"') {
                    current.extend(std::iter::repeat_n('\\', count / 2));
                    if count % 2 == 1 {
                        current.push('"');
                        i += 1;
                    }
                } else {
                    current.extend(std::iter::repeat_n('\\', count));
                }
                in_token = true;
            }
            '"' => {
                if chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"') {
                    current.push('"');
                    i += 3;
                } else {
                    in_quotes = !in_quotes;
                    i += 1;
                }
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
                i += 1;
            }
            c => {
                current.push(c);
                in_token = true;
                i += 1;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}
