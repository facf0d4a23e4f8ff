//! Delimiter balance verification for emitted source
//!
//! Checks that `()`, `[]` and `{}` nest correctly outside string literals.
//! Single, double and backtick quoted literals are skipped with backslash
//! escapes honored. A literal may not span a line break unless it is a
//! template literal.

use thiserror::Error;

/// Structural defect found in source text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Unexpected '{found}' at line {line}, column {column}")]
    UnexpectedCloser { found: char, line: usize, column: usize },

    #[error("Expected '{expected}' but found '{found}' at line {line}, column {column}")]
    Mismatched {
        expected: char,
        found: char,
        line: usize,
        column: usize,
    },

    #[error("Unclosed '{opener}' opened at line {line}, column {column}")]
    Unclosed { opener: char, line: usize, column: usize },

    #[error("Unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Verify that every delimiter in `source` is balanced
pub fn check_balance(source: &str) -> Result<(), StructureError> {
    let mut stack: Vec<(char, usize, usize)> = Vec::new();
    let mut chars = source.chars();
    let (mut line, mut column) = (1usize, 0usize);

    while let Some(c) = chars.next() {
        column += 1;
        if c == '\n' {
            line += 1;
            column = 0;
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                let (start_line, start_column) = (line, column);
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    column += 1;
                    match inner {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                column += 1;
                                if escaped == '\n' {
                                    line += 1;
                                    column = 0;
                                }
                            }
                        }
                        '\n' if c != '`' => break,
                        '\n' => {
                            line += 1;
                            column = 0;
                        }
                        q if q == c => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(StructureError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    });
                }
            }
            '(' | '[' | '{' => stack.push((c, line, column)),
            ')' | ']' | '}' => match stack.pop() {
                None => {
                    return Err(StructureError::UnexpectedCloser { found: c, line, column });
                }
                Some((opener, _, _)) if closer_for(opener) != c => {
                    return Err(StructureError::Mismatched {
                        expected: closer_for(opener),
                        found: c,
                        line,
                        column,
                    });
                }
                Some(_) => {}
            },
            _ => {}
        }
    }

    match stack.pop() {
        Some((opener, line, column)) => Err(StructureError::Unclosed { opener, line, column }),
        None => Ok(()),
    }
}
