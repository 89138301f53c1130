use std::{iter::Peekable, str::CharIndices};

use logos::Lexer;

use super::{RawError, RawToken};

/// A piece of a string literal as scanned, with byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RawSegment {
    Text(String),
    Name {
        name:   String,
        /// Offset of the `$`.
        offset: usize,
    },
    Code {
        source:      String,
        /// Offset of the `$`.
        offset:      usize,
        /// Offset of the first character after `${`.
        code_offset: usize,
    },
}

/// Scans the body of a string literal after its opening quote.
///
/// Resolves escapes, splits out `$name` and `${...}` template segments and
/// bumps the lexer past the closing quote. Strings may not span lines.
///
/// # Errors
/// - [`RawError::UnterminatedString`] on a newline or end of input before the
///   closing quote.
/// - [`RawError::InvalidEscape`] for an unknown escape character.
/// - [`RawError::UnterminatedTemplate`] for a `${` without its `}`.
pub(super) fn lex_string(lex: &mut Lexer<'_, RawToken>) -> Result<Vec<RawSegment>, RawError> {
    let base = lex.span().end;
    let rest = lex.remainder();

    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = rest.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                flush_text(&mut segments, &mut text);
                lex.bump(i + 1);
                return Ok(segments);
            },
            '\n' => return Err(RawError::UnterminatedString),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, '"')) => text.push('"'),
                Some((_, '$')) => text.push('$'),
                Some((_, '\n')) | None => return Err(RawError::UnterminatedString),
                Some((_, escape)) => {
                    return Err(RawError::InvalidEscape { escape,
                                                         offset: base + i });
                },
            },
            '$' => match chars.peek().map(|&(_, next)| next) {
                Some(next) if next == '_' || next.is_alphabetic() => {
                    flush_text(&mut segments, &mut text);
                    let start = i + 1;
                    let mut end = start;
                    while let Some(&(j, ch)) = chars.peek() {
                        if ch == '_' || ch.is_alphanumeric() {
                            end = j + ch.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    segments.push(RawSegment::Name { name:   rest[start..end].to_string(),
                                                     offset: base + i, });
                },
                Some('{') => {
                    chars.next();
                    flush_text(&mut segments, &mut text);
                    let code_start = i + 2;
                    let code_end =
                        scan_template_code(&mut chars).ok_or(RawError::UnterminatedTemplate {
                            offset: base + i,
                        })?;
                    segments.push(RawSegment::Code { source:      rest[code_start..code_end].to_string(),
                                                     offset:      base + i,
                                                     code_offset: base + code_start, });
                },
                _ => text.push('$'),
            },
            other => text.push(other),
        }
    }

    Err(RawError::UnterminatedString)
}

fn flush_text(segments: &mut Vec<RawSegment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(RawSegment::Text(std::mem::take(text)));
    }
}

/// Advances past the code of a `${...}` segment and returns the offset of its
/// closing brace. Nested braces and string literals inside the code are
/// skipped over; a newline or end of input yields `None`.
fn scan_template_code(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut depth = 1usize;

    while let Some((i, c)) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            },
            '"' => loop {
                match chars.next()? {
                    (_, '\\') => {
                        chars.next()?;
                    },
                    (_, '"') => break,
                    (_, '\n') => return None,
                    _ => {},
                }
            },
            '\n' => return None,
            _ => {},
        }
    }

    None
}
