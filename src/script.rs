// SPDX-License-Identifier: MIT
//
// Edit scripts — the driver's stand-in for a keyboard.
//
// One intent per line. Blank lines and lines starting with `#` are skipped.
//
//   right *5          argument-less intents take an optional `*N` repeat
//   insert hello      text intents take the rest of the line verbatim
//   paste a\nb        escapes: \n \t \\ \0 \xHH
//   resize 40 10
//
// Parsing is separate from replay so a bad script is rejected before any
// edit is applied.

use n_line::{Damage, TextCursor};
use thiserror::Error;
use tracing::warn;

// ─── Intent ─────────────────────────────────────────────────────────────────

/// A single editing intent, as the input widget would forward it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
    Delete,
    Backspace,
    Split,
    Insert(Vec<u8>),
    Overwrite(Vec<u8>),
    Paste(Vec<u8>),
    Set(Vec<u8>),
    Resize { width: usize, height: usize },
}

impl Intent {
    /// Apply to the cursor and return the damage it reports.
    pub fn apply(&self, cur: &mut TextCursor) -> Damage {
        match self {
            Self::Home => cur.home(),
            Self::End => cur.end(),
            Self::Left => cur.left(),
            Self::Right => cur.right(),
            Self::Up => cur.up(),
            Self::Down => cur.down(),
            Self::Delete => cur.delete(),
            Self::Backspace => cur.backspace(),
            Self::Split => cur.split_line(),
            Self::Insert(bytes) => cur.insert_bytes(bytes),
            Self::Overwrite(bytes) => cur.overwrite_bytes(bytes),
            Self::Paste(bytes) => cur.paste(bytes),
            Self::Set(bytes) => cur.set_value(bytes).unwrap_or_else(|err| {
                warn!(%err, "set rejected, document cleared");
                Damage::EXPOSE
            }),
            Self::Resize { width, height } => cur.resize(*width, *height),
        }
    }

    /// Intents that take no argument, by script name.
    fn bare(name: &str) -> Option<Self> {
        Some(match name {
            "home" => Self::Home,
            "end" => Self::End,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "delete" | "del" => Self::Delete,
            "backspace" | "bs" => Self::Backspace,
            "split" | "enter" => Self::Split,
            _ => return None,
        })
    }
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based script line, for diagnostics.
    pub line: usize,
    pub intent: Intent,
    /// How many times to apply `intent`.
    pub repeat: usize,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown intent `{name}`")]
    UnknownIntent { line: usize, name: String },

    #[error("line {line}: `{intent}` needs an argument")]
    MissingArgument { line: usize, intent: &'static str },

    #[error("line {line}: unexpected argument `{arg}`")]
    UnexpectedArgument { line: usize, arg: String },

    #[error("line {line}: `{value}` is not a number")]
    BadNumber { line: usize, value: String },

    #[error("line {line}: bad escape `{escape}`")]
    BadEscape { line: usize, escape: String },
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parse a whole script.
///
/// # Errors
///
/// The first malformed line, with its 1-based line number.
pub fn parse(src: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        if let Some(step) = parse_line(i + 1, raw)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Step>, ScriptError> {
    let text = raw.trim_start();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));

    if let Some(intent) = Intent::bare(name) {
        let repeat = parse_repeat(line, rest.trim())?;
        return Ok(Some(Step {
            line,
            intent,
            repeat,
        }));
    }

    let intent = match name {
        "insert" => Intent::Insert(text_arg(line, "insert", rest)?),
        "overwrite" => Intent::Overwrite(text_arg(line, "overwrite", rest)?),
        "paste" => Intent::Paste(text_arg(line, "paste", rest)?),
        // An empty document is a valid value.
        "set" => Intent::Set(unescape(line, rest)?),
        "resize" => parse_resize(line, rest)?,
        _ => {
            return Err(ScriptError::UnknownIntent {
                line,
                name: name.to_owned(),
            });
        }
    };
    Ok(Some(Step {
        line,
        intent,
        repeat: 1,
    }))
}

fn parse_repeat(line: usize, arg: &str) -> Result<usize, ScriptError> {
    if arg.is_empty() {
        return Ok(1);
    }
    let Some(count) = arg.strip_prefix('*') else {
        return Err(ScriptError::UnexpectedArgument {
            line,
            arg: arg.to_owned(),
        });
    };
    number(line, count.trim())
}

fn parse_resize(line: usize, rest: &str) -> Result<Intent, ScriptError> {
    let mut parts = rest.split_whitespace();
    let (Some(w), Some(h)) = (parts.next(), parts.next()) else {
        return Err(ScriptError::MissingArgument {
            line,
            intent: "resize",
        });
    };
    if let Some(extra) = parts.next() {
        return Err(ScriptError::UnexpectedArgument {
            line,
            arg: extra.to_owned(),
        });
    }
    Ok(Intent::Resize {
        width: number(line, w)?,
        height: number(line, h)?,
    })
}

fn text_arg(line: usize, intent: &'static str, rest: &str) -> Result<Vec<u8>, ScriptError> {
    if rest.is_empty() {
        return Err(ScriptError::MissingArgument { line, intent });
    }
    unescape(line, rest)
}

fn number(line: usize, value: &str) -> Result<usize, ScriptError> {
    value.parse().map_err(|_| ScriptError::BadNumber {
        line,
        value: value.to_owned(),
    })
}

/// Decode `\n \t \\ \0 \xHH` escapes into raw bytes.
///
/// # Errors
///
/// An unknown escape or a malformed `\x`.
pub fn unescape(line: usize, text: &str) -> Result<Vec<u8>, ScriptError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let bad = |len: usize| ScriptError::BadEscape {
            line,
            escape: String::from_utf8_lossy(&bytes[i..(i + len).min(bytes.len())]).into_owned(),
        };
        match bytes.get(i + 1) {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'\\') => out.push(b'\\'),
            Some(b'0') => out.push(0),
            Some(b'x') => {
                let hex = bytes
                    .get(i + 2..i + 4)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .ok_or_else(|| bad(4))?;
                let hex = std::str::from_utf8(hex).map_err(|_| bad(4))?;
                out.push(u8::from_str_radix(hex, 16).map_err(|_| bad(4))?);
                i += 2;
            }
            _ => return Err(bad(2)),
        }
        i += 2;
    }
    Ok(out)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
