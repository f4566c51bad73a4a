// SPDX-License-Identifier: MIT
//
// n-field — headless driver for the n-line text-input engine.
//
// Plays the part of the input widget: it reads an edit script, forwards
// each intent to a TextCursor, and uses the returned damage the way a
// renderer would. At the end it prints what the viewport shows.
//
//   script → parse → Intent::apply → TextCursor → Damage
//                                         │
//                                         └→ visible_rows → framed viewport
//
// Output:
//
//   +-----+
//   |Hello|   ← one row per visible line, windowed by offset_x
//   |Hi   |
//   +-----+
//   2:3  caret 2,1  offset 0,0  lines 2
//   Hello\nHi

mod script;

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use n_line::{Damage, EngineConfig, GrowPolicy, TextCursor};

use crate::script::Step;

// ─── CLI ────────────────────────────────────────────────────────────────────

/// Replay an edit script through the line engine and print the viewport.
///
/// Examples:
///   n-field edits.txt                      # replay a script file
///   echo 'insert hi' | n-field             # script from stdin
///   n-field --value notes.txt -W 40 -H 10  # start from a document
///   n-field --trace edits.txt              # show damage per step
#[derive(Parser, Debug)]
#[command(name = "n-field", version, about)]
struct Cli {
    /// Edit script to replay. Reads stdin when omitted.
    script: Option<PathBuf>,

    /// Viewport width in cells.
    #[arg(long, short = 'W', default_value_t = 20)]
    width: usize,

    /// Viewport height in rows.
    #[arg(long, short = 'H', default_value_t = 5)]
    height: usize,

    /// File loaded as the initial document before the script runs.
    #[arg(long)]
    value: Option<PathBuf>,

    /// Reject edits that would grow a line past this many bytes.
    #[arg(long)]
    max_line_len: Option<usize>,

    /// Print the damage reported by every step.
    #[arg(long)]
    trace: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("n-field: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading script from stdin")?;
            buf
        }
    };
    let steps = script::parse(&source)?;
    debug!(steps = steps.len(), "script parsed");

    let grow = GrowPolicy::new().with_max_line_len(cli.max_line_len);
    let config = EngineConfig::new(cli.width, cli.height).with_grow_policy(grow);
    let mut cur = TextCursor::with_config(config);

    if let Some(path) = &cli.value {
        let bytes = fs::read(path).with_context(|| format!("reading value {}", path.display()))?;
        cur.set_value(&bytes)
            .with_context(|| format!("loading value {}", path.display()))?;
    }

    let mut out = io::stdout().lock();
    let total = replay(&mut cur, &steps, cli.trace.then_some(&mut out as &mut dyn Write))?;
    info!(damage = %total, "replay finished");

    out.write_all(render(&cur).as_bytes())?;
    out.flush()?;
    Ok(())
}

// ─── Replay ─────────────────────────────────────────────────────────────────

/// Apply every step, optionally logging per-step damage to `trace`. Returns
/// the union of all damage, i.e. what a renderer batching the whole script
/// would repaint.
fn replay(cur: &mut TextCursor, steps: &[Step], mut trace: Option<&mut dyn Write>) -> Result<Damage> {
    let mut total = Damage::NONE;
    for step in steps {
        let mut damage = Damage::NONE;
        for _ in 0..step.repeat {
            damage |= step.intent.apply(cur);
        }
        if let Some(w) = trace.as_deref_mut() {
            writeln!(
                w,
                "{:>4}  {:<24} slot {:>3}  row {:>3}",
                step.line,
                damage.to_string(),
                cur.slot_x(),
                cur.row()
            )?;
        }
        total |= damage;
    }
    Ok(total)
}

// ─── Viewport printout ──────────────────────────────────────────────────────

/// Frame the visible rows, then a status line and the document value.
///
/// Bytes outside printable ASCII show as `.` so the frame stays aligned.
fn render(cur: &TextCursor) -> String {
    let width = cur.len_x();
    let border = format!("+{}+\n", "-".repeat(width));

    let mut out = String::new();
    out.push_str(&border);

    let mut drawn = 0;
    for row in cur.visible_rows() {
        out.push('|');
        out.extend(row.bytes.iter().map(|&b| printable(b)));
        out.push_str(&" ".repeat(width - row.bytes.len()));
        out.push_str("|\n");
        drawn += 1;
    }
    // Rows past the end of the document.
    for _ in drawn..cur.len_y() {
        let _ = writeln!(out, "|{}|", " ".repeat(width));
    }
    out.push_str(&border);

    // 1-indexed for humans, like an editor status line.
    let _ = writeln!(
        out,
        "{}:{}  caret {},{}  offset {},{}  lines {}",
        cur.row() + 1,
        cur.slot_x() + 1,
        cur.caret_x(),
        cur.caret_y(),
        cur.offset_x(),
        cur.offset_y(),
        cur.line_count()
    );
    out.extend(cur.get_value().into_iter().map(printable_or_newline));
    out.push('\n');
    out
}

const fn printable(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '.'
    }
}

const fn printable_or_newline(b: u8) -> char {
    if b == b'\n' { '\n' } else { printable(b) }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
