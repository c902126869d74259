// SPDX-License-Identifier: MIT
//
// n-vcol — a probe for the n-cursor column engine.
//
// Loads a file, applies `:set`-style options, places a cursor and runs one
// engine operation on it, then prints where the cursor ended up:
//
//   file → Buffer → Options::set → Context
//        → Cursor::clamp → advance / advance_force / step → report
//
// Useful for checking how a column maps to bytes under a given mode,
// tabstop and virtualedit setting:
//
//   n-vcol notes.txt --line 3 --column 12 --set "ts=4 ve=all" --force

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, ValueEnum};

use n_cursor::buffer::{Buffer, LineStore};
use n_cursor::step::{Backward, Forward};
use n_cursor::{ColumnError, Context, Cursor, Mode, Options, Position, TargetColumn, VisualKind};

// ─── Command line ───────────────────────────────────────────────────────────

/// Move a cursor to a screen column and report the byte position it lands on.
#[derive(Parser, Debug)]
#[command(name = "n-vcol", version, about)]
struct Cli {
    /// File to load.
    file: PathBuf,

    /// Line to put the cursor on (1-indexed).
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Byte offset to start from (0-indexed).
    #[arg(long, default_value_t = 0)]
    byte: usize,

    /// Screen column to move to (0-indexed), or `$` for the end of the line.
    #[arg(long, value_parser = parse_target)]
    column: Option<TargetColumn>,

    /// Options in `:set` syntax, e.g. "ts=4 list ve=all". May be repeated.
    #[arg(long = "set", value_name = "OPTIONS")]
    set: Vec<String>,

    /// Editing mode the cursor is in.
    #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
    mode: ModeArg,

    /// Write spaces into the line where virtual editing needs them.
    #[arg(long)]
    force: bool,

    /// Anchor of the visual selection, as LINE:BYTE.
    #[arg(long, value_parser = parse_position)]
    visual_start: Option<Position>,

    /// Step one character after placing the cursor.
    #[arg(long, value_enum)]
    step: Option<StepArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Normal,
    Insert,
    Replace,
    Visual,
    VisualLine,
    VisualBlock,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Normal => Self::Normal,
            ModeArg::Insert => Self::Insert,
            ModeArg::Replace => Self::Replace,
            ModeArg::Visual => Self::Visual(VisualKind::Char),
            ModeArg::VisualLine => Self::Visual(VisualKind::Line),
            ModeArg::VisualBlock => Self::Visual(VisualKind::Block),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StepArg {
    Forward,
    ForwardSkip,
    Backward,
    BackwardSkip,
}

fn parse_target(arg: &str) -> Result<TargetColumn, String> {
    if arg == "$" {
        return Ok(TargetColumn::EndOfLine);
    }
    arg.parse::<usize>()
        .map(TargetColumn::Column)
        .map_err(|_| format!("expected a column number or `$`, got `{arg}`"))
}

fn parse_position(arg: &str) -> Result<Position, String> {
    let (line, byte) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:BYTE, got `{arg}`"))?;
    let line = line
        .parse::<usize>()
        .map_err(|_| format!("invalid line `{line}`"))?;
    let byte = byte
        .parse::<usize>()
        .map_err(|_| format!("invalid byte offset `{byte}`"))?;
    if line == 0 {
        return Err("lines are numbered from 1".to_string());
    }
    Ok(Position::new(line, byte))
}

// ─── Running ────────────────────────────────────────────────────────────────

/// Outcome of the requested operation, for the report.
enum Outcome {
    Moved,
    Unreachable(ColumnError),
    Stepped(&'static str),
}

fn run(cli: &Cli, buf: &mut Buffer, out: &mut impl Write) -> Result<()> {
    let mut options = Options::default();
    for args in &cli.set {
        for shown in options.set(args).with_context(|| format!("--set {args}"))? {
            writeln!(out, "{shown}")?;
        }
    }

    let mut edit = options.edit_state(cli.mode.into());
    edit.visual_start = cli.visual_start;
    let ctx = Context::new(options.display_config(buf.line_count()), edit);

    let mut cursor = Cursor::at(Position::new(cli.line, cli.byte));
    cursor.clamp(buf, &ctx);

    let mut outcome = Outcome::Moved;
    if let Some(target) = cli.column {
        let result = if cli.force {
            cursor.advance_force(buf, target, &ctx).map(|_| ())
        } else {
            cursor.advance(buf, target, &ctx)
        };
        match result {
            Ok(()) => {}
            Err(e) if e.is_unreachable() => outcome = Outcome::Unreachable(e),
            Err(e) => return Err(anyhow::Error::new(e).context("advance failed")),
        }
    }

    if let Some(step) = cli.step {
        outcome = Outcome::Stepped(match step {
            StepArg::Forward => forward_name(cursor.step_forward(buf, &ctx)),
            StepArg::ForwardSkip => forward_name(cursor.step_forward_skip(buf, &ctx)),
            StepArg::Backward => backward_name(cursor.step_backward(buf, &ctx)),
            StepArg::BackwardSkip => backward_name(cursor.step_backward_skip(buf, &ctx)),
        });
    }

    report(&cursor, buf, &ctx, &outcome, out)
}

const fn forward_name(step: Forward) -> &'static str {
    match step {
        Forward::SameLine => "same line",
        Forward::NextLine => "next line",
        Forward::LineEnd => "line end",
        Forward::EndOfBuffer => "end of buffer",
    }
}

const fn backward_name(step: Backward) -> &'static str {
    match step {
        Backward::SameLine => "same line",
        Backward::PreviousLine => "previous line",
        Backward::StartOfBuffer => "start of buffer",
    }
}

fn report(
    cursor: &Cursor,
    buf: &mut Buffer,
    ctx: &Context<'_>,
    outcome: &Outcome,
    out: &mut impl Write,
) -> Result<()> {
    let pos = cursor.position();
    let span = cursor.span(buf, ctx);
    writeln!(
        out,
        "line {} byte {} coladd {}  vcol {} (cells {}-{})",
        pos.line, pos.col, pos.coladd, span.start, span.start, span.end
    )?;
    if let Some(want) = cursor.want_col() {
        writeln!(out, "want column {want}")?;
    }
    match outcome {
        Outcome::Moved => writeln!(out, "ok")?,
        Outcome::Unreachable(e) => writeln!(out, "{e}")?,
        Outcome::Stepped(step) => writeln!(out, "step: {step}")?,
    }
    for change in buf.take_changes() {
        let text = buf.line(change.line).unwrap_or_default();
        writeln!(out, "changed line {} from byte {}: {text:?}", change.line, change.col)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if !cli.file.is_file() {
        bail!("{}: not a file", cli.file.display());
    }
    let mut buf = Buffer::from_file(&cli.file).with_context(|| cli.file.display().to_string())?;
    tracing::debug!(path = %cli.file.display(), lines = buf.line_count(), "loaded");

    let stdout = io::stdout();
    run(&cli, &mut buf, &mut stdout.lock())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("n-vcol").chain(args.iter().copied())).unwrap()
    }

    fn output(args: &[&str], text: &str) -> String {
        let cli = cli(args);
        let mut buf = Buffer::from_text(text);
        let mut out = Vec::new();
        run(&cli, &mut buf, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── Parsing ───────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let c = cli(&["file.txt"]);
        assert_eq!(c.file, PathBuf::from("file.txt"));
        assert_eq!(c.line, 1);
        assert_eq!(c.byte, 0);
        assert_eq!(c.column, None);
        assert_eq!(c.mode, ModeArg::Normal);
        assert!(!c.force);
        assert!(c.set.is_empty());
    }

    #[test]
    fn column_accepts_number_or_dollar() {
        assert_eq!(cli(&["f", "--column", "7"]).column, Some(TargetColumn::Column(7)));
        assert_eq!(cli(&["f", "--column", "$"]).column, Some(TargetColumn::EndOfLine));
        assert!(Cli::try_parse_from(["n-vcol", "f", "--column", "x"]).is_err());
    }

    #[test]
    fn visual_start_and_mode() {
        let c = cli(&["f", "--mode", "visual-block", "--visual-start", "2:3"]);
        assert_eq!(Mode::from(c.mode), Mode::Visual(VisualKind::Block));
        assert_eq!(c.visual_start, Some(Position::new(2, 3)));
        assert!(Cli::try_parse_from(["n-vcol", "f", "--visual-start", "0:1"]).is_err());
        assert!(Cli::try_parse_from(["n-vcol", "f", "--visual-start", "3"]).is_err());
    }

    #[test]
    fn repeated_set() {
        let c = cli(&["f", "--set", "ts=4", "--set", "ve=all list"]);
        assert_eq!(c.set, vec!["ts=4".to_string(), "ve=all list".to_string()]);
    }

    // ── Running ───────────────────────────────────────────────────────────

    #[test]
    fn advance_inside_tab() {
        let out = output(&["f", "--column", "4"], "a\tb\n");
        assert_eq!(
            out,
            "line 1 byte 1 coladd 0  vcol 1 (cells 1-7)\n\
             column 4 is not reachable on line 1 (stopped at column 1)\n"
        );
    }

    #[test]
    fn force_breaks_tab() {
        let out = output(&["f", "--column", "3", "--set", "ve=all", "--force"], "a\tb\n");
        assert_eq!(
            out,
            "line 1 byte 3 coladd 0  vcol 3 (cells 3-3)\n\
             ok\n\
             changed line 1 from byte 1: \"a       b\"\n"
        );
    }

    #[test]
    fn end_of_line_with_virtualedit() {
        let out = output(&["f", "--column", "$", "--set", "ve=all"], "ab\n");
        assert_eq!(out, "line 1 byte 1 coladd 0  vcol 1 (cells 1-1)\nwant column 1\nok\n");
    }

    #[test]
    fn queries_are_printed() {
        let out = output(&["f", "--set", "ts=4 ts?"], "x\n");
        assert_eq!(out, "tabstop=4\nline 1 byte 0 coladd 0  vcol 0 (cells 0-0)\nok\n");
    }

    #[test]
    fn bad_option_is_an_error() {
        let c = cli(&["f", "--set", "bogus"]);
        let mut buf = Buffer::from_text("x");
        assert!(run(&c, &mut buf, &mut Vec::new()).is_err());
    }

    #[test]
    fn step_reports_outcome() {
        let out = output(&["f", "--line", "2", "--byte", "1", "--step", "forward"], "ab\ncd\n");
        assert_eq!(out, "line 2 byte 2 coladd 0  vcol 2 (cells 2-2)\nstep: line end\n");
    }
}
