//! Line commands read by the interactive driver.
//!
//! Each non-empty line maps to one [`Message`]. Block and line numbers are
//! 1-based as shown by `show`; they are converted to indices here.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::app::Message;
use crate::editor::Direction;
use crate::structured::StructuredEdit;
use crate::surface::Surface;

/// Commands listed by `help`.
pub const HELP: &str = "\
focus <structured|source>   give a pane input focus
blur <structured|source>    take focus away from a pane
type <text>                 type at the source cursor
newline | backspace | delete
goto <line> <col>           move the source cursor
up | down | left | right    move the source cursor one step
scroll <n>                  scroll the source pane (negative: up)
undo | redo                 source undo history
bold <block> | italic <block>
heading <block> <0-6>       0 turns the block back into a paragraph
append <block> <text>       add text to the end of a block
paragraph <at> <text>       insert a paragraph before block <at>
delete-block <block>
view | edit | toggle        switch screens
split <percent>             move the pane divider (20-80)
resize <width> <height>
show | html                 print the screen or rendered HTML
open <path> | save | save-as [name] | new
quit";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub(super) fn parse_command(line: &str) -> Result<Option<Message>> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim_end_matches(['\r', '\n']);
    let args = rest.split_whitespace().collect::<Vec<_>>();

    let msg = match command {
        "focus" => Message::Focus(surface_arg(&args)?),
        "blur" => Message::Blur(surface_arg(&args)?),

        "type" => Message::SourceInsert(unescape(rest)),
        "newline" => Message::SourceNewline,
        "backspace" => Message::SourceDeleteBack,
        "delete" => Message::SourceDeleteForward,
        "goto" => {
            let line = one_based(&args, 0, "line")?;
            let col = one_based(&args, 1, "column").unwrap_or(0);
            Message::SourceMoveTo(line, col)
        }
        "up" => Message::SourceMoveCursor(Direction::Up),
        "down" => Message::SourceMoveCursor(Direction::Down),
        "left" => Message::SourceMoveCursor(Direction::Left),
        "right" => Message::SourceMoveCursor(Direction::Right),
        "scroll" => {
            let n: isize = number(&args, 0, "line count")?;
            if n < 0 {
                Message::SourceScrollUp(n.unsigned_abs())
            } else {
                Message::SourceScrollDown(n.unsigned_abs())
            }
        }
        "undo" => Message::SourceUndo,
        "redo" => Message::SourceRedo,

        "bold" => Message::Structured(StructuredEdit::ToggleStrong {
            block: one_based(&args, 0, "block")?,
        }),
        "italic" => Message::Structured(StructuredEdit::ToggleEmphasis {
            block: one_based(&args, 0, "block")?,
        }),
        "heading" => Message::Structured(StructuredEdit::SetHeading {
            block: one_based(&args, 0, "block")?,
            level: number(&args, 1, "level")?,
        }),
        "append" => Message::Structured(StructuredEdit::InsertText {
            block: one_based(&args, 0, "block")?,
            text: unescape(text_after(rest, 1)),
        }),
        "paragraph" => Message::Structured(StructuredEdit::InsertParagraph {
            at: one_based(&args, 0, "position")?,
            text: unescape(text_after(rest, 1)),
        }),
        "delete-block" => Message::Structured(StructuredEdit::DeleteBlock {
            block: one_based(&args, 0, "block")?,
        }),

        "view" => Message::ExitEditMode,
        "edit" => Message::EnterEditMode,
        "toggle" => Message::ToggleMode,
        "split" => Message::SetSplit(number(&args, 0, "percent")?),
        "resize" => Message::Resize(number(&args, 0, "width")?, number(&args, 1, "height")?),

        "show" => Message::Show,
        "html" => Message::Html,

        "open" => {
            if rest.trim().is_empty() {
                bail!("open needs a path");
            }
            Message::Open(PathBuf::from(rest.trim()))
        }
        "save" => Message::Save,
        "save-as" => Message::SaveAs(Some(rest.trim()).filter(|s| !s.is_empty()).map(ToOwned::to_owned)),
        "new" => Message::New,
        "help" => Message::Help,
        "quit" | "exit" => Message::Quit,

        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(Some(msg))
}

fn surface_arg(args: &[&str]) -> Result<Surface> {
    let name = args.first().context("expected a pane: structured or source")?;
    Surface::parse(name).with_context(|| format!("unknown pane `{name}`"))
}

fn number<T: std::str::FromStr>(args: &[&str], idx: usize, what: &str) -> Result<T> {
    let raw = args
        .get(idx)
        .with_context(|| format!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("invalid {what}: `{raw}`"))
}

fn one_based(args: &[&str], idx: usize, what: &str) -> Result<usize> {
    let n: usize = number(args, idx, what)?;
    if n == 0 {
        bail!("{what} numbers start at 1");
    }
    Ok(n - 1)
}

/// The raw text after the first `skip` whitespace-separated words.
fn text_after(rest: &str, skip: usize) -> &str {
    let mut tail = rest.trim_start();
    for _ in 0..skip {
        tail = tail
            .split_once(char::is_whitespace)
            .map_or("", |(_, after)| after.trim_start());
    }
    tail
}

/// Expand `\n`, `\t` and `\\` so multi-line text fits on one command line.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
