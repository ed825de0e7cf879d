//! Text rendering of the current screen for the line driver.

use std::fmt::Write;

use crate::app::{Mode, Model};
use crate::structured::BlockKind;
use crate::surface::{InitStatus, Surface};

/// Render what the user would see: the status line followed by either the
/// rendered document (view mode) or both panes (edit mode).
pub fn render_screen(model: &Model) -> String {
    let mut out = model.status_line();
    out.push('\n');
    match model.mode {
        Mode::View => out.push_str(&crate::render::render(model.document().text())),
        Mode::Edit => {
            render_structured_pane(model, &mut out);
            render_source_pane(model, &mut out);
        }
    }
    out
}

fn pane_header(model: &Model, surface: Surface, out: &mut String) {
    let active = if model.coordinator.mastership().is(surface) {
        " (active)"
    } else {
        ""
    };
    let _ = writeln!(out, "== {surface}{active} ==");
}

fn render_structured_pane(model: &Model, out: &mut String) {
    pane_header(model, Surface::Structured, out);
    let Some(adapter) = model.coordinator.structured() else {
        out.push_str("(not mounted)\n");
        return;
    };
    match adapter.status() {
        InitStatus::Pending => out.push_str("(loading)\n"),
        InitStatus::Failed => out.push_str("(unavailable)\n"),
        InitStatus::Ready => {
            for (idx, kind) in adapter.blocks().unwrap_or_default().iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", idx + 1, block_label(*kind));
            }
        }
    }
}

fn render_source_pane(model: &Model, out: &mut String) {
    pane_header(model, Surface::Source, out);
    let Some(source) = model.coordinator.source() else {
        out.push_str("(not mounted)\n");
        return;
    };
    let buffer = source.buffer();
    let viewport = source.viewport();
    let left = viewport.left();
    let width = usize::from(viewport.width());
    for line in viewport.visible_range() {
        let text = buffer.line_at(line).unwrap_or_default();
        let visible = text
            .chars()
            .skip(left)
            .take(width)
            .collect::<String>();
        let _ = writeln!(out, "{:>4} | {visible}", line + 1);
    }
    let cursor = source.cursor();
    let _ = writeln!(
        out,
        "cursor {}:{}  top {}",
        cursor.line + 1,
        cursor.col + 1,
        viewport.offset() + 1
    );
}

fn block_label(kind: BlockKind) -> String {
    match kind {
        BlockKind::Heading(level) => format!("heading {level}"),
        BlockKind::Paragraph => "paragraph".to_string(),
        BlockKind::List => "list".to_string(),
        BlockKind::CodeBlock => "code block".to_string(),
        BlockKind::BlockQuote => "quote".to_string(),
        BlockKind::Table => "table".to_string(),
        BlockKind::ThematicBreak => "rule".to_string(),
        BlockKind::Html => "html".to_string(),
        BlockKind::Other => "block".to_string(),
    }
}
