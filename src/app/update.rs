use std::path::PathBuf;

use crate::app::{Mode, Model, ToastLevel};
use crate::editor::Direction;
use crate::error::SyncError;
use crate::structured::StructuredEdit;
use crate::surface::{Surface, SurfaceChange};
use crate::sync::Routing;

/// All possible events and actions in the application.
///
/// These represent user input and the file actions that need side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Focus
    /// A surface gained input focus
    Focus(Surface),
    /// A surface lost input focus
    Blur(Surface),

    // Source pane
    /// Type text at the source cursor
    SourceInsert(String),
    /// Split line at the source cursor (Enter)
    SourceNewline,
    /// Delete before the source cursor (Backspace)
    SourceDeleteBack,
    /// Delete at the source cursor (Delete)
    SourceDeleteForward,
    /// Move the source cursor in a direction
    SourceMoveCursor(Direction),
    /// Move the source cursor to (line, col), zero-based
    SourceMoveTo(usize, usize),
    /// Scroll the source viewport up by n lines
    SourceScrollUp(usize),
    /// Scroll the source viewport down by n lines
    SourceScrollDown(usize),
    /// Undo the last source edit
    SourceUndo,
    /// Redo the last undone source edit
    SourceRedo,

    // Structured pane
    /// Apply a structural edit in the structured pane
    Structured(StructuredEdit),

    // Mode and layout
    /// Enter edit mode (mount both surfaces)
    EnterEditMode,
    /// Exit edit mode (return to view mode)
    ExitEditMode,
    /// Switch between view and edit mode
    ToggleMode,
    /// Move the pane divider to a percentage
    SetSplit(u8),
    /// Terminal resized
    Resize(u16, u16),

    // Output (handled in effects)
    /// Print the current screen
    Show,
    /// Print the rendered HTML
    Html,
    /// Print the command list
    Help,

    // Files (handled in effects)
    /// Open a markdown file
    Open(PathBuf),
    /// Save to the current file, or save-as when there is none
    Save,
    /// Save under a new name
    SaveAs(Option<String>),
    /// Start an empty document
    New,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// File I/O and printing happen in the side-effect pass, never here.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset confirmation flags on any action other than the confirmed one.
    // Save preserves the quit flag so a save can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save | Message::SaveAs(_)) {
        model.quit_confirmed = false;
    }
    if !matches!(msg, Message::New) {
        model.new_confirmed = false;
    }

    match msg {
        // Focus
        Message::Focus(surface) => {
            if model.mode == Mode::Edit {
                model.coordinator.on_focus_gained(surface);
            }
        }
        Message::Blur(surface) => model.coordinator.on_blur(surface),

        // Source edits: the adapter reports a change, the coordinator routes it
        Message::SourceInsert(text) => source_edit(&mut model, |s| s.insert(&text)),
        Message::SourceNewline => source_edit(&mut model, |s| Some(s.newline())),
        Message::SourceDeleteBack => source_edit(&mut model, |s| s.backspace()),
        Message::SourceDeleteForward => source_edit(&mut model, |s| s.delete()),
        Message::SourceUndo => source_edit(&mut model, |s| s.undo()),
        Message::SourceRedo => source_edit(&mut model, |s| s.redo()),

        // Source navigation
        Message::SourceMoveCursor(direction) => {
            model.coordinator.with_source(|s| s.move_cursor(direction));
        }
        Message::SourceMoveTo(line, col) => {
            model.coordinator.with_source(|s| s.move_to(line, col));
        }
        Message::SourceScrollUp(n) => {
            model.coordinator.with_source(|s| s.scroll_up(n));
        }
        Message::SourceScrollDown(n) => {
            model.coordinator.with_source(|s| s.scroll_down(n));
        }

        Message::Structured(edit) => match structured_edit(&mut model, &edit) {
            Ok(routing) => log_routing(Surface::Structured, routing),
            Err(err @ (SyncError::NotReady | SyncError::NotMounted(_))) => {
                model.show_toast(ToastLevel::Warning, err.to_string());
            }
            Err(err) => {
                tracing::debug!(?edit, "structured edit rejected: {err}");
                model.show_toast(ToastLevel::Error, err.to_string());
            }
        },

        // Mode and layout
        Message::EnterEditMode => model.enter_edit_mode(),
        Message::ExitEditMode => model.exit_edit_mode(),
        Message::ToggleMode => match model.mode {
            Mode::View => model.enter_edit_mode(),
            Mode::Edit => model.exit_edit_mode(),
        },
        Message::SetSplit(percent) => model.set_split(percent),
        Message::Resize(width, height) => model.resize(width, height),

        Message::Quit => {
            if model.document().is_dirty() && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes. Run `quit` again to discard them",
                );
            } else {
                model.should_quit = true;
            }
        }

        // Output and file actions: handled in effects
        Message::Show
        | Message::Html
        | Message::Help
        | Message::Open(_)
        | Message::Save
        | Message::SaveAs(_)
        | Message::New => {}
    }

    model
}

// Typing into a pane focuses it first, as clicking into it would.
fn source_edit<F>(model: &mut Model, edit: F)
where
    F: FnOnce(&mut crate::surface::SourceAdapter) -> Option<SurfaceChange>,
{
    if model.mode != Mode::Edit {
        return;
    }
    model.coordinator.on_focus_gained(Surface::Source);
    if let Some(routing) = model.coordinator.edit_source(edit) {
        log_routing(Surface::Source, routing);
    }
}

fn structured_edit(model: &mut Model, edit: &StructuredEdit) -> Result<Routing, SyncError> {
    if model.mode == Mode::Edit {
        model.coordinator.on_focus_gained(Surface::Structured);
    }
    model.coordinator.edit_structured(edit)
}

fn log_routing(surface: Surface, routing: Routing) {
    tracing::trace!(%surface, ?routing, "pane edit routed");
}
