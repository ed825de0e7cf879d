use std::io::Write;

use anyhow::Result;

use crate::app::{App, Message, Model, ToastLevel};
use crate::document::DEFAULT_FILE_NAME;

impl App {
    /// Run the side effects a message asks for: printing and file I/O.
    ///
    /// File failures become toasts; only write errors on `out` propagate.
    pub(super) fn handle_message_side_effects<W: Write>(
        &mut self,
        model: &mut Model,
        msg: &Message,
        out: &mut W,
    ) -> Result<()> {
        match msg {
            Message::Show => write!(out, "{}", super::view::render_screen(model))?,
            Message::Html => write!(out, "{}", crate::render::render(model.document().text()))?,
            Message::Help => writeln!(out, "{}", super::input::HELP)?,
            Message::Open(path) => match self.files.open_document(path) {
                Ok(Some(opened)) => {
                    let name = opened.identity.name().to_string();
                    model.coordinator.open(opened.content, Some(opened.identity));
                    model.show_toast(ToastLevel::Info, format!("Opened {name}"));
                }
                Ok(None) => model.show_toast(
                    ToastLevel::Warning,
                    format!("Not a markdown file: {}", path.display()),
                ),
                Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err:#}")),
            },
            Message::Save => {
                let content = model.document().text().to_string();
                let suggested = suggested_name(model);
                let result = self.files.save_document(&content, Some(&suggested));
                finish_save(model, result);
            }
            Message::SaveAs(name) => {
                let content = model.document().text().to_string();
                let suggested = name.clone().unwrap_or_else(|| suggested_name(model));
                let result = self.files.save_document_as(&content, Some(&suggested));
                finish_save(model, result);
            }
            Message::New => self.new_document(model),
            _ => {}
        }
        Ok(())
    }

    fn new_document(&mut self, model: &mut Model) {
        if model.document().is_dirty() && !model.new_confirmed {
            model.new_confirmed = true;
            model.show_toast(
                ToastLevel::Warning,
                "Unsaved changes. Run `new` again to discard them",
            );
            return;
        }
        model.new_confirmed = false;
        self.files.clear_handle();
        model.coordinator.new_document();
        model.show_toast(ToastLevel::Info, "New document");
    }
}

fn suggested_name(model: &Model) -> String {
    model
        .document()
        .name()
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

fn finish_save(model: &mut Model, result: Result<crate::document::Identity>) {
    match result {
        Ok(identity) => {
            let name = identity.name().to_string();
            model.coordinator.saved(Some(identity));
            model.show_toast(ToastLevel::Info, format!("Saved {name}"));
            if model.quit_confirmed {
                model.should_quit = true;
            }
        }
        Err(err) => {
            tracing::warn!("save failed: {err:#}");
            model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
        }
    }
}
