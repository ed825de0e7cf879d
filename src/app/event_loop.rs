use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::app::{App, Message, Model, update};
use crate::document::Document;

/// How long the driver waits for the structured engine after mounting it.
const INIT_WAIT: Duration = Duration::from_secs(2);

impl App {
    /// Run the line-command loop on stdin/stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial file cannot be loaded or the
    /// terminal streams fail.
    pub fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the line-command loop over arbitrary streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial file cannot be loaded, or reading
    /// `input` or writing `out` fails.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        let mut model = self.initial_model()?;
        if self.start_in_edit {
            model = self.dispatch(model, Message::EnterEditMode, &mut out)?;
        }
        writeln!(out, "{}", model.status_line())?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            model.coordinator.poll();

            let msg = match super::input::parse_command(&line) {
                Ok(Some(msg)) => msg,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };
            tracing::trace!(?msg, "command");
            model = self.dispatch(model, msg, &mut out)?;
            if model.should_quit {
                break;
            }
        }

        model.coordinator.unmount_structured();
        model.coordinator.unmount_source();
        out.flush()?;
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, model: Model, msg: Message, out: &mut W) -> Result<Model> {
        let mounts_structured = matches!(msg, Message::EnterEditMode | Message::ToggleMode);
        let mut model = update(model, msg.clone());
        self.handle_message_side_effects(&mut model, &msg, out)?;
        if mounts_structured {
            model.coordinator.settle(INIT_WAIT);
        }
        if let Some((message, level)) = model.take_toast() {
            writeln!(out, "{level}: {message}")?;
        }
        Ok(model)
    }

    fn initial_model(&mut self) -> Result<Model> {
        let mut model = Model::new(Document::welcome(), self.size);
        model.set_split(self.split);
        if let Some(path) = self.file_path.clone() {
            let Some(opened) = self.files.open_document(&path)? else {
                bail!("Not a markdown file: {}", path.display());
            };
            model.coordinator.open(opened.content, Some(opened.identity));
        }
        Ok(model)
    }
}
