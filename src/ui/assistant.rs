//! Interactive terminal UI for the assistant workflow.
//!
//! Owns the terminal and the typed path; all workflow state lives in
//! [`Workflow`]. The analysis request runs on a spawned task so the busy
//! indicator keeps animating while it is in flight.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use serde_json::Value;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::task::JoinHandle;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::render::{self, PathField, View};
use crate::inference::InferenceError;
use crate::workflow::input::expand_path;
use crate::workflow::{Step, SubmissionController, Workflow};

/// What a key press asks the UI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NextView,
    PreviousView,
    ShowView(Step),
    SelectTypedPath,
    Submit,
    EditPath,
    Ignore,
}

/// Maps a key press to an action given the active view.
///
/// On the upload view printable keys edit the path, so digit and `q`
/// shortcuts only apply to the other views.
pub fn action_for_key(key: KeyEvent, step: Step) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Tab => KeyAction::NextView,
        KeyCode::BackTab => KeyAction::PreviousView,
        KeyCode::F(n @ 1..=3) => Step::from_index(n as usize - 1)
            .map(KeyAction::ShowView)
            .unwrap_or(KeyAction::Ignore),
        KeyCode::Char('a') if ctrl && step == Step::Upload => KeyAction::Submit,
        KeyCode::F(5) if step == Step::Upload => KeyAction::Submit,
        KeyCode::Enter if step == Step::Upload => KeyAction::SelectTypedPath,
        _ if step == Step::Upload && !ctrl => KeyAction::EditPath,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char(c @ '1'..='3') => Step::from_index(c as usize - '1' as usize)
            .map(KeyAction::ShowView)
            .unwrap_or(KeyAction::Ignore),
        _ => KeyAction::Ignore,
    }
}

/// Full-screen assistant with Upload, Analysis and Medical Record views.
pub struct AssistantTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: Input,
    tick: usize,
    cleaned_up: bool,
}

impl AssistantTui {
    /// Creates a new TUI and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the terminal cannot be initialized
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            input: Input::default(),
            tick: 0,
            cleaned_up: false,
        })
    }

    /// Prefills the path field, e.g. with a file given on the command line.
    pub fn with_path(mut self, path: &str) -> Self {
        self.input = Input::new(path.to_string());
        self
    }

    /// Runs the event loop until the user quits.
    ///
    /// # Errors
    /// - If drawing or reading terminal events fails
    pub async fn run(
        &mut self,
        workflow: &mut Workflow,
        controller: &SubmissionController,
    ) -> Result<()> {
        tracing::debug!("Assistant UI started");
        let mut pending: Option<JoinHandle<Result<Value, InferenceError>>> = None;

        loop {
            if pending.as_ref().is_some_and(|handle| handle.is_finished()) {
                if let Some(handle) = pending.take() {
                    let outcome = handle
                        .await
                        .unwrap_or_else(|e| Err(InferenceError::Task(e.to_string())));
                    controller.settle(workflow, outcome);
                }
            }

            self.draw(workflow)?;
            self.tick = self.tick.wrapping_add(1);

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match action_for_key(key, workflow.step()) {
                KeyAction::Quit => {
                    tracing::debug!("Assistant UI exited via Escape/q");
                    break;
                }
                KeyAction::NextView => workflow.set_step(workflow.step().next()),
                KeyAction::PreviousView => workflow.set_step(workflow.step().previous()),
                KeyAction::ShowView(step) => workflow.set_step(step),
                KeyAction::SelectTypedPath => self.select_typed_path(workflow),
                KeyAction::Submit => match controller.begin(workflow) {
                    Ok(request) => pending = Some(controller.dispatch(request)),
                    Err(e) => tracing::debug!("Submission not started: {e}"),
                },
                KeyAction::EditPath => {
                    self.input.handle_event(&Event::Key(key));
                }
                KeyAction::Ignore => {}
            }
        }

        if pending.is_some() {
            tracing::warn!("Exiting while an analysis is still in flight; its result is discarded");
        }

        self.cleanup()
    }

    /// Selects the file named in the path field.
    fn select_typed_path(&mut self, workflow: &mut Workflow) {
        let raw = self.input.value().trim();
        if raw.is_empty() {
            return;
        }
        let path = expand_path(raw);
        // Rejections are recorded on the workflow and shown in the banner
        workflow.select_path(&path).ok();
    }

    fn draw(&mut self, workflow: &Workflow) -> Result<()> {
        let view = View {
            workflow,
            path: PathField { input: &self.input },
            tick: self.tick,
        };

        self.terminal.draw(|frame| render::draw(frame, &view))?;

        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("Assistant UI terminal cleanup complete");
        Ok(())
    }
}

impl Drop for AssistantTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_on_upload_edits_path() {
        assert_eq!(action_for_key(key(KeyCode::Char('q')), Step::Upload), KeyAction::EditPath);
        assert_eq!(action_for_key(key(KeyCode::Char('2')), Step::Upload), KeyAction::EditPath);
        assert_eq!(action_for_key(key(KeyCode::Backspace), Step::Upload), KeyAction::EditPath);
        assert_eq!(
            action_for_key(key(KeyCode::Enter), Step::Upload),
            KeyAction::SelectTypedPath
        );
    }

    #[test]
    fn test_submit_only_from_upload() {
        assert_eq!(action_for_key(ctrl('a'), Step::Upload), KeyAction::Submit);
        assert_eq!(action_for_key(key(KeyCode::F(5)), Step::Upload), KeyAction::Submit);
        assert_eq!(action_for_key(ctrl('a'), Step::Analysis), KeyAction::Ignore);
        assert_eq!(action_for_key(key(KeyCode::Enter), Step::Analysis), KeyAction::Ignore);
    }

    #[test]
    fn test_view_switching() {
        assert_eq!(action_for_key(key(KeyCode::Tab), Step::Upload), KeyAction::NextView);
        assert_eq!(
            action_for_key(key(KeyCode::BackTab), Step::Analysis),
            KeyAction::PreviousView
        );
        assert_eq!(
            action_for_key(key(KeyCode::F(2)), Step::Upload),
            KeyAction::ShowView(Step::Analysis)
        );
        assert_eq!(
            action_for_key(key(KeyCode::Char('3')), Step::Analysis),
            KeyAction::ShowView(Step::MedicalRecord)
        );
        assert_eq!(
            action_for_key(key(KeyCode::Char('1')), Step::MedicalRecord),
            KeyAction::ShowView(Step::Upload)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for_key(key(KeyCode::Esc), Step::Upload), KeyAction::Quit);
        assert_eq!(action_for_key(ctrl('c'), Step::Upload), KeyAction::Quit);
        assert_eq!(action_for_key(key(KeyCode::Char('q')), Step::Analysis), KeyAction::Quit);
    }
}
