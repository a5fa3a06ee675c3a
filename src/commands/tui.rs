//! Interactive assistant command.

use std::path::PathBuf;

use crate::ui::AssistantTui;
use crate::workflow::Workflow;

/// Opens the assistant UI, optionally with `file` already selected.
///
/// # Errors
/// - If the configuration or API key cannot be loaded
/// - If the terminal cannot be set up or drawn
pub async fn handle_tui(file: Option<PathBuf>) -> Result<(), anyhow::Error> {
    tracing::info!("=== rheumassist Assistant ===");

    let controller = super::load_controller()?;
    let mut workflow = Workflow::new();

    let mut tui = AssistantTui::new()?;
    if let Some(path) = file {
        // A rejected path still opens the UI, with the error banner showing
        workflow.select_path(&path).ok();
        tui = tui.with_path(&path.display().to_string());
    }

    tui.run(&mut workflow, &controller).await?;

    tracing::info!("=== rheumassist Assistant Exited ===");
    Ok(())
}
