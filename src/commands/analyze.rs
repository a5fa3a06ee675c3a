//! Analyze an audio file without the interactive UI.
//!
//! Runs the same select and submit workflow as the assistant UI and writes
//! the raw JSON result to stdout or a file.

use anyhow::anyhow;
use std::path::PathBuf;

use crate::workflow::{Phase, Workflow};

/// Selects `file`, submits it, and prints the pretty-printed result.
///
/// # Arguments
/// * `file` - Path to the case recording
/// * `output_file` - Optional file to write the result to instead of stdout
///
/// # Errors
/// - If the file is missing or not audio
/// - If the configuration or API key cannot be loaded
/// - If the analysis request fails
pub async fn handle_analyze(file: PathBuf, output_file: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== rheumassist Analyze Command ===");

    let controller = super::load_controller()?;
    let mut workflow = Workflow::new();

    workflow.select_path(&file)?;
    controller.submit(&mut workflow).await?;

    if workflow.phase() == Phase::Failed {
        let error = workflow.error().unwrap_or("Analysis failed");
        return Err(anyhow!("{error}"));
    }
    let analysis = workflow
        .analysis()
        .ok_or_else(|| anyhow!("No analysis result was received"))?;
    let rendered = serde_json::to_string_pretty(&analysis.result)?;

    // Determine output destination: file > stdout (default)
    if let Some(file_path) = output_file {
        std::fs::write(&file_path, format!("{rendered}\n"))
            .map_err(|e| anyhow!("Failed to write to file '{file_path}': {e}"))?;
        tracing::debug!("Analysis written to file: {file_path}");
    } else {
        println!("{rendered}");
    }

    Ok(())
}
