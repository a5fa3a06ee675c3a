//! rheumassist: terminal rheumatology assistant.

mod app;
mod commands;
mod config;
mod inference;
mod logging;
mod setup;
mod ui;
mod workflow;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
