//! Terminal presentation of the assistant workflow.
//!
//! `render` draws the Upload Audio, Analysis and Medical Record views from
//! the workflow state; `assistant` owns the terminal and the event loop.

pub mod assistant;
pub mod render;

pub use assistant::AssistantTui;
