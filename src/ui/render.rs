//! Rendering of the three assistant views.
//!
//! Everything here is a pure function of the workflow state and the text
//! typed into the path field; no state is changed while drawing.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Tabs, Wrap},
};
use serde_json::Value;
use tui_input::Input;

use crate::workflow::{Step, Workflow};

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const ACCENT: Color = Color::Rgb(139, 92, 246);
const ERROR_FG: Color = Color::Rgb(248, 113, 113);
const MUTED_FG: Color = Color::Rgb(100, 100, 100);

/// Busy indicator frames, advanced once per drawn frame.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Shown above the result once an analysis has been received.
pub const ANALYSIS_ACKNOWLEDGMENT: &str = "Analysis completed. Results are here.";

/// Shown on the medical record view, which has no content yet.
pub const MEDICAL_RECORD_PLACEHOLDER: &str = "Medical record drafting is not available yet.";

/// Contents of the path field on the upload view.
pub struct PathField<'a> {
    pub input: &'a Input,
}

/// Everything a frame needs.
pub struct View<'a> {
    pub workflow: &'a Workflow,
    pub path: PathField<'a>,
    pub tick: usize,
}

/// Renders the whole screen for `view`.
pub fn draw(frame: &mut Frame, view: &View) {
    let area = frame.area();

    let padding_block = Block::default()
        .padding(Padding::uniform(1))
        .style(Style::default().bg(BG));
    frame.render_widget(&padding_block, area);
    let inner_area = padding_block.inner(area);

    let [header_area, tabs_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner_area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Rheumatology Assistant",
            Style::default().fg(FG).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", view.workflow.phase().label()),
            Style::default().fg(MUTED_FG),
        ),
    ]));
    frame.render_widget(header, header_area);

    let step = view.workflow.step();
    let tabs = Tabs::new(Step::ALL.iter().map(|s| s.title()))
        .select(step.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(MUTED_FG))
        .highlight_style(Style::default().fg(FG).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, tabs_area);

    match step {
        Step::Upload => draw_upload(frame, content_area, view),
        Step::Analysis => draw_analysis(frame, content_area, view.workflow),
        Step::MedicalRecord => draw_medical_record(frame, content_area),
    }

    let help_text = match step {
        Step::Upload => "↵ select file, ctrl-a analyze, tab/F1-F3 switch view, esc quit",
        _ => "tab/1-3 switch view, q/esc quit",
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(MUTED_FG));
    frame.render_widget(help, footer_area);
}

fn draw_upload(frame: &mut Frame, area: Rect, view: &View) {
    let workflow = view.workflow;
    let error_height = if workflow.error().is_some() { 4 } else { 0 };
    let button_height = if workflow.selected_file().is_some() { 3 } else { 0 };

    let [input_area, summary_area, error_area, button_area, _] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(error_height),
        Constraint::Length(button_height),
        Constraint::Min(0),
    ])
    .areas(area);

    let input_block = Block::default()
        .title(" Audio file ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    frame.render_widget(&input_block, input_area);
    let input_inner = input_block.inner(input_area);
    // Keep one column free so the cursor can sit after the last character
    let input = view.path.input;
    let scroll = input.visual_scroll(input_inner.width.saturating_sub(1) as usize);
    frame.render_widget(
        Paragraph::new(input.value())
            .scroll((0, scroll as u16))
            .style(Style::default().fg(FG)),
        input_inner,
    );
    let cursor_x = input_inner.x + (input.visual_cursor().saturating_sub(scroll)) as u16;
    frame.set_cursor_position(Position::new(cursor_x, input_inner.y));

    let summary = match workflow.selected_file() {
        Some(file) => Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(MUTED_FG)),
            Span::styled(file.name().to_string(), Style::default().fg(FG)),
            Span::styled(
                format!(" ({}, {})", file.media_type(), file.size_label()),
                Style::default().fg(MUTED_FG),
            ),
        ]),
        None => Line::styled(
            "No file selected. Type a path to an audio file and press Enter.",
            Style::default().fg(MUTED_FG),
        ),
    };
    frame.render_widget(Paragraph::new(summary), summary_area);

    if let Some(error) = workflow.error() {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(ERROR_FG)),
            Span::styled(error.to_string(), Style::default().fg(ERROR_FG)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ERROR_FG)),
        );
        frame.render_widget(banner, error_area);
    }

    if workflow.selected_file().is_some() {
        let (label, style) = if workflow.is_processing() {
            let frame_symbol = SPINNER_FRAMES[view.tick % SPINNER_FRAMES.len()];
            (
                format!("{frame_symbol} Processing..."),
                Style::default().fg(MUTED_FG),
            )
        } else {
            (
                "Analyze Case".to_string(),
                Style::default().fg(FG).bg(ACCENT).add_modifier(Modifier::BOLD),
            )
        };
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, button_area);
    }
}

fn draw_analysis(frame: &mut Frame, area: Rect, workflow: &Workflow) {
    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));

    let Some(analysis) = workflow.analysis() else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::styled(
            ANALYSIS_ACKNOWLEDGMENT,
            Style::default().fg(FG).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("Received at {}", analysis.received_at.format("%Y-%m-%d %H:%M:%S")),
            Style::default().fg(MUTED_FG),
        ),
        Line::default(),
    ];
    lines.extend(
        result_text(&analysis.result)
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(FG))),
    );

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_medical_record(frame: &mut Frame, area: Rect) {
    let placeholder = Paragraph::new(MEDICAL_RECORD_PLACEHOLDER)
        .style(Style::default().fg(MUTED_FG))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Medical Record ")
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(placeholder, area);
}

/// Text to show for an opaque inference result.
///
/// Hosted text-generation models usually answer `[{"generated_text": ...}]`;
/// that text is shown as is. Anything else is pretty-printed JSON.
pub fn result_text(result: &Value) -> String {
    let generated = match result {
        Value::Array(items) => items.first().and_then(|item| item.get("generated_text")),
        Value::Object(_) => result.get("generated_text"),
        _ => None,
    };

    match generated.and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string()),
    }
}
