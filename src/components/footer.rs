use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Component;
use crate::state::{InputMode, State};

/// Bottom hint bar. Key hints follow the active input mode.
pub struct FooterComponent;

impl FooterComponent {
    pub fn new() -> Self {
        Self
    }

    fn hints(state: &State) -> Line<'static> {
        let mut spans = vec![
            Span::styled("Tab", Style::default().fg(Color::White)),
            Span::raw(": Next field   "),
            Span::styled("Shift-Tab", Style::default().fg(Color::White)),
            Span::raw(": Previous   "),
            Span::styled("Enter", Style::default().fg(Color::White)),
            Span::raw(": Submit   "),
            Span::styled("F2", Style::default().fg(Color::White)),
            Span::raw(": Snapshot   "),
        ];
        match state.input_mode {
            InputMode::Insert => {
                spans.push(Span::styled("Esc", Style::default().fg(Color::White)));
                spans.push(Span::raw(": Leave field   "));
            }
            InputMode::Normal => {
                spans.push(Span::styled("Ctrl-C", Style::default().fg(Color::White)));
                spans.push(Span::raw(": Quit"));
            }
        }
        Line::from(spans).fg(Color::DarkGray)
    }
}

impl Default for FooterComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FooterComponent {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &State) -> Result<()> {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(Self::hints(state)), inner);
        Ok(())
    }
}
