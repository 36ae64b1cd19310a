//! Input widgets for form pages.
//!
//! Each widget splits into a component (rendering + key routing, owned by
//! the page) and a shared state cell implementing
//! [`FieldHandle`](crate::registry::FieldHandle). The page registers the
//! state cell with its field registry on mount; the widget keeps editing the
//! same cell, so registry reads always see the live value.

use std::cell::RefCell;
use std::rc::Rc;

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler as _, Input};

use super::Component;
use crate::{
    action::Action,
    registry::{FieldHandle, HandleRef},
    state::State,
    tui::EventResponse,
};

/// Shared state of a single-line text field.
pub struct TextFieldState {
    input: Input,
    focused: bool,
}

impl TextFieldState {
    fn new() -> Self {
        Self {
            input: Input::default(),
            focused: false,
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl FieldHandle for TextFieldState {
    fn value(&self) -> String {
        self.input.value().to_string()
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

/// Single-line text input with a label, backed by `tui-input`.
pub struct TextField {
    label: String,
    state: Rc<RefCell<TextFieldState>>,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Rc::new(RefCell::new(TextFieldState::new())),
        }
    }

    /// The shared state cell, coerced for registration with a field registry.
    pub fn handle_ref(&self) -> HandleRef {
        self.state.clone()
    }

    pub fn state(&self) -> Rc<RefCell<TextFieldState>> {
        self.state.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.state.borrow().focused()
    }

    pub fn blur(&self) {
        self.state.borrow_mut().blur();
    }
}

impl Component for TextField {
    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let mut st = self.state.borrow_mut();
        if !st.focused {
            return Ok(None);
        }
        match key.code {
            // Navigation and page-level keys bubble up to the page.
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter | KeyCode::Esc | KeyCode::F(_) => {
                Ok(None)
            }
            _ => {
                st.input.handle_event(&CrosstermEvent::Key(key));
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, _state: &State) -> Result<()> {
        let st = self.state.borrow();
        let focused = st.focused;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.label.as_str())
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return Ok(());
        }

        let width = inner.width as usize;
        let scroll = st.input.visual_scroll(width);
        let value = Paragraph::new(st.input.value()).scroll((0, scroll as u16));
        f.render_widget(value, inner);

        if focused {
            let cursor_col = (st.input.visual_cursor().saturating_sub(scroll) as u16)
                .min(inner.width.saturating_sub(1));
            f.set_cursor_position((inner.x + cursor_col, inner.y));
        }
        Ok(())
    }
}

/// Shared state of a select field (a one-line radio group).
pub struct SelectFieldState {
    options: Vec<String>,
    selected: usize,
    focused: bool,
}

impl SelectFieldState {
    fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: 0,
            focused: false,
        }
    }

    pub fn cycle(&mut self, dir: i32) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as i32;
        self.selected = (self.selected as i32 + dir).rem_euclid(len) as usize;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl FieldHandle for SelectFieldState {
    fn value(&self) -> String {
        self.options.get(self.selected).cloned().unwrap_or_default()
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

/// Radio-group style select cycling a fixed option list with Left/Right.
pub struct SelectField {
    label: String,
    state: Rc<RefCell<SelectFieldState>>,
}

impl SelectField {
    pub fn new(label: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            label: label.into(),
            state: Rc::new(RefCell::new(SelectFieldState::new(options))),
        }
    }

    /// The shared state cell, coerced for registration with a field registry.
    pub fn handle_ref(&self) -> HandleRef {
        self.state.clone()
    }

    pub fn state(&self) -> Rc<RefCell<SelectFieldState>> {
        self.state.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.state.borrow().focused()
    }

    pub fn blur(&self) {
        self.state.borrow_mut().blur();
    }
}

impl Component for SelectField {
    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let mut st = self.state.borrow_mut();
        if !st.focused {
            return Ok(None);
        }
        match key.code {
            KeyCode::Left => {
                st.cycle(-1);
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                st.cycle(1);
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, _state: &State) -> Result<()> {
        let st = self.state.borrow();
        let focused = st.focused;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.label.as_str())
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return Ok(());
        }

        let mut spans: Vec<Span> = Vec::new();
        for (idx, option) in st.options.iter().enumerate() {
            let marker = if idx == st.selected { "(•) " } else { "( ) " };
            let style = if idx == st.selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!("{marker}{option}"), style));
            spans.push(Span::raw("   "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), inner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn type_into(field: &mut TextField, text: &str) {
        let mut state = State::default();
        for c in text.chars() {
            field.handle_key_events(key(c), &mut state).unwrap();
        }
    }

    #[test]
    fn text_field_value_tracks_typed_input() {
        let mut field = TextField::new("Name");
        field.state().borrow_mut().focus();
        type_into(&mut field, "Fire");

        let handle: HandleRef = field.handle_ref();
        assert_eq!(handle.borrow().value(), "Fire");
    }

    #[test]
    fn unfocused_text_field_ignores_keys() {
        let mut field = TextField::new("Name");
        type_into(&mut field, "Fire");
        assert_eq!(field.handle_ref().borrow().value(), "");
    }

    #[test]
    fn focus_and_blur_toggle_the_flag() {
        let field = TextField::new("Name");
        assert!(!field.is_focused());
        field.handle_ref().borrow_mut().focus();
        assert!(field.is_focused());
        field.blur();
        assert!(!field.is_focused());
    }

    #[test]
    fn select_field_cycles_and_wraps() {
        let field = SelectField::new(
            "Color",
            vec!["rouge".into(), "azur".into(), "vert".into()],
        );
        let state = field.state();
        assert_eq!(field.handle_ref().borrow().value(), "rouge");

        state.borrow_mut().cycle(1);
        assert_eq!(field.handle_ref().borrow().value(), "azur");

        state.borrow_mut().cycle(-2);
        assert_eq!(field.handle_ref().borrow().value(), "vert");
    }

    #[test]
    fn select_field_left_right_require_focus() {
        let mut field = SelectField::new("Color", vec!["rouge".into(), "azur".into()]);
        let mut state = State::default();

        let response = field
            .handle_key_events(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), &mut state)
            .unwrap();
        assert!(response.is_none());
        assert_eq!(field.state().borrow().selected(), 0);

        field.state().borrow_mut().focus();
        field
            .handle_key_events(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), &mut state)
            .unwrap();
        assert_eq!(field.state().borrow().selected(), 1);
    }
}
