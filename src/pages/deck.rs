//! New-deck form page: the rendering layer that owns the field registry.
//!
//! The page declares the authoritative field-name list, renders one widget
//! per field, and drives the mount/unmount protocol: `on_enter` attaches
//! every widget's handle, `on_exit` detaches them. The submit handler reads
//! the registry and surfaces a missing handle as an aborted submission
//! naming the field.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, error, info};

use super::Page;
use crate::{
    action::Action,
    components::{
        fields::{SelectField, TextField},
        Component,
    },
    config::Config,
    registry::{FieldRegistry, RegistrationCallback},
    state::{InputMode, State},
    tui::{Event, EventResponse},
};

/// Sole source of truth for which fields exist, shared by the registry and
/// every rendered widget. Order is submission order.
const FIELD_NAMES: [&str; 3] = ["name", "desc", "select"];

pub struct DeckPage {
    registry: FieldRegistry,
    registrations: Vec<RegistrationCallback>,
    name_field: TextField,
    desc_field: TextField,
    color_field: SelectField,
    /// Index into `FIELD_NAMES`; `None` while no field has keyboard focus.
    focused: Option<usize>,
    result: Option<String>,
    error: Option<String>,
}

impl DeckPage {
    pub fn new(config: &Config) -> Self {
        let registry = FieldRegistry::new(FIELD_NAMES);
        let registrations = FIELD_NAMES
            .iter()
            .map(|name| registry.register_handle(*name))
            .collect();
        Self {
            registry,
            registrations,
            name_field: TextField::new("Name"),
            desc_field: TextField::new("Description"),
            color_field: SelectField::new("Color", config.form.deck_colors.clone()),
            focused: None,
            result: None,
            error: None,
        }
    }

    fn mount_fields(&mut self) {
        let handles = [
            self.name_field.handle_ref(),
            self.desc_field.handle_ref(),
            self.color_field.handle_ref(),
        ];
        for (callback, handle) in self.registrations.iter().zip(handles) {
            callback.attach(handle);
        }
        debug!("deck form fields mounted");
    }

    fn unmount_fields(&mut self) {
        for callback in &self.registrations {
            callback.detach();
        }
        debug!("deck form fields unmounted");
    }

    fn blur_all(&mut self, state: &mut State) {
        self.name_field.blur();
        self.desc_field.blur();
        self.color_field.blur();
        self.focused = None;
        state.input_mode = InputMode::Normal;
    }

    /// Move keyboard focus to the field at `idx`, going through the registry
    /// handle so focusing an unmounted field fails loudly instead of being
    /// silently skipped.
    fn focus_field(&mut self, idx: usize, state: &mut State) -> Result<()> {
        let name = FIELD_NAMES[idx];
        self.name_field.blur();
        self.desc_field.blur();
        self.color_field.blur();
        match self.registry.handle(name) {
            Some(handle) => handle.borrow_mut().focus(),
            None => return Err(eyre!("focus requested for unmounted field '{name}'")),
        }
        self.focused = Some(idx);
        state.input_mode = match name {
            "select" => InputMode::Normal,
            _ => InputMode::Insert,
        };
        Ok(())
    }

    fn focus_next(&mut self, state: &mut State) -> Result<()> {
        let next = match self.focused {
            Some(idx) => (idx + 1) % FIELD_NAMES.len(),
            None => 0,
        };
        self.focus_field(next, state)
    }

    fn focus_prev(&mut self, state: &mut State) -> Result<()> {
        let prev = match self.focused {
            Some(0) | None => FIELD_NAMES.len() - 1,
            Some(idx) => idx - 1,
        };
        self.focus_field(prev, state)
    }

    /// All-or-nothing read of the form. A field without a mounted handle
    /// aborts the submission; the error names it.
    fn submit(&mut self) -> Result<Option<Action>> {
        match self.registry.submission_payload() {
            Ok(payload) => {
                let mut map = serde_json::Map::new();
                for (name, value) in payload.iter() {
                    map.insert(name.clone(), serde_json::Value::String(value.clone()));
                }
                info!(payload = %serde_json::Value::Object(map), "deck form submitted");
                self.error = None;
                self.result = Some(format!("Submitted {} fields", payload.len()));
            }
            Err(err) => {
                error!(%err, "submission aborted");
                self.result = None;
                self.error = Some(err.to_string());
            }
        }
        Ok(Some(Action::Update))
    }

    /// Best-effort snapshot; unmounted fields read as absent, nothing fails.
    fn snapshot(&mut self) -> Result<Option<Action>> {
        let values = self.registry.values();
        let mounted = values.values().filter(|v| v.is_some()).count();
        debug!(?values, "deck form snapshot");
        self.error = None;
        self.result = Some(format!("Snapshot: {mounted}/{} fields mounted", values.len()));
        Ok(Some(Action::Update))
    }

    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        match key.code {
            KeyCode::Tab => Ok(Some(EventResponse::Stop(Action::FocusNext))),
            KeyCode::BackTab => Ok(Some(EventResponse::Stop(Action::FocusPrev))),
            KeyCode::Enter => Ok(Some(EventResponse::Stop(Action::Submit))),
            KeyCode::F(2) => Ok(Some(EventResponse::Stop(Action::Snapshot))),
            _ => Ok(None),
        }
    }
}

impl Page for DeckPage {
    fn name(&self) -> &str {
        "deck"
    }

    fn handle_events(
        &mut self,
        event: Event,
        state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        if let Some(r) = self.name_field.handle_events(event.clone(), state)? {
            return Ok(Some(r));
        }
        if let Some(r) = self.desc_field.handle_events(event.clone(), state)? {
            return Ok(Some(r));
        }
        if let Some(r) = self.color_field.handle_events(event.clone(), state)? {
            return Ok(Some(r));
        }
        match event {
            Event::Key(key) => {
                if key.code == KeyCode::Esc {
                    self.blur_all(state);
                    return Ok(Some(EventResponse::Stop(Action::Update)));
                }
                self.handle_key_event(key, state)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action, state: &mut State) -> Result<Option<Action>> {
        match action {
            Action::FocusNext => {
                self.focus_next(state)?;
                Ok(None)
            }
            Action::FocusPrev => {
                self.focus_prev(state)?;
                Ok(None)
            }
            Action::Submit => self.submit(),
            Action::Snapshot => self.snapshot(),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &State) -> Result<()> {
        let chunks = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        let title = Paragraph::new(Line::from("New deck").bold());
        frame.render_widget(title, chunks[0]);

        self.name_field.draw(frame, chunks[1], state)?;
        self.desc_field.draw(frame, chunks[2], state)?;
        self.color_field.draw(frame, chunks[3], state)?;

        if let Some(err) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::from(err.as_str()).style(Style::default().fg(Color::Red))),
                chunks[4],
            );
        } else if let Some(result) = &self.result {
            frame.render_widget(
                Paragraph::new(Line::from(result.as_str()).style(Style::default().fg(Color::Green))),
                chunks[4],
            );
        }
        Ok(())
    }

    fn on_enter(&mut self, state: &mut State) -> Result<()> {
        self.mount_fields();
        self.focus_field(0, state)
    }

    fn on_exit(&mut self, state: &mut State) -> Result<()> {
        self.blur_all(state);
        self.unmount_fields();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn page() -> DeckPage {
        DeckPage::new(&Config::default())
    }

    fn entered_page() -> (DeckPage, State) {
        let mut page = page();
        let mut state = State::default();
        page.on_enter(&mut state).unwrap();
        (page, state)
    }

    #[test]
    fn enter_mounts_every_field_and_focuses_the_first() {
        let (page, state) = entered_page();
        for name in FIELD_NAMES {
            assert!(page.registry.is_registered(name), "{name} not mounted");
        }
        assert!(page.name_field.is_focused());
        assert!(state.input_mode == InputMode::Insert);
    }

    #[test]
    fn exit_unmounts_every_field() {
        let (mut page, mut state) = entered_page();
        page.on_exit(&mut state).unwrap();
        for name in FIELD_NAMES {
            assert!(!page.registry.is_registered(name), "{name} still mounted");
        }
    }

    #[test]
    fn submit_before_enter_names_the_missing_field() {
        let mut page = page();
        let mut state = State::default();
        page.update(Action::Submit, &mut state).unwrap();
        let error = page.error.expect("submission must abort");
        assert!(error.contains("name"), "error should name the field: {error}");
        assert!(page.result.is_none());
    }

    #[test]
    fn snapshot_never_fails_on_unmounted_fields() {
        let mut page = page();
        let mut state = State::default();
        page.update(Action::Snapshot, &mut state).unwrap();
        assert_eq!(page.result.as_deref(), Some("Snapshot: 0/3 fields mounted"));
        assert!(page.error.is_none());
    }

    #[test]
    fn typed_values_reach_the_submission_payload() {
        let (mut page, mut state) = entered_page();
        for c in "Fire".chars() {
            page.handle_events(key(KeyCode::Char(c)), &mut state).unwrap();
        }

        assert_eq!(page.registry.value("name").unwrap(), "Fire");
        assert_eq!(page.registry.value("select").unwrap(), "rouge");

        page.update(Action::Submit, &mut state).unwrap();
        assert_eq!(page.result.as_deref(), Some("Submitted 3 fields"));
        assert!(page.error.is_none());
    }

    #[test]
    fn tab_moves_focus_through_the_registry() {
        let (mut page, mut state) = entered_page();
        page.update(Action::FocusNext, &mut state).unwrap();
        assert!(page.desc_field.is_focused());
        assert!(!page.name_field.is_focused());

        page.update(Action::FocusNext, &mut state).unwrap();
        assert!(page.color_field.is_focused());
        assert!(state.input_mode == InputMode::Normal);
    }

    #[test]
    fn focus_on_an_unmounted_field_fails_loudly() {
        let mut page = page();
        let mut state = State::default();
        // No on_enter: nothing is mounted yet.
        assert!(page.focus_field(0, &mut state).is_err());
    }
}
