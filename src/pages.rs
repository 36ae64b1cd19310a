use color_eyre::Result;
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::{action::Action, state::State, tui::Event, tui::EventResponse};

mod deck;

pub use deck::DeckPage;

/// A `Page` composes multiple `Component`s and exposes a lifecycle similar
/// to the `Component` trait but at the page level.
///
/// `on_enter` and `on_exit` are the mount/unmount events: a page that owns
/// form fields attaches their handles to its registry on enter and detaches
/// them on exit.
pub trait Page {
    #[allow(dead_code)]
    fn name(&self) -> &str;

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn init(&mut self, state: &State) -> Result<()> {
        let _ = state;
        Ok(())
    }

    fn handle_events(
        &mut self,
        event: Event,
        state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let _ = (event, state);
        Ok(None)
    }

    fn update(&mut self, action: Action, state: &mut State) -> Result<Option<Action>> {
        let _ = (action, state);
        Ok(None)
    }

    /// Draw the page using the provided `Frame` and `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &State) -> Result<()>;

    /// Called when the page becomes active.
    fn on_enter(&mut self, state: &mut State) -> Result<()> {
        let _ = state;
        Ok(())
    }

    /// Called when the page is leaving / being replaced.
    fn on_exit(&mut self, state: &mut State) -> Result<()> {
        let _ = state;
        Ok(())
    }
}
