use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    prelude::Rect,
    Frame,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    action::Action,
    components::{footer::FooterComponent, Component},
    config::Config,
    pages::{DeckPage, Page},
    state::{InputMode, State},
    tui::{Event, EventResponse, Tui},
};

pub struct App {
    pub pages: Vec<Box<dyn Page>>,
    pub active_page: usize,
    pub footer: FooterComponent,
    pub should_quit: bool,
    pub should_suspend: bool,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub state: State,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;
        let state = State::new()?;
        let deck = DeckPage::new(&config);

        Ok(Self {
            pages: vec![Box::new(deck)],
            active_page: 0,
            footer: FooterComponent::new(),
            should_quit: false,
            should_suspend: false,
            tick_rate,
            frame_rate,
            state,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
            page.init(&self.state)?;
        }
        self.footer.init(&self.state)?;

        // The active page mounts its fields here; accessors called from
        // later events always run after registration.
        if let Some(page) = self.pages.get_mut(self.active_page) {
            page.on_enter(&mut self.state)?;
        }

        loop {
            if let Some(e) = tui.next().await {
                let stop_event_propagation = self
                    .pages
                    .get_mut(self.active_page)
                    .and_then(|page| page.handle_events(e.clone(), &mut self.state).ok())
                    .map(|response| match response {
                        Some(EventResponse::Continue(action)) => {
                            action_tx.send(action).ok();
                            false
                        }
                        Some(EventResponse::Stop(action)) => {
                            action_tx.send(action).ok();
                            true
                        }
                        _ => false,
                    })
                    .unwrap_or(false);

                if !stop_event_propagation {
                    match e {
                        Event::Quit if self.state.input_mode == InputMode::Normal => {
                            action_tx.send(Action::Quit)?
                        }
                        Event::Tick => action_tx.send(Action::Tick)?,
                        Event::Render => action_tx.send(Action::Render)?,
                        Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                        Event::Key(key)
                            if key.code == KeyCode::Char('z')
                                && key.modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            action_tx.send(Action::Suspend)?
                        }
                        _ => {}
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match action {
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Error(ref msg) => tracing::error!("{msg}"),
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        tui.draw(|f| {
                            self.render(f).unwrap_or_else(|err| {
                                action_tx
                                    .send(Action::Error(format!("Failed to draw: {:?}", err)))
                                    .unwrap();
                            })
                        })?;
                    }
                    Action::Render => {
                        tui.draw(|f| {
                            self.render(f).unwrap_or_else(|err| {
                                action_tx
                                    .send(Action::Error(format!("Failed to draw: {:?}", err)))
                                    .unwrap();
                            })
                        })?;
                    }
                    _ => {}
                }

                if let Some(page) = self.pages.get_mut(self.active_page) {
                    if let Some(a) = page.update(action.clone(), &mut self.state)? {
                        action_tx.send(a)?
                    };
                }
                if let Some(a) = self.footer.update(action.clone(), &mut self.state)? {
                    action_tx.send(a)?
                };
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui = Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }

        // Unmount before the terminal goes away so handles never outlive
        // their widgets' page.
        if let Some(page) = self.pages.get_mut(self.active_page) {
            page.on_exit(&mut self.state)?;
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let vertical_layout =
            Layout::vertical(vec![Constraint::Fill(1), Constraint::Length(2)]).split(frame.area());

        if let Some(page) = self.pages.get_mut(self.active_page) {
            page.draw(frame, vertical_layout[0], &self.state)?;
        };

        self.footer.draw(frame, vertical_layout[1], &self.state)?;
        Ok(())
    }
}
