use color_eyre::eyre::Result;

#[derive(Default)]
pub struct State {
    pub input_mode: InputMode,
}

/// Insert while a text field has keyboard focus, Normal otherwise. Quit via
/// Ctrl-C is only honored in Normal mode so typing never tears the app down.
#[derive(Default, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

impl State {
    pub fn new() -> Result<Self> {
        Ok(Self {
            input_mode: InputMode::Normal,
        })
    }
}
