use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    FocusNext,
    FocusPrev,
    /// Read the full submission payload from the field registry.
    Submit,
    /// Log the best-effort value snapshot without failing on unmounted fields.
    Snapshot,
    Update,
}
