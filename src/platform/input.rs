//! Input mapping
//!
//! Every input channel maps to a single action: jump. Mouse, touch and the
//! space bar are interchangeable.

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource<'a> {
    /// Mouse button press on the canvas
    Pointer,
    /// Touch start on the canvas
    Touch,
    /// Key press with its `KeyboardEvent.code`
    Key(&'a str),
}

/// Game action requested by an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
}

/// Map a keyboard `code` to an action
pub fn action_for_key(code: &str) -> Option<Action> {
    match code {
        "Space" => Some(Action::Jump),
        _ => None,
    }
}

pub fn action_for_source(source: InputSource<'_>) -> Option<Action> {
    match source {
        InputSource::Pointer | InputSource::Touch => Some(Action::Jump),
        InputSource::Key(code) => action_for_key(code),
    }
}
