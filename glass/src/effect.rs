use glass_ipc::{Bounds, Response};

/// Host-side consequence of a command or timer, executed after the state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetOverlayBounds(Bounds),
    SetContentBounds(Bounds),
    SetFullscreen(bool),
    SetAlwaysOnTop(bool),
    Minimize,
    CloseGlass,
    LoadUrl { url: String, user_agent: String },
    Quit,
}

pub struct CommandResult {
    pub response: Response,
    pub effects: Vec<Effect>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            response: Response::Ok,
            effects: vec![],
        }
    }

    pub fn ok_with_effects(effects: Vec<Effect>) -> Self {
        Self {
            response: Response::Ok,
            effects,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: Response::Error {
                message: message.into(),
            },
            effects: vec![],
        }
    }

    pub fn with_response(response: Response) -> Self {
        Self {
            response,
            effects: vec![],
        }
    }
}
