use std::{collections::HashMap, fmt};

use crate::foundation::error::SkinampResult;

/// Application-level behavior a control fires on release.
///
/// Skins name actions by string; the well-known ones map onto closed variants
/// (matched case-insensitively), anything else is carried as [`Action::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Pause,
    Stop,
    Eject,
    Close,
    Previous,
    Next,
    Custom(String),
}

impl Action {
    /// Parse a skin action id. An empty id means "no action".
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let action = match id.to_ascii_uppercase().as_str() {
            "PLAY" => Self::Play,
            "PAUSE" => Self::Pause,
            "STOP" => Self::Stop,
            "EJECT" => Self::Eject,
            "CLOSE" => Self::Close,
            "PREVIOUS" | "PREV" => Self::Previous,
            "NEXT" => Self::Next,
            _ => Self::Custom(id.to_string()),
        };
        Some(action)
    }

    /// Canonical id, as it appears in logs.
    pub fn id(&self) -> &str {
        match self {
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Stop => "STOP",
            Self::Eject => "EJECT",
            Self::Close => "CLOSE",
            Self::Previous => "PREVIOUS",
            Self::Next => "NEXT",
            Self::Custom(id) => id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Zero-argument fallible callback bound to an [`Action`].
pub type ActionHandler = Box<dyn FnMut() -> SkinampResult<()> + Send>;

/// Action -> handler table owned by the embedding application.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<Action, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `action`. A later registration replaces an earlier one.
    pub fn register(&mut self, action: Action, handler: ActionHandler) {
        if self.handlers.insert(action.clone(), handler).is_some() {
            tracing::debug!(%action, "replaced action handler");
        }
    }

    pub fn is_registered(&self, action: &Action) -> bool {
        self.handlers.contains_key(action)
    }

    /// Run the handler for `action`. Returns `Ok(false)` when nothing is bound.
    pub fn invoke(&mut self, action: &Action) -> SkinampResult<bool> {
        match self.handlers.get_mut(action) {
            Some(handler) => {
                handler()?;
                Ok(true)
            }
            None => {
                tracing::debug!(%action, "no handler registered; ignoring");
                Ok(false)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.handlers.keys().map(Action::id).collect();
        ids.sort_unstable();
        f.debug_struct("ActionRegistry")
            .field("actions", &ids)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/action.rs"]
mod tests;
