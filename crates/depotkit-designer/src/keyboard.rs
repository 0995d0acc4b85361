//! Keyboard shortcuts of the editor.

/// A key relevant to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Char(char),
    Other(String),
}

impl Key {
    /// Maps a DOM-style key name (`"Escape"`, `"z"`, `"Delete"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Delete" | "Backspace" => Self::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other(name.to_string()),
                }
            }
        }
    }

    fn is_char(&self, expected: char) -> bool {
        matches!(self, Self::Char(c) if c.eq_ignore_ascii_case(&expected))
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editor modes that change what keys mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    pub aisle_mode: bool,
    pub repositioning: bool,
    pub placing: bool,
}

/// Action bound to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Cancel the active session, or leave aisle mode when idle.
    Escape,
    Undo,
    Redo,
    /// Quarter turn of the cargo being repositioned.
    Rotate,
    /// Delete the selected aisle vertex, or the last one drawn.
    DeletePoint,
}

/// Resolves the action for `input`, if any.
pub fn map_key(input: &KeyInput, context: KeyContext) -> Option<EditorAction> {
    if input.key == Key::Escape {
        return (context.aisle_mode || context.repositioning || context.placing).then_some(EditorAction::Escape);
    }
    if context.repositioning && !input.command() && input.key.is_char('t') {
        return Some(EditorAction::Rotate);
    }
    if !context.aisle_mode {
        return None;
    }
    if input.command() {
        if input.key.is_char('z') {
            return Some(if input.shift {
                EditorAction::Redo
            } else {
                EditorAction::Undo
            });
        }
        if input.key.is_char('y') {
            return Some(EditorAction::Redo);
        }
        return None;
    }
    (input.key == Key::Delete).then_some(EditorAction::DeletePoint)
}
