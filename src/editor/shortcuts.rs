//! Keyboard shortcut resolution
//!
//! Binding key events is the host's job; this module only maps a key plus
//! modifiers to the logical editor action. `Meta` (Command) is treated as
//! `Ctrl`.

use std::collections::HashMap;

use super::format::InlineFormat;
use super::indent::IndentAction;
use super::template::MarkdownTemplate;

/// One logical edit the host can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Format(InlineFormat),
    Indent(IndentAction),
    Template(MarkdownTemplate),
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Meta,
    Shift,
    Alt,
}

/// A key plus its held modifiers, normalized for lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl KeyBind {
    pub fn new(modifiers: &[Modifier], key: &str) -> Self {
        let mut modifiers: Vec<Modifier> = modifiers
            .iter()
            .map(|m| if *m == Modifier::Meta { Modifier::Ctrl } else { *m })
            .collect();
        modifiers.sort();
        modifiers.dedup();
        Self {
            modifiers,
            key: key.to_lowercase(),
        }
    }
}

/// Create default keyboard shortcuts
pub fn key_binds() -> HashMap<KeyBind, EditorAction> {
    let mut binds = HashMap::new();

    // Inline formatting
    let formats = [
        ("b", InlineFormat::Bold),
        ("i", InlineFormat::Italic),
        ("u", InlineFormat::Underline),
        ("m", InlineFormat::Mark),
        ("e", InlineFormat::Code),
    ];
    for (key, format) in formats {
        binds.insert(KeyBind::new(&[Modifier::Ctrl], key), EditorAction::Format(format));
    }

    // Indentation
    binds.insert(KeyBind::new(&[], "tab"), EditorAction::Indent(IndentAction::Add));
    binds.insert(
        KeyBind::new(&[Modifier::Shift], "tab"),
        EditorAction::Indent(IndentAction::Remove),
    );

    // Paragraph break, only without modifiers
    binds.insert(KeyBind::new(&[], "enter"), EditorAction::Newline);

    binds
}

/// Resolve a key event to an action using the default bindings
pub fn resolve_shortcut(key: &str, modifiers: &[Modifier]) -> Option<EditorAction> {
    key_binds().get(&KeyBind::new(modifiers, key)).copied()
}
