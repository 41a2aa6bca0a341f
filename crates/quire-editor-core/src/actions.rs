//! Editor commands and the input surfaces that produce them.
//!
//! `Command` is the semantic operation, decoupled from how it was triggered.
//! The toolbar ([`ToolbarButton`]) and the keyboard ([`KeybindingConfig`]) are
//! both just lookup tables onto `Command`; neither carries any formatting
//! logic of its own, which is what keeps their output byte-identical.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::text::DEFAULT_HEADING_LEVEL;

/// All editor commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Commit the document (publish).
    Save,

    // === Formatting ===
    /// Wrap selection in `**`.
    Bold,
    /// Wrap selection in `*`.
    Italic,
    /// Prefix selection with `#`s of the given level.
    Heading(u8),
    /// Prefix selection with a list marker.
    List { ordered: bool },
    /// Wrap selection as a link; asks for a URL.
    Link,
    /// Fence selection as a code block.
    CodeBlock,
    /// Insert an image reference at the selection start; asks for a URL.
    Image,
}

impl Command {
    /// Whether the command needs a string from the user before it can run.
    pub fn needs_input(&self) -> bool {
        matches!(self, Self::Link | Self::Image)
    }

    /// Whether the command edits text (as opposed to persisting it).
    pub fn is_formatting(&self) -> bool {
        !matches!(self, Self::Save)
    }

    /// Stable name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Heading(_) => "heading",
            Self::List { .. } => "list",
            Self::Link => "link",
            Self::CodeBlock => "code_block",
            Self::Image => "image",
        }
    }
}

/// Which surface a command came from. Only used to tag logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Toolbar,
    Shortcut,
}

/// Buttons on the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Bold,
    Italic,
    Heading,
    List,
    Link,
    Code,
    Image,
    Save,
}

impl ToolbarButton {
    /// Every button, in toolbar order.
    pub const ALL: [ToolbarButton; 8] = [
        Self::Bold,
        Self::Italic,
        Self::Heading,
        Self::List,
        Self::Link,
        Self::Code,
        Self::Image,
        Self::Save,
    ];

    pub fn command(self) -> Command {
        match self {
            Self::Bold => Command::Bold,
            Self::Italic => Command::Italic,
            Self::Heading => Command::Heading(DEFAULT_HEADING_LEVEL),
            Self::List => Command::List { ordered: false },
            Self::Link => Command::Link,
            Self::Code => Command::CodeBlock,
            Self::Image => Command::Image,
            Self::Save => Command::Save,
        }
    }

    /// Tooltip text, including the shortcut where one exists.
    pub fn title(self) -> &'static str {
        match self {
            Self::Bold => "Bold (Ctrl+B)",
            Self::Italic => "Italic (Ctrl+I)",
            Self::Heading => "Heading",
            Self::List => "List",
            Self::Link => "Link (Ctrl+K)",
            Self::Code => "Code Block",
            Self::Image => "Image",
            Self::Save => "Save (Ctrl+S)",
        }
    }
}

/// Key values for keyboard input.
///
/// Platform-agnostic key representation. Shells convert from their native key
/// events to this enum; anything the editor does not care about maps to
/// `Unidentified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key. Letters are lowercased so `B` and `b` bind
    /// the same way.
    pub fn character(s: impl AsRef<str>) -> Self {
        Self::Character(SmolStr::new(s.as_ref().to_lowercase()))
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }
}

/// A key combination for triggering a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::CTRL)
    }

    pub fn meta(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::META)
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(is_mac))
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// A binding matched; the shell should prevent the default action.
    Handled(Command),
    /// Event was not a keybinding, let the platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, bare modifiers).
    PassThrough,
}

/// Keyboard shortcut table.
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, Command>,
}

impl KeybindingConfig {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default shortcuts for the platform: primary+S/B/I/K.
    ///
    /// Both Ctrl and Cmd are bound on Mac so external keyboards behave.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let mut config = Self::new();
        let defaults = [
            ("s", Command::Save),
            ("b", Command::Bold),
            ("i", Command::Italic),
            ("k", Command::Link),
        ];
        for (ch, command) in defaults {
            config.bind(KeyCombo::ctrl(Key::character(ch)), command.clone());
            if is_mac {
                config.bind(KeyCombo::meta(Key::character(ch)), command);
            }
        }
        config
    }

    /// Add or replace a binding.
    pub fn bind(&mut self, combo: KeyCombo, command: Command) -> Option<Command> {
        self.bindings.insert(combo, command)
    }

    /// Remove a binding.
    pub fn unbind(&mut self, combo: &KeyCombo) -> Option<Command> {
        self.bindings.remove(combo)
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<&Command> {
        self.bindings.get(combo)
    }

    /// Classify a keydown event.
    pub fn handle_keydown(&self, combo: &KeyCombo) -> KeydownResult {
        if let Some(command) = self.lookup(combo) {
            return KeydownResult::Handled(command.clone());
        }
        if combo.key.is_navigation() || combo.key.is_modifier() {
            return KeydownResult::PassThrough;
        }
        KeydownResult::NotHandled
    }
}
