mod shortcut;

pub use shortcut::{resolve_scroll, resolve_shortcut, ShortcutAction, ShortcutModifiers};
