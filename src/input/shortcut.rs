#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    IncreaseFontSize,
    DecreaseFontSize,
    TogglePin,
    PastePlainText,
    CopyPlainText,
}

/// `key` is the lowercase ASCII character of the pressed key.
pub fn resolve_shortcut(key: char, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    if !modifiers.ctrl {
        return None;
    }

    match (key, modifiers.shift) {
        ('+' | '=', _) => Some(ShortcutAction::IncreaseFontSize),
        ('-', _) => Some(ShortcutAction::DecreaseFontSize),
        ('t', _) => Some(ShortcutAction::TogglePin),
        ('v', true) => Some(ShortcutAction::PastePlainText),
        ('c', true) => Some(ShortcutAction::CopyPlainText),
        _ => None,
    }
}

/// Ctrl+wheel steps the font; a plain wheel keeps scrolling the text.
pub fn resolve_scroll(delta_y: f64, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    if !modifiers.ctrl || delta_y == 0.0 {
        return None;
    }
    if delta_y < 0.0 {
        Some(ShortcutAction::IncreaseFontSize)
    } else {
        Some(ShortcutAction::DecreaseFontSize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: ShortcutModifiers = ShortcutModifiers::new(true, false);
    const CTRL_SHIFT: ShortcutModifiers = ShortcutModifiers::new(true, true);

    #[test]
    fn resolve_shortcut_maps_font_steps() {
        for key in ['+', '='] {
            assert_eq!(
                resolve_shortcut(key, CTRL),
                Some(ShortcutAction::IncreaseFontSize)
            );
        }
        assert_eq!(
            resolve_shortcut('+', CTRL_SHIFT),
            Some(ShortcutAction::IncreaseFontSize)
        );
        assert_eq!(
            resolve_shortcut('-', CTRL),
            Some(ShortcutAction::DecreaseFontSize)
        );
    }

    #[test]
    fn resolve_shortcut_maps_pin_toggle() {
        assert_eq!(
            resolve_shortcut('t', CTRL),
            Some(ShortcutAction::TogglePin)
        );
        assert_eq!(
            resolve_shortcut('t', ShortcutModifiers::default()),
            None
        );
    }

    #[test]
    fn resolve_shortcut_requires_shift_for_plain_text_clipboard() {
        assert_eq!(
            resolve_shortcut('v', CTRL_SHIFT),
            Some(ShortcutAction::PastePlainText)
        );
        assert_eq!(
            resolve_shortcut('c', CTRL_SHIFT),
            Some(ShortcutAction::CopyPlainText)
        );
        // plain Ctrl+V / Ctrl+C stay with the text view
        assert_eq!(resolve_shortcut('v', CTRL), None);
        assert_eq!(resolve_shortcut('c', CTRL), None);
    }

    #[test]
    fn resolve_shortcut_ignores_unmodified_and_unknown_keys() {
        assert_eq!(
            resolve_shortcut('+', ShortcutModifiers::default()),
            None
        );
        assert_eq!(resolve_shortcut('\t', CTRL), None);
        assert_eq!(resolve_shortcut('z', CTRL), None);
    }

    #[test]
    fn resolve_scroll_needs_ctrl_and_uses_direction() {
        assert_eq!(
            resolve_scroll(-1.0, CTRL),
            Some(ShortcutAction::IncreaseFontSize)
        );
        assert_eq!(
            resolve_scroll(2.5, CTRL),
            Some(ShortcutAction::DecreaseFontSize)
        );
        assert_eq!(resolve_scroll(0.0, CTRL), None);
        assert_eq!(resolve_scroll(-1.0, ShortcutModifiers::default()), None);
    }
}
