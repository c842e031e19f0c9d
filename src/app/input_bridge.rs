use crate::drag::{HeldButtons, PointerButton};
use crate::input::ShortcutModifiers;

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // Wayland/XKB keycodes are commonly evdev+8. Handle both to keep shortcuts
    // layout-agnostic under different backends/IME states.
    match keycode {
        47 | 55 => Some('v'),
        46 | 54 => Some('c'),
        20 | 28 => Some('t'),
        _ => None,
    }
}

/// Lowercase ASCII character a key press stands for, if any.
pub(super) fn normalize_shortcut_key(key: gtk4::gdk::Key, keycode: u32) -> Option<char> {
    match key {
        gtk4::gdk::Key::KP_Add => return Some('+'),
        gtk4::gdk::Key::KP_Subtract => return Some('-'),
        _ => {}
    }

    match key.to_unicode().filter(|character| !character.is_control()) {
        Some(character) if character.is_ascii() => Some(character.to_ascii_lowercase()),
        Some(_) | None => shortcut_character_from_keycode(keycode),
    }
}

pub(super) fn shortcut_modifiers(modifier: gtk4::gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
    )
}

pub(super) fn held_buttons(modifier: gtk4::gdk::ModifierType) -> HeldButtons {
    HeldButtons {
        primary: modifier.contains(gtk4::gdk::ModifierType::BUTTON1_MASK),
    }
}

pub(super) fn pointer_button(button: u32) -> PointerButton {
    PointerButton::from_button_number(button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_shortcut_key_falls_back_to_hardware_keycode_for_letters() {
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 47), Some('v'));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 54), Some('c'));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 28), Some('t'));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 999), None);
    }

    #[test]
    fn normalize_shortcut_key_lowercases_keyval_and_skips_control_keys() {
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::V, 999), Some('v'));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::equal, 999), Some('='));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Escape, 9), None);
    }

    #[test]
    fn normalize_shortcut_key_maps_keypad_signs() {
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::KP_Add, 0), Some('+'));
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::KP_Subtract, 0), Some('-'));
    }

    #[test]
    fn shortcut_modifiers_reads_ctrl_and_shift() {
        let modifiers = shortcut_modifiers(
            gtk4::gdk::ModifierType::CONTROL_MASK | gtk4::gdk::ModifierType::SHIFT_MASK,
        );
        assert_eq!(modifiers, ShortcutModifiers::new(true, true));
        assert_eq!(
            shortcut_modifiers(gtk4::gdk::ModifierType::ALT_MASK),
            ShortcutModifiers::new(false, false)
        );
    }

    #[test]
    fn held_buttons_tracks_primary_mask() {
        assert_eq!(
            held_buttons(gtk4::gdk::ModifierType::BUTTON1_MASK),
            HeldButtons::PRIMARY
        );
        assert_eq!(
            held_buttons(gtk4::gdk::ModifierType::empty()),
            HeldButtons::NONE
        );
    }
}
