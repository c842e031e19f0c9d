use std::sync::Once;

use gtk4::prelude::*;
use gtk4::{gio, Button, ToggleButton};

const NOTE_ICON_RESOURCE_PATH: &str = "/io/tacknote/icons/hicolor";
pub const PIN_ICON_NAME: &str = "pin-symbolic";
pub const PINNED_ICON_NAME: &str = "pin-filled-symbolic";

pub fn text_button(
    label: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let button = Button::with_label(label);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("note-font-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

pub fn install_note_icon_theme() {
    static ICON_THEME_SETUP: Once = Once::new();

    ICON_THEME_SETUP.call_once(|| {
        if let Err(err) = gio::resources_register_include!("tacknote.gresource") {
            tracing::error!(?err, "failed to register bundled pin icon resources");
            return;
        }

        let Some(display) = gtk4::gdk::Display::default() else {
            tracing::warn!("failed to initialize note icon theme; no display available");
            return;
        };

        let icon_theme = gtk4::IconTheme::for_display(&display);
        icon_theme.add_resource_path(NOTE_ICON_RESOURCE_PATH);
        tracing::debug!(
            pin = icon_theme.has_icon(PIN_ICON_NAME),
            pinned = icon_theme.has_icon(PINNED_ICON_NAME),
            "registered bundled note icon resource path"
        );
    });
}

pub fn icon_toggle_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> ToggleButton {
    let button = ToggleButton::new();
    button.set_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_active(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("note-pin-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

/// Icon for the current pin state.
pub fn pin_icon_name(pinned: bool) -> &'static str {
    if pinned {
        PINNED_ICON_NAME
    } else {
        PIN_ICON_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_icon_name_tracks_state() {
        assert_eq!(pin_icon_name(true), "pin-filled-symbolic");
        assert_eq!(pin_icon_name(false), "pin-symbolic");
    }
}
