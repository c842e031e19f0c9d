use gtk4::gio;

pub(super) const ACTION_GROUP: &str = "note";

pub(super) const CHOOSE_BACKGROUND: &str = "choose-background";
pub(super) const DARK_MODE: &str = "dark-mode";
pub(super) const LIGHT_MODE: &str = "light-mode";
pub(super) const FOLLOW_SYSTEM: &str = "follow-system";
pub(super) const CHOOSE_TEXT_COLOR: &str = "choose-text-color";
pub(super) const CHOOSE_FONT: &str = "choose-font";
pub(super) const NEW_NOTE: &str = "new-note";
pub(super) const CLOSE_WINDOW: &str = "close-window";
pub(super) const PASTE_PLAIN: &str = "paste-plain";
pub(super) const COPY_PLAIN: &str = "copy-plain";
pub(super) const CONVERT_PLAIN: &str = "convert-plain";
pub(super) const CLEAR_CONTENT: &str = "clear-content";

fn detailed(action: &str) -> String {
    format!("{ACTION_GROUP}.{action}")
}

fn item(label: &str, action: &str) -> gio::MenuItem {
    gio::MenuItem::new(Some(label), Some(&detailed(action)))
}

fn item_with_accel(label: &str, action: &str, accel: &str) -> gio::MenuItem {
    let menu_item = item(label, action);
    menu_item.set_attribute_value("accel", Some(&accel.into()));
    menu_item
}

/// Right-click menu of the note chrome.
pub(super) fn build_window_menu() -> gio::Menu {
    let background = gio::Menu::new();
    background.append_item(&item("Choose background color", CHOOSE_BACKGROUND));
    background.append_item(&item("Dark mode", DARK_MODE));
    background.append_item(&item("Light mode", LIGHT_MODE));
    background.append_item(&item("Follow system theme", FOLLOW_SYSTEM));

    let font = gio::Menu::new();
    font.append_item(&item("Choose font color", CHOOSE_TEXT_COLOR));
    font.append_item(&item("Choose font", CHOOSE_FONT));

    let appearance = gio::Menu::new();
    appearance.append_submenu(Some("Background"), &background);
    appearance.append_submenu(Some("Font"), &font);

    let window = gio::Menu::new();
    window.append_item(&item("New note", NEW_NOTE));
    window.append_item(&item("Close window", CLOSE_WINDOW));

    let menu = gio::Menu::new();
    menu.append_section(None, &appearance);
    menu.append_section(None, &window);
    menu
}

/// Appended to the text view's built-in context menu.
pub(super) fn build_text_menu_extras() -> gio::Menu {
    let clipboard = gio::Menu::new();
    clipboard.append_item(&item_with_accel(
        "Paste as plain text",
        PASTE_PLAIN,
        "<Control><Shift>v",
    ));
    clipboard.append_item(&item_with_accel(
        "Copy as plain text",
        COPY_PLAIN,
        "<Control><Shift>c",
    ));

    let content = gio::Menu::new();
    content.append_item(&item("Convert to plain text", CONVERT_PLAIN));
    content.append_item(&item("Clear content", CLEAR_CONTENT));

    let menu = gio::Menu::new();
    menu.append_section(None, &clipboard);
    menu.append_section(None, &content);
    menu
}
