pub mod style;
pub mod widgets;

pub use style::{ChromeColors, StyleTokens, CHROME_COLORS, LAYOUT_TOKENS};
pub use widgets::{icon_toggle_button, install_note_icon_theme, pin_icon_name, text_button};
