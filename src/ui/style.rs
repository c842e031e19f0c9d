use crate::geometry::Color;

/// Fixed note chrome measurements in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub text_padding: i32,
    pub border_width: u16,
    pub toolbar_height: i32,
    pub pin_button_size: i32,
    pub pin_icon_size: i32,
    pub font_button_size: i32,
    pub font_button_label_px: u16,
    pub grip_size: i32,
    pub scrollbar_width: u16,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    text_padding: 10,
    border_width: 1,
    toolbar_height: 45,
    pin_button_size: 35,
    pin_icon_size: 20,
    font_button_size: 28,
    font_button_label_px: 18,
    grip_size: 30,
    scrollbar_width: 10,
};

/// Paper-toned chrome around the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeColors {
    pub window_border: Color,
    pub toolbar_background: Color,
    pub control_hover: Color,
    pub control_pressed: Color,
}

pub const CHROME_COLORS: ChromeColors = ChromeColors {
    window_border: Color::new(0xd4, 0xcb, 0xb8),
    toolbar_background: Color::new(0xec, 0xe4, 0xd7),
    control_hover: Color::new(0xdc, 0xd4, 0xc7),
    control_pressed: Color::new(0xc4, 0xc1, 0xaf),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_tokens_match_note_chrome_dimensions() {
        let tokens = LAYOUT_TOKENS;
        assert_eq!(tokens.toolbar_height, 45);
        assert_eq!(tokens.pin_button_size, 35);
        assert_eq!(tokens.font_button_size, 28);
        assert_eq!(tokens.grip_size, 30);
    }

    #[test]
    fn controls_fit_inside_toolbar() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.pin_button_size + 2 * tokens.spacing_4 <= tokens.toolbar_height);
        assert!(tokens.pin_icon_size < tokens.pin_button_size);
    }

    #[test]
    fn chrome_colors_use_paper_tones() {
        assert_eq!(CHROME_COLORS.toolbar_background.to_hex(), "#ece4d7");
        assert_eq!(CHROME_COLORS.window_border.to_hex(), "#d4cbb8");
    }
}
