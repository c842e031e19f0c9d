use crate::theme::NoteStyle;
use crate::ui::{ChromeColors, StyleTokens};
use gtk4::CssProvider;

/// Everything that feeds one note window's stylesheet.
#[derive(Debug, Clone, Copy)]
pub(super) struct NoteCssInput<'a> {
    pub(super) window_class: &'a str,
    pub(super) style: NoteStyle,
    pub(super) font_family: &'a str,
    pub(super) font_size_pt: i32,
    pub(super) tokens: StyleTokens,
    pub(super) chrome: ChromeColors,
}

fn css_font_family(family: &str) -> String {
    family.replace(['"', '\\', '{', '}', ';'], "")
}

pub(super) fn note_css(input: NoteCssInput<'_>) -> String {
    let NoteCssInput {
        window_class,
        style,
        font_family,
        font_size_pt,
        tokens,
        chrome,
    } = input;
    let scrollbar_opacity = if style.scrollbar_hidden { 0 } else { 1 };
    format!(
        "
window.{window_class} {{
  background: {background};
  border: {border_width}px solid {window_border};
}}
window.{window_class} .note-text,
window.{window_class} .note-text text {{
  background: {background};
  color: {text_color};
  caret-color: {text_color};
  font-family: \"{font_family}\";
  font-size: {font_size_pt}pt;
}}
window.{window_class} scrollbar {{
  background: rgba(0, 0, 0, 0.05);
  border: none;
  opacity: {scrollbar_opacity};
}}
window.{window_class} scrollbar slider {{
  min-width: {scrollbar_width}px;
  min-height: {scrollbar_width}px;
  border-radius: {scrollbar_radius}px;
  background: rgba(0, 0, 0, 0.25);
}}
window.{window_class} .note-toolbar {{
  background: {toolbar_background};
  border-top: {border_width}px solid {window_border};
  min-height: {toolbar_height}px;
  padding: 0 {spacing_8}px;
}}
window.{window_class} .note-toolbar button {{
  color: #000000;
  border-radius: {control_radius}px;
  padding: 0;
}}
window.{window_class} .note-toolbar button:hover {{
  background: {control_hover};
}}
window.{window_class} .note-toolbar button:active,
window.{window_class} .note-toolbar button:checked {{
  background: {control_pressed};
}}
window.{window_class} .note-font-button {{
  min-width: {font_button_size}px;
  min-height: {font_button_size}px;
  font-size: {font_button_label_px}px;
}}
window.{window_class} .note-pin-button image {{
  -gtk-icon-size: {pin_icon_size}px;
}}
window.{window_class} .note-resize-grip {{
  min-width: {grip_size}px;
  min-height: {grip_size}px;
}}
",
        background = style.background,
        text_color = style.text,
        font_family = css_font_family(font_family),
        border_width = tokens.border_width,
        window_border = chrome.window_border,
        toolbar_background = chrome.toolbar_background,
        control_hover = chrome.control_hover,
        control_pressed = chrome.control_pressed,
        toolbar_height = tokens.toolbar_height,
        spacing_8 = tokens.spacing_8,
        control_radius = tokens.spacing_4,
        scrollbar_width = tokens.scrollbar_width,
        scrollbar_radius = tokens.scrollbar_width / 2,
        font_button_size = tokens.font_button_size,
        font_button_label_px = tokens.font_button_label_px,
        pin_icon_size = tokens.pin_icon_size,
        grip_size = tokens.grip_size,
    )
}

/// Display-wide provider scoped to one note through its window class.
#[derive(Debug)]
pub(super) struct NoteCssProvider {
    provider: CssProvider,
}

impl NoteCssProvider {
    pub(super) fn install() -> Self {
        let provider = CssProvider::new();
        if let Some(display) = gtk4::gdk::Display::default() {
            gtk4::style_context_add_provider_for_display(
                &display,
                &provider,
                gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        } else {
            tracing::warn!("no display available; note styling disabled");
        }
        Self { provider }
    }

    pub(super) fn apply(&self, input: NoteCssInput<'_>) {
        self.provider.load_from_data(&note_css(input));
    }

    pub(super) fn uninstall(&self) {
        if let Some(display) = gtk4::gdk::Display::default() {
            gtk4::style_context_remove_provider_for_display(&display, &self.provider);
        }
    }
}
