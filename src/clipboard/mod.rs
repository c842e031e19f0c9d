use gtk4::gdk;
use gtk4::gdk::prelude::*;
use gtk4::gio;
use gtk4::glib;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access default display for clipboard operations")]
    DisplayUnavailable,
    #[error("failed to read text from clipboard: {source}")]
    ReadText {
        #[source]
        source: glib::Error,
    },
}

pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

fn default_clipboard() -> ClipboardResult<gdk::Clipboard> {
    let display = gdk::Display::default().ok_or(ClipboardError::DisplayUnavailable)?;
    Ok(display.clipboard())
}

/// Strips everything but the text; empty input leaves the clipboard alone.
pub fn copy_plain_text(text: &str) -> ClipboardResult<bool> {
    if text.is_empty() {
        return Ok(false);
    }
    default_clipboard()?.set_text(text);
    Ok(true)
}

/// Reads the clipboard as plain text and hands non-empty text to `on_text`.
pub fn read_plain_text<F>(on_text: F) -> ClipboardResult<()>
where
    F: FnOnce(ClipboardResult<Option<String>>) + 'static,
{
    let clipboard = default_clipboard()?;
    clipboard.read_text_async(None::<&gio::Cancellable>, move |result| {
        let text = result
            .map(|text| text.map(|text| text.to_string()).filter(|text| !text.is_empty()))
            .map_err(|source| ClipboardError::ReadText { source });
        on_text(text);
    });
    Ok(())
}
