use gtk4::prelude::*;
use gtk4::{gdk, pango, ApplicationWindow, ColorChooserDialog, FontChooserDialog, ResponseType};

use crate::geometry::Color;

fn rgba_from_color(color: Color) -> gdk::RGBA {
    let (red, green, blue) = color.to_unit_rgb();
    gdk::RGBA::new(red, green, blue, 1.0)
}

/// Pango sizes are in 1/1024ths of a point unless flagged absolute (pixels).
pub(super) fn picked_font(
    family: Option<&str>,
    size: i32,
    size_is_absolute: bool,
) -> Option<(String, i32)> {
    let family = family.map(str::trim).filter(|family| !family.is_empty())?;
    let points = if size_is_absolute {
        // 96 dpi: 4px ~ 3pt
        size / pango::SCALE * 3 / 4
    } else {
        size / pango::SCALE
    };
    Some((family.to_string(), points))
}

/// Modal color picker; `on_picked` gets `None` when the dialog is canceled.
#[allow(deprecated)]
pub(super) fn choose_color<F>(parent: &ApplicationWindow, title: &str, initial: Color, on_picked: F)
where
    F: Fn(Option<Color>) + 'static,
{
    let dialog = ColorChooserDialog::new(Some(title), Some(parent));
    dialog.set_modal(true);
    dialog.set_use_alpha(false);
    dialog.set_rgba(&rgba_from_color(initial));
    dialog.connect_response(move |dialog, response| {
        let picked = (response == ResponseType::Ok).then(|| {
            let rgba = dialog.rgba();
            Color::from_unit_rgb(rgba.red(), rgba.green(), rgba.blue())
        });
        tracing::debug!(?response, ?picked, "color dialog closed");
        on_picked(picked);
        dialog.close();
    });
    dialog.present();
}

/// Modal font picker preloaded with the note's font.
#[allow(deprecated)]
pub(super) fn choose_font<F>(parent: &ApplicationWindow, family: &str, size_pt: i32, on_picked: F)
where
    F: Fn(Option<(String, i32)>) + 'static,
{
    let dialog = FontChooserDialog::new(Some("Choose font"), Some(parent));
    dialog.set_modal(true);
    let mut initial = pango::FontDescription::new();
    initial.set_family(family);
    initial.set_size(size_pt.saturating_mul(pango::SCALE));
    dialog.set_font_desc(&initial);
    dialog.connect_response(move |dialog, response| {
        let picked = if response == ResponseType::Ok {
            dialog.font_desc().and_then(|desc| {
                picked_font(
                    desc.family().as_deref(),
                    desc.size(),
                    desc.is_size_absolute(),
                )
            })
        } else {
            None
        };
        tracing::debug!(?response, ?picked, "font dialog closed");
        on_picked(picked);
        dialog.close();
    });
    dialog.present();
}
