use super::model::WheelView;
use super::{FILL_FACTOR, PLACEHOLDER_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;

pub fn draw(
    cr: &Context,
    view: &WheelView,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.background.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;

    match &view.pixbuf {
        Some(pixbuf) => draw_wheel(cr, pixbuf, view.rotation, width, height),
        None => draw_placeholder(cr, width, height, colors),
    }
}

fn draw_wheel(
    cr: &Context,
    pixbuf: &Pixbuf,
    rotation: f64,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    if pw <= 0.0 || ph <= 0.0 {
        return Ok(());
    }
    // fit the wheel into the shorter side
    let scale = (width.min(height) * FILL_FACTOR) / pw.max(ph);

    cr.save()?;
    cr.translate(width / 2.0, height / 2.0);
    cr.rotate(rotation.to_radians());
    cr.scale(scale, scale);
    cr.translate(-pw / 2.0, -ph / 2.0);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn draw_placeholder(
    cr: &Context,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let text = "No wheel data";
    let (r, g, b, a) = colors.placeholder.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(PLACEHOLDER_FONT_SIZE);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(
            width / 2.0 - ext.width() / 2.0,
            height / 2.0 + ext.height() / 2.0,
        );
        cr.show_text(text)?;
    }
    Ok(())
}
