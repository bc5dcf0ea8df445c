use crate::gui::theme::ThemeColors;
use crate::wheel::layout::{LabelPlacement, SliceGeometry};
use crate::wheel::{Drawable, Point, Scene, TextAlign};
use cairo::Context;
use palette::{Srgb, Srgba};

const SLICE_STROKE_WIDTH: f64 = 2.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const MARKER_FONT_SIZE: f64 = 13.0;
const MARKER_PADDING: f64 = 4.0;

struct DrawableRenderer<'a> {
    drawable: &'a Drawable,
    dragging: bool,
}

impl<'a> DrawableRenderer<'a> {
    fn new(drawable: &'a Drawable, dragging: bool) -> Self {
        Self { drawable, dragging }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        match self.drawable {
            Drawable::Slice {
                center,
                radius,
                geometry,
                color,
                ..
            } => Self::draw_slice(cr, *center, *radius, geometry, *color, colors),
            Drawable::Label {
                text, placement, ..
            } => Self::draw_label(cr, text, placement, colors),
            Drawable::Marker {
                text,
                position,
                rotation_deg,
                ..
            } => self.draw_marker(cr, text, *position, *rotation_deg, colors),
        }
    }

    fn draw_slice(
        cr: &Context,
        center: Point,
        radius: f64,
        geometry: &SliceGeometry,
        color: Srgb<u8>,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        cr.new_path();
        cr.move_to(center.x, center.y);
        cr.arc(
            center.x,
            center.y,
            radius,
            geometry.start_deg.to_radians(),
            geometry.end_deg().to_radians(),
        );
        cr.close_path();

        let (r, g, b) = color.into_format::<f64>().into_components();
        cr.set_source_rgb(r, g, b);
        cr.fill_preserve()?;

        set_source(cr, colors.slice_stroke);
        cr.set_line_width(SLICE_STROKE_WIDTH);
        cr.stroke()
    }

    fn draw_label(
        cr: &Context,
        text: &str,
        placement: &LabelPlacement,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(LABEL_FONT_SIZE);

        cr.save()?;
        cr.translate(placement.anchor.x, placement.anchor.y);
        cr.rotate(placement.rotation_deg.to_radians());
        if let Ok(ext) = cr.text_extents(text) {
            let x = match placement.align {
                TextAlign::Left => 0.0,
                TextAlign::Right => placement.width - ext.width(),
            };
            cr.move_to(x, ext.height());
            cr.show_text(text)?;
        }
        cr.restore()
    }

    fn draw_marker(
        &self,
        cr: &Context,
        text: &str,
        position: Point,
        rotation_deg: f64,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        set_marker_font(cr);

        cr.save()?;
        cr.translate(position.x, position.y);
        cr.rotate(rotation_deg.to_radians());
        if let Ok(ext) = cr.text_extents(text) {
            // centre the text on the anchor
            let (x, y) = (-ext.width() / 2.0, ext.height() / 2.0);
            if self.dragging {
                set_source(cr, colors.marker_dragging);
                cr.rectangle(
                    x - MARKER_PADDING,
                    -y - MARKER_PADDING,
                    ext.width() + 2.0 * MARKER_PADDING,
                    ext.height() + 2.0 * MARKER_PADDING,
                );
                cr.fill()?;
            }
            set_source(cr, colors.marker);
            cr.move_to(x, y);
            cr.show_text(text)?;
        }
        cr.restore()
    }
}

fn set_marker_font(cr: &Context) {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(MARKER_FONT_SIZE);
}

/// Half the drawn length of a goal marker, including its highlight padding.
/// Measured on a scratch surface so it can be asked outside a draw call.
pub fn marker_half_width(text: &str) -> f64 {
    let measured = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1)
        .and_then(|surface| Context::new(&surface))
        .and_then(|cr| {
            set_marker_font(&cr);
            cr.text_extents(text)
        });
    match measured {
        Ok(ext) => ext.width() / 2.0 + MARKER_PADDING,
        Err(e) => {
            log::warn!("Cannot measure marker text: {}", e);
            0.0
        }
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    for drawable in &scene.background {
        DrawableRenderer::new(drawable, false).draw(cr, colors)?;
    }
    for drawable in &scene.foreground {
        DrawableRenderer::new(drawable, true).draw(cr, colors)?;
    }
    Ok(())
}
