use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

const STYLESHEET: &str = ".goal-wheel-input { padding: 8px; }";

/// Colors the canvas paints with, taken from the active GTK theme.
pub struct ThemeColors {
    pub slice_stroke: Srgba<f64>,
    pub label: Srgba<f64>,
    pub marker: Srgba<f64>,
    pub marker_dragging: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let named = |name: &str| named_color(context, name);

        Self {
            slice_stroke: named("borders")
                .map(|c| with_alpha(c, 1.0))
                .unwrap_or(Srgba::new(0.83, 0.83, 0.83, 1.0)),
            label: named("theme_fg_color").unwrap_or(Srgba::new(0.1, 0.1, 0.1, 1.0)),
            marker: named("theme_selected_fg_color")
                .map(|c| with_alpha(c, 1.0))
                .unwrap_or(Srgba::new(1.0, 1.0, 1.0, 1.0)),
            marker_dragging: named("theme_selected_bg_color")
                .map(|c| with_alpha(c, 0.9))
                .unwrap_or(Srgba::new(0.4, 0.4, 0.8, 0.9)),
        }
    }
}

fn named_color(context: &gtk::StyleContext, name: &str) -> Option<Srgba<f64>> {
    let rgba = context.lookup_color(name)?;
    Some(Srgba::new(rgba.red(), rgba.green(), rgba.blue(), rgba.alpha()).into_format())
}

fn with_alpha(color: Srgba<f64>, alpha: f64) -> Srgba<f64> {
    Srgba { alpha, ..color }
}

pub fn load_css() {
    let Some(display) = gdk::Display::default() else {
        log::warn!("No default display, skipping stylesheet");
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLESHEET);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
