// Demo window hosting a single carousel
// Shows the slides, an auto-loop toggle and the last tapped item.

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CheckButton, CssProvider, Label,
    Orientation, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::LoopCarouselWidget;
use crate::config::CarouselConfig;
use crate::error::Result;
use crate::models::CarouselItem;

const WINDOW_MARGIN: i32 = 12;

// Current page white, the rest purple.
const CAROUSEL_CSS: &str = "
.loop-carousel { background-color: #000000; }
.carousel-dot { min-width: 8px; min-height: 8px; border-radius: 4px; background-color: #800080; }
.carousel-dot-active { background-color: #ffffff; }
.carousel-status { font-family: monospace; color: #00ff88; }
";

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(CAROUSEL_CSS);
    match Display::default() {
        Some(display) => {
            gtk4::style_context_add_provider_for_display(
                &display,
                &provider,
                STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }
        None => tracing::warn!("No display available, carousel CSS not loaded"),
    }
}

pub struct CarouselWindow {
    window: ApplicationWindow,
}

impl CarouselWindow {
    pub fn new(app: &Application, config: CarouselConfig, items: Vec<CarouselItem>) -> Result<Self> {
        load_css();

        let carousel = LoopCarouselWidget::new(config)?;
        carousel.set_halign(Align::Center);

        let status = Label::new(Some("tap a slide"));
        status.set_halign(Align::Start);
        status.add_css_class("carousel-status");

        let status_for_tap = status.clone();
        carousel.connect_item_selected(move |_carousel, index, item| {
            let name = item.source().display_name();
            tracing::info!(index, source = %name, "Slide selected");
            let text = match item.caption() {
                Some(caption) => format!("[{}] {} - {}", index, name, caption),
                None => format!("[{}] {}", index, name),
            };
            status_for_tap.set_text(&text);
        });

        let auto_loop = CheckButton::with_label("Auto-loop");
        auto_loop.set_active(config.auto_loop);
        let carousel_for_toggle = carousel.clone();
        auto_loop.connect_toggled(move |button| {
            carousel_for_toggle.set_auto_loop(button.is_active());
        });

        let controls = GtkBox::new(Orientation::Horizontal, WINDOW_MARGIN);
        controls.append(&auto_loop);
        controls.append(&status);

        let content = GtkBox::new(Orientation::Vertical, WINDOW_MARGIN);
        content.set_margin_top(WINDOW_MARGIN);
        content.set_margin_bottom(WINDOW_MARGIN);
        content.set_margin_start(WINDOW_MARGIN);
        content.set_margin_end(WINDOW_MARGIN);
        content.append(&carousel);
        content.append(&controls);

        let window = ApplicationWindow::builder()
            .application(app)
            .title("loopcarousel")
            .resizable(false)
            .child(&content)
            .build();

        tracing::info!(slides = items.len(), "Loading carousel");
        carousel.set_dataset(items)?;

        Ok(Self { window })
    }

    pub fn present(&self) {
        self.window.present();
    }
}
