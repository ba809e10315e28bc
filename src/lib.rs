//! Infinitely looping image carousel for GTK4.
//!
//! [`carousel::LoopCarousel`] holds the toolkit-independent logic: the
//! virtual index space, auto-advance and recentering. [`ui::LoopCarouselWidget`]
//! wires it to a paging strip, a dot indicator, a glib timer and a background
//! image loader.

pub mod app;
pub mod carousel;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod models;
pub mod ui;

pub use carousel::{CarouselDelegate, LoopCarousel};
pub use config::CarouselConfig;
pub use error::{CarouselError, Result};
pub use models::{CarouselItem, ImageSource};
pub use ui::LoopCarouselWidget;
