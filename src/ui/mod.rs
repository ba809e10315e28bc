pub mod advance_timer;
pub mod carousel_widget;
pub mod page_dots;
pub mod paging_strip;
pub mod texture_loader;
pub mod window;

pub use carousel_widget::LoopCarouselWidget;
pub use window::CarouselWindow;
