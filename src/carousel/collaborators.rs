//! Seams between the carousel logic and whatever draws it.

use super::timer::FireDate;
use crate::models::{CarouselItem, ImageSource};

/// A horizontally paged container whose slots are all one page wide.
pub trait PagingContainer {
    /// Drop every bound slot and size the container to `item_count` slots.
    fn reload(&mut self, item_count: usize);

    fn item_count(&self) -> usize;

    fn scroll_to(&mut self, index: usize, animated: bool);

    fn content_offset(&self) -> f64;

    /// Jump without animation.
    fn set_content_offset(&mut self, offset_x: f64);

    fn page_width(&self) -> f64;
}

pub trait PageIndicator {
    fn set_page_count(&mut self, count: usize);

    fn set_current_page(&mut self, page: usize);
}

/// Fire-and-forget image loading into a reusable cell.
pub trait ImageLoader {
    type Cell;

    fn load(&self, cell: &Self::Cell, source: &ImageSource);
}

/// The single repeating timer behind auto-advance.
pub trait AdvanceTimer {
    fn set_fire_date(&mut self, fire_date: FireDate);

    /// Stop for good. Called when the owning carousel goes away.
    fn invalidate(&mut self);
}

/// Notified when the user taps a slide.
pub trait CarouselDelegate<W: ?Sized> {
    fn item_selected(&self, carousel: &W, real_index: usize, item: &CarouselItem);
}

impl<W: ?Sized, F> CarouselDelegate<W> for F
where
    F: Fn(&W, usize, &CarouselItem),
{
    fn item_selected(&self, carousel: &W, real_index: usize, item: &CarouselItem) {
        self(carousel, real_index, item)
    }
}
