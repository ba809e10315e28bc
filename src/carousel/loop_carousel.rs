//! Toolkit-independent carousel logic.

use tracing::{debug, trace};

use super::collaborators::{
    AdvanceTimer, CarouselDelegate, ImageLoader, PageIndicator, PagingContainer,
};
use super::space::{self, VirtualSpace};
use super::timer::{AdvanceState, AutoAdvance};
use crate::config::CarouselConfig;
use crate::error::Result;
use crate::models::CarouselItem;
use std::rc::Rc;

/// Handle for the deferred repositioning that follows a dataset assignment.
/// Only the ticket from the latest assignment is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositionTicket(u64);

/// A tap resolved to its item, waiting to be handed to the delegate.
///
/// Holding one does not borrow the carousel, so the delegate is free to
/// call back into it (for example to replace the dataset).
pub struct PendingTap<H> {
    delegate: Rc<dyn CarouselDelegate<H>>,
    real_index: usize,
    item: CarouselItem,
}

impl<H> PendingTap<H> {
    pub fn real_index(&self) -> usize {
        self.real_index
    }

    pub fn item(&self) -> &CarouselItem {
        &self.item
    }

    /// Notify the delegate, passing `host` as the carousel that was tapped.
    pub fn deliver(self, host: &H) -> usize {
        self.delegate.item_selected(host, self.real_index, &self.item);
        self.real_index
    }
}

/// `H` is whatever the delegate receives as "the carousel": the GTK widget
/// in the application, a stand-in in tests.
pub struct LoopCarousel<C, P, L, T, H>
where
    C: PagingContainer,
    P: PageIndicator,
    L: ImageLoader,
    T: AdvanceTimer,
{
    items: Vec<CarouselItem>,
    space: VirtualSpace,
    current_index: usize,
    advance: AutoAdvance,
    generation: u64,
    container: C,
    indicator: P,
    loader: L,
    timer: T,
    delegate: Option<Rc<dyn CarouselDelegate<H>>>,
}

impl<C, P, L, T, H> LoopCarousel<C, P, L, T, H>
where
    C: PagingContainer,
    P: PageIndicator,
    L: ImageLoader,
    T: AdvanceTimer,
{
    pub fn new(
        config: &CarouselConfig,
        container: C,
        indicator: P,
        loader: L,
        mut timer: T,
    ) -> Result<Self> {
        config.validate()?;
        let advance = AutoAdvance::new(config.auto_loop, config.interval);
        timer.set_fire_date(advance.initial_fire_date());
        debug!(
            auto_loop = config.auto_loop,
            interval_ms = config.interval.as_millis() as u64,
            multiplier = config.multiplier,
            "Carousel created"
        );

        Ok(Self {
            items: Vec::new(),
            space: VirtualSpace::empty(config.multiplier),
            current_index: 0,
            advance,
            generation: 0,
            container,
            indicator,
            loader,
            timer,
            delegate: None,
        })
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub fn space(&self) -> VirtualSpace {
        self.space
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_real_index(&self) -> Option<usize> {
        self.space.real_index(self.current_index)
    }

    pub fn advance_state(&self) -> AdvanceState {
        self.advance.state()
    }

    pub fn auto_loop(&self) -> bool {
        self.advance.auto_loop()
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn indicator(&self) -> &P {
        &self.indicator
    }

    pub fn set_delegate<D>(&mut self, delegate: D)
    where
        D: CarouselDelegate<H> + 'static,
    {
        self.delegate = Some(Rc::new(delegate));
    }

    /// Replace the dataset. The page count changes right away; moving to the
    /// middle of the virtual space waits for [`Self::apply_deferred_reposition`].
    ///
    /// Returns `None` for an empty dataset, which never repositions.
    pub fn set_dataset(&mut self, items: Vec<CarouselItem>) -> Result<Option<RepositionTicket>> {
        let space = VirtualSpace::new(items.len(), self.space.multiplier())?;

        self.items = items;
        self.space = space;
        self.generation = self.generation.wrapping_add(1);

        self.container.reload(space.total());
        self.indicator.set_page_count(space.len());
        debug!(
            items = space.len(),
            total = space.total(),
            generation = self.generation,
            "Dataset replaced"
        );

        if space.is_empty() {
            self.current_index = 0;
            return Ok(None);
        }
        Ok(Some(RepositionTicket(self.generation)))
    }

    /// Second half of [`Self::set_dataset`], run once layout has settled.
    pub fn apply_deferred_reposition(&mut self, ticket: RepositionTicket) -> bool {
        if ticket.0 != self.generation {
            trace!(ticket = ticket.0, generation = self.generation, "Stale reposition ignored");
            return false;
        }
        let Some(midpoint) = self.space.midpoint() else {
            return false;
        };

        self.container.scroll_to(midpoint, false);
        self.current_index = midpoint;
        if let Some(page) = self.space.real_index(midpoint) {
            self.indicator.set_current_page(page);
        }
        true
    }

    /// Start loading the image for `virtual_index` into `cell`.
    pub fn render_item(&self, virtual_index: usize, cell: &L::Cell) -> Option<usize> {
        let real = self.space.real_index(virtual_index)?;
        let item = self.items.get(real)?;
        trace!(virtual_index, real, "Rendering slide");
        self.loader.load(cell, item.source());
        Some(real)
    }

    /// Real index and item under a virtual slot.
    pub fn selection(&self, virtual_index: usize) -> Option<(usize, &CarouselItem)> {
        let real = self.space.real_index(virtual_index)?;
        self.items.get(real).map(|item| (real, item))
    }

    /// Resolve a tap on `virtual_index`. `None` when nobody listens or the
    /// dataset is empty.
    pub fn tap(&self, virtual_index: usize) -> Option<PendingTap<H>> {
        let delegate = Rc::clone(self.delegate.as_ref()?);
        let (real_index, item) = self.selection(virtual_index)?;
        trace!(virtual_index, real_index, "Tap resolved");
        Some(PendingTap {
            delegate,
            real_index,
            item: item.clone(),
        })
    }

    /// One timer fire. Returns the slot scrolled to.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.advance.is_running() {
            return None;
        }
        if self.space.is_empty() {
            return None;
        }
        let next = space::next_tick(self.current_index, self.container.item_count())?;
        self.current_index = next;
        self.container.scroll_to(next, true);
        trace!(index = next, "Auto-advance");
        Some(next)
    }

    /// A programmatic animated scroll came to rest.
    pub fn scroll_animation_ended(&mut self) {
        if let Some(page) = self.space.real_index(self.current_index) {
            self.indicator.set_current_page(page);
        }
    }

    pub fn drag_began(&mut self) {
        if let Some(fire_date) = self.advance.drag_began() {
            self.timer.set_fire_date(fire_date);
        }
    }

    /// A drag ended. Without deceleration the strip is already at rest, so it
    /// settles immediately.
    pub fn drag_ended(&mut self, decelerate: bool) {
        if !decelerate {
            self.deceleration_ended();
        }
        if let Some(fire_date) = self.advance.drag_ended() {
            self.timer.set_fire_date(fire_date);
        }
    }

    /// Snap to the page under the current offset, pulling edge slots back to
    /// the middle of the space. Returns the settled slot.
    pub fn deceleration_ended(&mut self) -> Option<usize> {
        let page_width = self.container.page_width();
        let index = self
            .space
            .index_at_offset(self.container.content_offset(), page_width)?;
        let settled = self.space.recenter(index);
        if settled != index {
            debug!(from = index, to = settled, "Recentered virtual space");
        }

        self.container.set_content_offset(settled as f64 * page_width);
        if let Some(page) = self.space.real_index(settled) {
            self.indicator.set_current_page(page);
        }
        self.current_index = settled;
        Some(settled)
    }

    pub fn set_auto_loop(&mut self, enabled: bool) {
        let fire_date = self.advance.set_auto_loop(enabled);
        self.timer.set_fire_date(fire_date);
        debug!(enabled, "Auto-loop toggled");
    }
}

impl<C, P, L, T, H> Drop for LoopCarousel<C, P, L, T, H>
where
    C: PagingContainer,
    P: PageIndicator,
    L: ImageLoader,
    T: AdvanceTimer,
{
    fn drop(&mut self) {
        self.timer.invalidate();
    }
}
