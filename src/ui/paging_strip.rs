// Horizontal paging strip over a (very long) virtual slot range
// Only three cells exist; they are repositioned inside a Fixed as the
// offset moves, so the virtual length costs nothing.

use gtk4::prelude::*;
use gtk4::{glib, Fixed, Overflow};
use std::cell::{Cell, RefCell};
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::texture_loader::CarouselCell;
use crate::carousel::PagingContainer;

const CELL_COUNT: usize = 3;
const FRAME_MS: u64 = 16;
const SCROLL_ANIMATION_MS: u64 = 300;
const SWIPE_FRACTION: f64 = 0.2;

/// What started a running offset animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// `scroll_to(.., animated = true)`.
    Programmatic,
    /// Glide to a page after the user let go.
    Deceleration,
}

type AnimationEndCallback = Rc<dyn Fn(AnimationKind)>;
type FrameCallback = Rc<dyn Fn()>;

struct StripInner {
    fixed: Fixed,
    cells: Vec<CarouselCell>,
    page_width: f64,
    item_count: Cell<usize>,
    offset: Cell<f64>,
    animation: RefCell<Option<glib::SourceId>>,
    on_animation_end: RefCell<Option<AnimationEndCallback>>,
    on_frame: RefCell<Option<FrameCallback>>,
}

#[derive(Clone)]
pub struct PagingStrip {
    inner: Rc<StripInner>,
}

impl PagingStrip {
    pub fn new(width: i32, height: i32) -> Self {
        let fixed = Fixed::new();
        fixed.set_overflow(Overflow::Hidden);
        fixed.set_size_request(width, height);
        fixed.add_css_class("carousel-strip");

        let cells: Vec<CarouselCell> = (0..CELL_COUNT)
            .map(|_| {
                let cell = CarouselCell::new(width, height);
                cell.picture().set_visible(false);
                fixed.put(cell.picture(), 0.0, 0.0);
                cell
            })
            .collect();

        Self {
            inner: Rc::new(StripInner {
                fixed,
                cells,
                page_width: f64::from(width.max(1)),
                item_count: Cell::new(0),
                offset: Cell::new(0.0),
                animation: RefCell::new(None),
                on_animation_end: RefCell::new(None),
                on_frame: RefCell::new(None),
            }),
        }
    }

    pub fn widget(&self) -> &Fixed {
        &self.inner.fixed
    }

    pub fn connect_animation_end<F>(&self, callback: F)
    where
        F: Fn(AnimationKind) + 'static,
    {
        *self.inner.on_animation_end.borrow_mut() = Some(Rc::new(callback));
    }

    /// Called after every animation frame moved the cells.
    pub fn connect_frame<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        *self.inner.on_frame.borrow_mut() = Some(Rc::new(callback));
    }

    /// Virtual slot under a point in widget coordinates.
    pub fn index_at(&self, x: f64) -> Option<usize> {
        slot_at(
            self.inner.offset.get(),
            self.inner.page_width,
            self.inner.item_count.get(),
            x,
        )
    }

    /// Offset limits for the current slot range.
    pub fn max_offset(&self) -> f64 {
        let count = self.inner.item_count.get();
        (count.saturating_sub(1)) as f64 * self.inner.page_width
    }

    /// Move during a drag, clamped to the slot range.
    pub fn drag_to(&self, offset_x: f64) {
        self.stop_animation();
        self.place(offset_x.clamp(0.0, self.max_offset()));
    }

    /// Page a released drag should come to rest on.
    pub fn snap_target(&self, drag_dx: f64) -> f64 {
        snap_offset(
            self.inner.offset.get(),
            self.inner.page_width,
            self.inner.item_count.get(),
            drag_dx,
        )
    }

    pub fn animate_to(&self, target: f64, kind: AnimationKind) {
        self.stop_animation();

        let from = self.inner.offset.get();
        let start = Instant::now();
        let duration = Duration::from_millis(SCROLL_ANIMATION_MS);
        let strip_weak = Rc::downgrade(&self.inner);

        let source_id = glib::timeout_add_local(Duration::from_millis(FRAME_MS), move || {
            let Some(inner) = strip_weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let strip = PagingStrip { inner };
            let t = (start.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0);
            let eased = 1.0 - (1.0 - t).powi(3);
            strip.place(from + (target - from) * eased);
            strip.notify_frame();

            if t < 1.0 {
                return glib::ControlFlow::Continue;
            }
            // Finished: the source goes away with Break, so only forget it.
            strip.inner.animation.borrow_mut().take();
            let callback = strip.inner.on_animation_end.borrow().clone();
            if let Some(callback) = callback {
                callback(kind);
            }
            glib::ControlFlow::Break
        });
        self.inner.animation.replace(Some(source_id));
    }

    pub fn stop_animation(&self) {
        if let Some(source_id) = self.inner.animation.borrow_mut().take() {
            source_id.remove();
        }
    }

    /// Cells whose slot changed since they were last rendered. Each one is
    /// rebound before being returned.
    pub fn take_stale_cells(&self) -> Vec<(usize, CarouselCell)> {
        let mut stale = Vec::new();
        for (index, cell) in self.visible_slots() {
            if cell.bound_index() != Some(index) {
                cell.bind(index);
                stale.push((index, cell.clone()));
            }
        }
        stale
    }

    fn notify_frame(&self) {
        let callback = self.inner.on_frame.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Slots around the offset, each paired with the cell that shows it.
    fn visible_slots(&self) -> Vec<(usize, &CarouselCell)> {
        let inner = &self.inner;
        visible_range(inner.offset.get(), inner.page_width, inner.item_count.get())
            .map(|range| {
                range
                    .map(|index| (index, &inner.cells[cell_position(index)]))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn place(&self, offset_x: f64) {
        let inner = &self.inner;
        inner.offset.set(offset_x);

        let slots = self.visible_slots();
        let shown: Vec<usize> = slots.iter().map(|(index, _)| cell_position(*index)).collect();
        for (position, cell) in inner.cells.iter().enumerate() {
            cell.picture().set_visible(shown.contains(&position));
        }
        for (index, cell) in slots {
            let x = index as f64 * inner.page_width - offset_x;
            inner.fixed.move_(cell.picture(), x, 0.0);
        }
    }
}

/// Slot under `x` for a strip scrolled to `offset`. Points left of slot 0
/// hit nothing; points past the end land on the last slot.
fn slot_at(offset: f64, page_width: f64, count: usize, x: f64) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let raw = ((offset + x) / page_width).floor();
    if raw < 0.0 {
        return None;
    }
    Some((raw as usize).min(count - 1))
}

/// Resting offset after a drag of `drag_dx`. Past a fifth of a page the
/// swipe direction wins; shorter drags go to the nearest page.
fn snap_offset(offset: f64, page_width: f64, count: usize, drag_dx: f64) -> f64 {
    let page = if drag_dx.abs() > page_width * SWIPE_FRACTION {
        if drag_dx < 0.0 {
            (offset / page_width).ceil()
        } else {
            (offset / page_width).floor()
        }
    } else {
        (offset / page_width).round()
    };
    let max_offset = count.saturating_sub(1) as f64 * page_width;
    (page * page_width).clamp(0.0, max_offset)
}

/// The slot under `offset` plus one neighbour on each side.
fn visible_range(offset: f64, page_width: f64, count: usize) -> Option<RangeInclusive<usize>> {
    if count == 0 {
        return None;
    }
    let first = ((offset / page_width).floor().max(0.0) as usize).min(count - 1);
    Some(first.saturating_sub(1)..=(first + 1).min(count - 1))
}

fn cell_position(index: usize) -> usize {
    index % CELL_COUNT
}

/// Offset a drag is measured from, given where the strip is once the drag
/// is recognised and how far the pointer has already travelled.
pub(super) fn drag_anchor(offset: f64, travelled_dx: f64) -> f64 {
    offset + travelled_dx
}

impl PagingContainer for PagingStrip {
    fn reload(&mut self, item_count: usize) {
        self.stop_animation();
        self.inner.item_count.set(item_count);
        for cell in &self.inner.cells {
            cell.unbind();
        }
        self.place(self.inner.offset.get().clamp(0.0, self.max_offset()));
    }

    fn item_count(&self) -> usize {
        self.inner.item_count.get()
    }

    fn scroll_to(&mut self, index: usize, animated: bool) {
        let count = self.inner.item_count.get();
        if count == 0 {
            return;
        }
        let target = index.min(count - 1) as f64 * self.inner.page_width;
        if animated {
            self.animate_to(target, AnimationKind::Programmatic);
        } else {
            self.stop_animation();
            self.place(target);
        }
    }

    fn content_offset(&self) -> f64 {
        self.inner.offset.get()
    }

    fn set_content_offset(&mut self, offset_x: f64) {
        self.stop_animation();
        self.place(offset_x);
    }

    fn page_width(&self) -> f64 {
        self.inner.page_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: f64 = 320.0;

    #[test]
    fn test_slot_at_edges() {
        assert_eq!(slot_at(0.0, PAGE, 12, 0.0), Some(0));
        assert_eq!(slot_at(0.0, PAGE, 12, 319.9), Some(0));
        assert_eq!(slot_at(0.0, PAGE, 12, 320.0), Some(1));

        let last = 11.0 * PAGE;
        assert_eq!(slot_at(last, PAGE, 12, 10.0), Some(11));
        assert_eq!(slot_at(last, PAGE, 12, 700.0), Some(11));

        assert_eq!(slot_at(0.0, PAGE, 12, -1.0), None);
        assert_eq!(slot_at(0.0, PAGE, 0, 10.0), None);
    }

    #[test]
    fn test_snap_offset_swipe_threshold() {
        let offset = 5.0 * PAGE;
        // Dragged left: the offset grew past page 5.
        let dragged = offset + 0.19 * PAGE;
        assert_eq!(snap_offset(dragged, PAGE, 12, -0.19 * PAGE), 5.0 * PAGE);
        let dragged = offset + 0.21 * PAGE;
        assert_eq!(snap_offset(dragged, PAGE, 12, -0.21 * PAGE), 6.0 * PAGE);

        // Dragged right.
        let dragged = offset - 0.19 * PAGE;
        assert_eq!(snap_offset(dragged, PAGE, 12, 0.19 * PAGE), 5.0 * PAGE);
        let dragged = offset - 0.21 * PAGE;
        assert_eq!(snap_offset(dragged, PAGE, 12, 0.21 * PAGE), 4.0 * PAGE);
    }

    #[test]
    fn test_snap_offset_stays_in_range() {
        assert_eq!(snap_offset(0.0, PAGE, 12, 100.0), 0.0);
        assert_eq!(snap_offset(11.0 * PAGE, PAGE, 12, -100.0), 11.0 * PAGE);
        assert_eq!(snap_offset(40.0, PAGE, 0, -100.0), 0.0);
    }

    #[test]
    fn test_visible_range_between_pages() {
        // Halfway from slot 7 to slot 8.
        let offset = 7.5 * PAGE;
        let slots: Vec<usize> = visible_range(offset, PAGE, 12).unwrap().collect();
        assert_eq!(slots, vec![6, 7, 8]);
        let cells: Vec<usize> = slots.iter().map(|i| cell_position(*i)).collect();
        assert_eq!(cells, vec![0, 1, 2]);
        assert_eq!(slot_at(offset, PAGE, 12, 0.0), Some(7));
        assert_eq!(slot_at(offset, PAGE, 12, PAGE * 0.5), Some(8));
    }

    #[test]
    fn test_visible_range_at_ends() {
        assert_eq!(visible_range(0.0, PAGE, 12), Some(0..=1));
        assert_eq!(visible_range(11.0 * PAGE, PAGE, 12), Some(10..=11));
        assert_eq!(visible_range(-50.0, PAGE, 12), Some(0..=1));
        assert_eq!(visible_range(0.0, PAGE, 1), Some(0..=0));
        assert_eq!(visible_range(0.0, PAGE, 0), None);
    }

    #[test]
    fn test_drag_anchor_follows_moved_strip() {
        // Pressed at page 4, a tick then moved the strip to page 5 before the
        // pointer had travelled far enough to count as a drag.
        let moved = 5.0 * PAGE;
        let recognised_dx = -8.0;
        let anchor = drag_anchor(moved, recognised_dx);
        // drag_to(anchor - dx) must not jump when the drag is recognised.
        assert_eq!(anchor - recognised_dx, moved);
        assert_eq!(anchor - (-30.0), moved + 22.0);
    }
}
