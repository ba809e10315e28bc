// Repeating glib timer with a movable fire date
// Dropping the timer removes its source, so no tick can reach a dead widget.

use gtk4::glib;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

use crate::carousel::{AdvanceTimer, FireDate};

type TickCallback = Rc<dyn Fn()>;

pub struct GlibAdvanceTimer {
    interval: Duration,
    on_tick: TickCallback,
    source: Rc<RefCell<Option<glib::SourceId>>>,
    // Bumped on every cancel so a pending one-shot knows it was superseded.
    epoch: Rc<Cell<u64>>,
}

impl GlibAdvanceTimer {
    pub fn new<F>(interval: Duration, on_tick: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            interval,
            on_tick: Rc::new(on_tick),
            source: Rc::new(RefCell::new(None)),
            epoch: Rc::new(Cell::new(0)),
        }
    }

    fn cancel(&self) {
        self.epoch.set(self.epoch.get().wrapping_add(1));
        if let Some(source_id) = self.source.borrow_mut().take() {
            source_id.remove();
        }
    }

    fn start_repeating(
        slot: &Rc<RefCell<Option<glib::SourceId>>>,
        interval: Duration,
        on_tick: TickCallback,
    ) {
        let source_id = glib::timeout_add_local(interval, move || {
            on_tick();
            glib::ControlFlow::Continue
        });
        slot.replace(Some(source_id));
    }
}

impl AdvanceTimer for GlibAdvanceTimer {
    fn set_fire_date(&mut self, fire_date: FireDate) {
        self.cancel();
        let delay = match fire_date {
            FireDate::Never => {
                trace!("Advance timer parked");
                return;
            }
            FireDate::Now => Duration::ZERO,
            FireDate::After(delay) => delay,
        };
        trace!(delay_ms = delay.as_millis() as u64, "Advance timer rescheduled");

        let slot = Rc::clone(&self.source);
        let on_tick = Rc::clone(&self.on_tick);
        let epoch = Rc::clone(&self.epoch);
        let scheduled_epoch = epoch.get();
        let interval = self.interval;
        let source_id = glib::timeout_add_local_once(delay, move || {
            // This one-shot source is finished; forget it without removing.
            slot.borrow_mut().take();
            on_tick();
            if epoch.get() == scheduled_epoch {
                Self::start_repeating(&slot, interval, on_tick);
            }
        });
        self.source.replace(Some(source_id));
    }

    fn invalidate(&mut self) {
        self.cancel();
    }
}

impl Drop for GlibAdvanceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
