// Infinite-looping image carousel widget
// Features:
// - Horizontal paging over a large virtual slot range with silent recentering
// - Auto-advance on a repeating timer, paused while the user drags
// - Dot page indicator along the bottom edge
// - Tap notification through a delegate

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{glib, Box as GtkBox, GestureDrag, Orientation, Overlay};
use std::cell::{Cell, RefCell};
use std::sync::OnceLock;

use super::advance_timer::GlibAdvanceTimer;
use super::page_dots::PageDots;
use super::paging_strip::{drag_anchor, AnimationKind, PagingStrip};
use super::texture_loader::TextureLoader;
use crate::carousel::{CarouselDelegate, LoopCarousel, PagingContainer};
use crate::config::CarouselConfig;
use crate::error::Result;
use crate::models::CarouselItem;

/// Finger travel below this counts as a tap rather than a drag.
const TAP_SLOP: f64 = 6.0;

pub type WidgetCarousel =
    LoopCarousel<PagingStrip, PageDots, TextureLoader, GlibAdvanceTimer, LoopCarouselWidget>;

// GObject subclass for LoopCarouselWidget
mod imp {
    use super::*;

    #[derive(Default)]
    pub struct LoopCarouselWidgetInner {
        // Set only by LoopCarouselWidget::new
        pub programmatic: Cell<bool>,
        pub core: RefCell<Option<WidgetCarousel>>,
        pub strip: RefCell<Option<PagingStrip>>,
        // Drag bookkeeping
        pub drag_start_offset: Cell<f64>,
        pub dragging: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for LoopCarouselWidgetInner {
        const NAME: &'static str = "LoopCarouselWidget";
        type Type = super::LoopCarouselWidget;
        type ParentType = GtkBox;
    }

    impl ObjectImpl for LoopCarouselWidgetInner {
        fn properties() -> &'static [glib::ParamSpec] {
            static PROPERTIES: OnceLock<Vec<glib::ParamSpec>> = OnceLock::new();
            PROPERTIES.get_or_init(|| {
                vec![glib::ParamSpecBoolean::builder("programmatic")
                    .construct_only()
                    .build()]
            })
        }

        fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
            if pspec.name() == "programmatic" {
                self.programmatic.set(value.get().unwrap_or(false));
            }
        }

        fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
            match pspec.name() {
                "programmatic" => self.programmatic.get().to_value(),
                name => unimplemented!("unknown property {name}"),
            }
        }

        fn constructed(&self) {
            self.parent_constructed();
            if !self.programmatic.get() {
                panic!("LoopCarouselWidget can only be created with LoopCarouselWidget::new");
            }

            let obj = self.obj();
            obj.set_orientation(Orientation::Vertical);
            obj.add_css_class("loop-carousel");
        }

        fn dispose(&self) {
            // Dropping the core invalidates the advance timer.
            let core = self.core.borrow_mut().take();
            drop(core);
            if let Some(strip) = self.strip.borrow_mut().take() {
                strip.stop_animation();
            }
        }
    }

    impl WidgetImpl for LoopCarouselWidgetInner {}
    impl BoxImpl for LoopCarouselWidgetInner {}
}

glib::wrapper! {
    pub struct LoopCarouselWidget(ObjectSubclass<imp::LoopCarouselWidgetInner>)
        @extends GtkBox, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl LoopCarouselWidget {
    pub fn new(config: CarouselConfig) -> Result<Self> {
        config.validate()?;
        let obj: Self = Object::builder().property("programmatic", true).build();
        obj.install(config)?;
        Ok(obj)
    }

    fn install(&self, config: CarouselConfig) -> Result<()> {
        let imp = self.imp();
        self.set_size_request(config.width, config.height);

        let strip = PagingStrip::new(config.width, config.height);
        let dots = PageDots::new(config.width, config.indicator_height);
        let loader = TextureLoader::new(config.width.max(1) as u32, config.height.max(1) as u32);

        let overlay = Overlay::new();
        overlay.set_child(Some(strip.widget()));
        overlay.add_overlay(dots.widget());
        self.append(&overlay);

        let widget_weak = self.downgrade();
        let timer = GlibAdvanceTimer::new(config.interval, move || {
            if let Some(widget) = widget_weak.upgrade() {
                widget.handle_tick();
            }
        });

        let widget_weak = self.downgrade();
        strip.connect_animation_end(move |kind| {
            if let Some(widget) = widget_weak.upgrade() {
                widget.handle_animation_end(kind);
            }
        });
        let widget_weak = self.downgrade();
        strip.connect_frame(move || {
            if let Some(widget) = widget_weak.upgrade() {
                widget.sync_cells();
            }
        });
        self.attach_drag(&overlay);

        let core = LoopCarousel::new(&config, strip.clone(), dots, loader, timer)?;
        imp.core.replace(Some(core));
        imp.strip.replace(Some(strip));
        Ok(())
    }

    fn attach_drag(&self, target: &Overlay) {
        let drag = GestureDrag::new();
        drag.set_button(1);

        let widget_weak = self.downgrade();
        drag.connect_drag_begin(move |_, _x, _y| {
            if let Some(widget) = widget_weak.upgrade() {
                widget.imp().dragging.set(false);
            }
        });

        let widget_weak = self.downgrade();
        drag.connect_drag_update(move |_, dx, _dy| {
            let Some(widget) = widget_weak.upgrade() else {
                return;
            };
            let imp = widget.imp();
            let Some(strip) = imp.strip.borrow().clone() else {
                return;
            };
            if !imp.dragging.get() {
                if dx.abs() < TAP_SLOP {
                    return;
                }
                // A tick may have moved the strip since the press, so anchor
                // to where it is now.
                imp.drag_start_offset.set(drag_anchor(strip.content_offset(), dx));
                imp.dragging.set(true);
                widget.with_core(|core| core.drag_began());
            }
            strip.drag_to(imp.drag_start_offset.get() - dx);
            widget.sync_cells();
        });

        let widget_weak = self.downgrade();
        drag.connect_drag_end(move |gesture, dx, _dy| {
            let Some(widget) = widget_weak.upgrade() else {
                return;
            };
            let imp = widget.imp();
            if !imp.dragging.get() {
                if let Some((x, _)) = gesture.start_point() {
                    widget.handle_tap(x + dx);
                }
                return;
            }
            imp.dragging.set(false);
            widget.handle_drag_end(dx);
        });

        target.add_controller(drag);
    }

    fn with_core<R>(&self, f: impl FnOnce(&mut WidgetCarousel) -> R) -> Option<R> {
        let result = self.imp().core.borrow_mut().as_mut().map(f);
        self.sync_cells();
        result
    }

    /// Bind and load every cell that now shows a different slot.
    fn sync_cells(&self) {
        let imp = self.imp();
        let strip = imp.strip.borrow().clone();
        let Some(strip) = strip else {
            return;
        };
        let stale = strip.take_stale_cells();
        if stale.is_empty() {
            return;
        }
        if let Some(core) = imp.core.borrow().as_ref() {
            for (index, cell) in &stale {
                core.render_item(*index, cell);
            }
        }
    }

    fn handle_tick(&self) {
        self.with_core(|core| core.tick());
    }

    fn handle_animation_end(&self, kind: AnimationKind) {
        match kind {
            AnimationKind::Programmatic => {
                self.with_core(|core| core.scroll_animation_ended());
            }
            AnimationKind::Deceleration => {
                self.with_core(|core| core.deceleration_ended());
            }
        }
    }

    fn handle_drag_end(&self, dx: f64) {
        let strip = self.imp().strip.borrow().clone();
        let Some(strip) = strip else {
            return;
        };
        let target = strip.snap_target(dx);
        let decelerate = (target - strip.content_offset()).abs() > f64::EPSILON;
        self.with_core(|core| core.drag_ended(decelerate));
        if decelerate {
            strip.animate_to(target, AnimationKind::Deceleration);
        }
    }

    fn handle_tap(&self, x: f64) {
        let imp = self.imp();
        let Some(index) = imp.strip.borrow().as_ref().and_then(|s| s.index_at(x)) else {
            return;
        };
        // Release the core before the delegate runs; it may call back in.
        let pending = imp.core.borrow().as_ref().and_then(|core| core.tap(index));
        if let Some(pending) = pending {
            tracing::debug!(
                virtual_index = index,
                real_index = pending.real_index(),
                "Carousel item tapped"
            );
            pending.deliver(self);
        }
    }

    /// Replace the slides. The page count updates now; the jump to the middle
    /// of the virtual range happens on the next main-loop turn.
    pub fn set_dataset(&self, items: Vec<CarouselItem>) -> Result<()> {
        let ticket = self
            .with_core(|core| core.set_dataset(items))
            .transpose()?
            .flatten();

        if let Some(ticket) = ticket {
            let widget_weak = self.downgrade();
            glib::idle_add_local_once(move || {
                if let Some(widget) = widget_weak.upgrade() {
                    widget.with_core(|core| core.apply_deferred_reposition(ticket));
                }
            });
        }
        Ok(())
    }

    pub fn auto_loop(&self) -> bool {
        self.imp()
            .core
            .borrow()
            .as_ref()
            .is_some_and(|core| core.auto_loop())
    }

    pub fn set_auto_loop(&self, enabled: bool) {
        self.with_core(|core| core.set_auto_loop(enabled));
    }

    pub fn current_index(&self) -> Option<usize> {
        self.imp().core.borrow().as_ref().map(|core| core.current_index())
    }

    pub fn item_count(&self) -> usize {
        self.imp()
            .core
            .borrow()
            .as_ref()
            .map(|core| core.items().len())
            .unwrap_or(0)
    }

    pub fn set_delegate<D>(&self, delegate: D)
    where
        D: CarouselDelegate<LoopCarouselWidget> + 'static,
    {
        if let Some(core) = self.imp().core.borrow_mut().as_mut() {
            core.set_delegate(delegate);
        }
    }

    pub fn connect_item_selected<F>(&self, callback: F)
    where
        F: Fn(&LoopCarouselWidget, usize, &CarouselItem) + 'static,
    {
        self.set_delegate(callback);
    }
}
