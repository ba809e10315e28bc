// Dot-style page indicator pinned to the bottom of the carousel

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Orientation};
use std::cell::Cell;
use std::rc::Rc;

use crate::carousel::PageIndicator;

const DOT_SIZE: i32 = 8;
const DOT_SPACING: i32 = 8;

#[derive(Clone)]
pub struct PageDots {
    container: GtkBox,
    count: Rc<Cell<usize>>,
    current: Rc<Cell<Option<usize>>>,
}

impl PageDots {
    pub fn new(width: i32, height: i32) -> Self {
        let container = GtkBox::new(Orientation::Horizontal, DOT_SPACING);
        container.set_halign(Align::Fill);
        container.set_valign(Align::End);
        container.set_size_request(width, height);
        container.add_css_class("carousel-dots");
        // Taps and drags belong to the strip underneath.
        container.set_can_target(false);

        Self {
            container,
            count: Rc::new(Cell::new(0)),
            current: Rc::new(Cell::new(None)),
        }
    }

    pub fn widget(&self) -> &GtkBox {
        &self.container
    }

    fn dot(&self, page: usize) -> Option<gtk4::Widget> {
        if page >= self.count.get() {
            return None;
        }
        // Skip the leading spacer.
        let mut child = self.container.first_child();
        for _ in 0..=page {
            child = child?.next_sibling();
        }
        child
    }
}

impl PageIndicator for PageDots {
    fn set_page_count(&mut self, count: usize) {
        while let Some(child) = self.container.first_child() {
            self.container.remove(&child);
        }

        // Spacers on both ends keep the dots centered across the full width.
        let leading = GtkBox::new(Orientation::Horizontal, 0);
        leading.set_hexpand(true);
        for _ in 0..count {
            let dot = GtkBox::new(Orientation::Horizontal, 0);
            dot.set_size_request(DOT_SIZE, DOT_SIZE);
            dot.set_valign(Align::Center);
            dot.add_css_class("carousel-dot");
            self.container.append(&dot);
        }
        if count > 0 {
            self.container.prepend(&leading);
            let trailing = GtkBox::new(Orientation::Horizontal, 0);
            trailing.set_hexpand(true);
            self.container.append(&trailing);
        }

        self.count.set(count);
        self.current.set(None);
        if count > 0 {
            self.set_current_page(0);
        }
    }

    fn set_current_page(&mut self, page: usize) {
        if let Some(previous) = self.current.get().and_then(|p| self.dot(p)) {
            previous.remove_css_class("carousel-dot-active");
        }
        if let Some(dot) = self.dot(page) {
            dot.add_css_class("carousel-dot-active");
            self.current.set(Some(page));
        }
    }
}
