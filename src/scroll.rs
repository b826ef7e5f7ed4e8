//! Infinite-scroll trigger.
//!
//! Measurements are in content units. The terminal front end counts one list
//! row as [`ROW_UNITS`] units so the thresholds keep their proportions.

use crate::engine::{ListEngine, PageRequest};

pub const SCROLL_THRESHOLD: u32 = 300;
pub const AUTO_LOAD_MARGIN: u32 = 50;
pub const ROW_UNITS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_top: u32,
    pub viewport_height: u32,
    pub content_height: u32,
}

impl Viewport {
    pub fn from_rows(first_visible: usize, visible_rows: usize, total_rows: usize) -> Self {
        let units = |rows: usize| (rows as u32).saturating_mul(ROW_UNITS);
        Self {
            scroll_top: units(first_visible),
            viewport_height: units(visible_rows),
            content_height: units(total_rows),
        }
    }

    pub fn distance_to_bottom(&self) -> u32 {
        self.content_height
            .saturating_sub(self.scroll_top.saturating_add(self.viewport_height))
    }

    /// Content too short to scroll at all
    pub fn underfilled(&self, margin: u32) -> bool {
        self.content_height <= self.viewport_height.saturating_add(margin)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: u32,
    margin: u32,
    attached: bool,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self { threshold: SCROLL_THRESHOLD, margin: AUTO_LOAD_MARGIN, attached: true }
    }
}

impl ScrollTrigger {
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Called when the list view goes away; no further loads are requested.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn on_scroll(&self, engine: &mut ListEngine, viewport: Viewport) -> Option<PageRequest> {
        if !self.attached || viewport.distance_to_bottom() >= self.threshold {
            return None;
        }
        engine.load_next_page()
    }

    /// Checked once after each successful load or restore so a short list
    /// keeps filling until it can scroll.
    pub fn after_load(&self, engine: &mut ListEngine, viewport: Viewport) -> Option<PageRequest> {
        if !self.attached || !viewport.underfilled(self.margin) {
            return None;
        }
        engine.load_next_page()
    }
}
