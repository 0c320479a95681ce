//! Carousel view window
//!
//! Invariant: `window_start <= max(0, items.len() - items_per_view)`.

use std::ops::Range;

use super::{BREAKPOINTS, MAX_ITEMS_PER_VIEW, SWIPE_THRESHOLD_PX};
use crate::catalog::ColorVariant;
use crate::pricing::DisplayProduct;

/// Navigation requested by a swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Dragged left
    Next,
    /// Dragged right
    Previous,
}

/// Cards per view for a viewport width
pub fn items_per_view(viewport_width: f32) -> usize {
    BREAKPOINTS
        .iter()
        .find(|(limit, _)| viewport_width < *limit)
        .map(|(_, count)| *count)
        .unwrap_or(MAX_ITEMS_PER_VIEW)
}

/// Resolve a touch drag into a navigation, if it travelled far enough
pub fn classify_swipe(start_x: f32, end_x: f32) -> Option<SwipeDirection> {
    let diff = start_x - end_x;
    if diff.abs() <= SWIPE_THRESHOLD_PX {
        return None;
    }
    if diff > 0.0 {
        Some(SwipeDirection::Next)
    } else {
        Some(SwipeDirection::Previous)
    }
}

/// Visible window over a loaded listing
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselViewState {
    items: Vec<DisplayProduct>,
    window_start: usize,
    items_per_view: usize,
    /// Colour shown per card, parallel to `items`
    selected: Vec<ColorVariant>,
}

impl CarouselViewState {
    /// Fresh state at the start of the list, every card on the default colour
    pub fn new(items: Vec<DisplayProduct>, viewport_width: f32) -> Self {
        Self::with_items_per_view(items, items_per_view(viewport_width))
    }

    pub fn with_items_per_view(items: Vec<DisplayProduct>, items_per_view: usize) -> Self {
        let selected = vec![ColorVariant::default(); items.len()];
        Self {
            items,
            window_start: 0,
            items_per_view: items_per_view.max(1),
            selected,
        }
    }

    pub fn items(&self) -> &[DisplayProduct] {
        &self.items
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    /// Largest valid `window_start`
    pub fn max_index(&self) -> usize {
        self.items.len().saturating_sub(self.items_per_view)
    }

    /// Step the window forward; returns whether it moved
    pub fn next(&mut self) -> bool {
        if self.window_start < self.max_index() {
            self.window_start += 1;
            true
        } else {
            false
        }
    }

    /// Step the window back; returns whether it moved
    pub fn previous(&mut self) -> bool {
        if self.window_start > 0 {
            self.window_start -= 1;
            true
        } else {
            false
        }
    }

    /// Recompute cards per view for a new viewport width
    pub fn resize(&mut self, viewport_width: f32) {
        self.set_items_per_view(items_per_view(viewport_width));
    }

    pub fn set_items_per_view(&mut self, items_per_view: usize) {
        self.items_per_view = items_per_view.max(1);
        self.window_start = self.window_start.min(self.max_index());
    }

    /// Apply a touch drag from `start_x` to `end_x`
    pub fn swipe(&mut self, start_x: f32, end_x: f32) -> Option<SwipeDirection> {
        let direction = classify_swipe(start_x, end_x)?;
        match direction {
            SwipeDirection::Next => self.next(),
            SwipeDirection::Previous => self.previous(),
        };
        Some(direction)
    }

    pub fn can_go_previous(&self) -> bool {
        self.window_start > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.items.len() > self.items_per_view && self.window_start < self.max_index()
    }

    /// Indices of the cards currently in view
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.window_start + self.items_per_view).min(self.items.len());
        self.window_start..end
    }

    pub fn selected_color(&self, index: usize) -> Option<ColorVariant> {
        self.selected.get(index).copied()
    }

    /// Switch the colour shown by one card; false when `index` is out of range
    pub fn select_color(&mut self, index: usize, color: ColorVariant) -> bool {
        match self.selected.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }
}
