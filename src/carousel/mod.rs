//! Carousel module
//!
//! Client-side state of the storefront carousel: which slice of the listing
//! is visible, which colour each card shows, and the load lifecycle. All
//! transitions are plain functions over explicit state; rendering is a
//! projection of that state into a view description.

mod client;
mod controller;
mod render;
mod view;

pub use client::ListingClient;
pub use controller::{CarouselController, LoadTicket};
pub use render::{star_glyphs, CardView, CarouselView, ViewStatus};
pub use view::{classify_swipe, items_per_view, CarouselViewState, SwipeDirection};

/// Horizontal drag distance a swipe must exceed to navigate
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Gap between two cards in the strip
pub const CARD_GAP_PX: f32 = 20.0;

/// Viewport width breakpoints and the number of cards shown below each
pub const BREAKPOINTS: [(f32, usize); 3] = [(480.0, 1), (768.0, 2), (1024.0, 3)];

/// Cards shown at and above the widest breakpoint
pub const MAX_ITEMS_PER_VIEW: usize = 4;

/// Load lifecycle of the carousel
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselState {
    Loading,
    Ready(CarouselViewState),
    Error(String),
}
