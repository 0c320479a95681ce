//! Render projection
//!
//! Turns carousel state into a flat description of what the page shows.

use super::{CarouselState, CarouselViewState, CARD_GAP_PX};
use crate::catalog::ColorVariant;
use crate::pricing::DisplayProduct;

const FULL_STAR: char = '★';
const OPEN_STAR: char = '☆';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
    Error,
}

/// One product card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub index: usize,
    pub name: String,
    pub image: String,
    pub color: ColorVariant,
    pub color_label: &'static str,
    pub price_label: String,
    pub stars: String,
    pub rating_label: String,
    pub popularity_label: String,
    /// Inside the current view window
    pub visible: bool,
}

/// Whole carousel section
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselView {
    pub status: ViewStatus,
    pub cards: Vec<CardView>,
    pub window_start: usize,
    pub show_previous: bool,
    pub show_next: bool,
    /// Filter inputs are disabled while a load is in flight
    pub filters_enabled: bool,
}

impl CarouselView {
    pub fn project(state: &CarouselState) -> Self {
        match state {
            CarouselState::Loading => Self::empty(ViewStatus::Loading),
            CarouselState::Error(_) => Self::empty(ViewStatus::Error),
            CarouselState::Ready(view) => Self::ready(view),
        }
    }

    /// Horizontal translation of the card strip for a rendered card width
    pub fn offset_px(&self, card_width: f32) -> f32 {
        -(self.window_start as f32) * (card_width + CARD_GAP_PX)
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &CardView> {
        self.cards.iter().filter(|card| card.visible)
    }

    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            cards: Vec::new(),
            window_start: 0,
            show_previous: false,
            show_next: false,
            filters_enabled: status != ViewStatus::Loading,
        }
    }

    fn ready(view: &CarouselViewState) -> Self {
        let visible = view.visible_range();
        let cards = view
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let color = view.selected_color(index).unwrap_or_default();
                card(index, item, color, visible.contains(&index))
            })
            .collect();

        Self {
            status: ViewStatus::Ready,
            cards,
            window_start: view.window_start(),
            show_previous: view.can_go_previous(),
            show_next: view.can_go_next(),
            filters_enabled: true,
        }
    }
}

fn card(index: usize, item: &DisplayProduct, color: ColorVariant, visible: bool) -> CardView {
    let product = &item.product;
    CardView {
        index,
        name: product.name.clone(),
        image: product.images.get(color).to_string(),
        color,
        color_label: color.label(),
        price_label: format!("${:.2} USD", item.price),
        stars: star_glyphs(item.star_rating),
        rating_label: format!("{}/5", item.star_rating),
        popularity_label: format!("Popularity: {:.0}%", (product.popularity_score * 100.0).round()),
        visible,
    }
}

/// Five glyphs: one filled star per whole point, open stars for the rest
pub fn star_glyphs(rating: f64) -> String {
    if !rating.is_finite() {
        return std::iter::repeat(OPEN_STAR).take(5).collect();
    }
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;

    let mut stars: String = std::iter::repeat(FULL_STAR).take(full).collect();
    if rating.fract() != 0.0 {
        stars.push(OPEN_STAR);
    }
    let empty = 5 - rating.ceil() as usize;
    stars.extend(std::iter::repeat(OPEN_STAR).take(empty));
    stars
}
