//! Carousel controller
//!
//! Drives the `Loading -> Ready | Error` lifecycle. Each load gets a ticket;
//! only the completion carrying the most recent ticket is applied, so a slow
//! response to an earlier filter change can never overwrite a newer listing.

use tracing::{debug, warn};

use super::{CarouselState, CarouselView, CarouselViewState, ListingClient, SwipeDirection};
use crate::catalog::ColorVariant;
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::pricing::DisplayProduct;

/// Identifies one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct CarouselController {
    state: CarouselState,
    viewport_width: f32,
    filters: FilterCriteria,
    issued: u64,
    pending: Option<LoadTicket>,
}

impl CarouselController {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            state: CarouselState::Loading,
            viewport_width,
            filters: FilterCriteria::default(),
            issued: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CarouselState::Loading)
    }

    /// Enter `Loading` for a new request, superseding any load in flight
    pub fn begin_load(&mut self, filters: FilterCriteria) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);

        self.filters = filters;
        self.pending = Some(ticket);
        self.state = CarouselState::Loading;
        ticket
    }

    pub fn clear_filters(&mut self) -> LoadTicket {
        self.begin_load(FilterCriteria::default())
    }

    /// Apply the outcome of a load. Returns false when the ticket is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<DisplayProduct>>,
    ) -> bool {
        if self.pending != Some(ticket) {
            debug!(ticket = ticket.0, "Ignoring superseded load");
            return false;
        }
        self.pending = None;

        self.state = match result {
            Ok(items) => {
                debug!(count = items.len(), "Carousel ready");
                CarouselState::Ready(CarouselViewState::new(items, self.viewport_width))
            }
            Err(e) => {
                warn!(error = %e, "Error loading products");
                CarouselState::Error(e.to_string())
            }
        };
        true
    }

    /// Fetch the listing for `filters` and apply it
    pub async fn load(&mut self, client: &ListingClient, filters: FilterCriteria) -> bool {
        let ticket = self.begin_load(filters);
        let result = client.fetch_products(&filters).await;
        self.finish_load(ticket, result)
    }

    pub fn next(&mut self) -> bool {
        self.ready_mut().map_or(false, |view| view.next())
    }

    pub fn previous(&mut self) -> bool {
        self.ready_mut().map_or(false, |view| view.previous())
    }

    /// Viewport changes are remembered even while loading
    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        if let Some(view) = self.ready_mut() {
            view.resize(viewport_width);
        }
    }

    pub fn swipe(&mut self, start_x: f32, end_x: f32) -> Option<SwipeDirection> {
        self.ready_mut()?.swipe(start_x, end_x)
    }

    pub fn select_color(&mut self, index: usize, color: ColorVariant) -> bool {
        self.ready_mut()
            .map_or(false, |view| view.select_color(index, color))
    }

    /// Current view description
    pub fn view(&self) -> CarouselView {
        CarouselView::project(&self.state)
    }

    fn ready_mut(&mut self) -> Option<&mut CarouselViewState> {
        match &mut self.state {
            CarouselState::Ready(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Images, Product};
    use crate::error::ListingError;
    use crate::pricing::to_display;

    fn items(count: usize) -> Vec<DisplayProduct> {
        (0..count)
            .map(|i| {
                let product = Product {
                    name: format!("Item {i}"),
                    weight: 2.0,
                    popularity_score: 0.5,
                    images: Images {
                        yellow: format!("{i}-y.jpg"),
                        white: format!("{i}-w.jpg"),
                        rose: format!("{i}-r.jpg"),
                    },
                };
                to_display(i, product, 60.0)
            })
            .collect()
    }

    fn ready(controller: &CarouselController) -> &CarouselViewState {
        match controller.state() {
            CarouselState::Ready(view) => view,
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_load_success_and_failure() {
        let mut controller = CarouselController::new(1280.0);
        assert!(controller.is_loading());

        let ticket = controller.begin_load(FilterCriteria::default());
        assert!(controller.finish_load(ticket, Ok(items(10))));
        assert_eq!(ready(&controller).items_per_view(), 4);

        let ticket = controller.begin_load(FilterCriteria::default());
        assert!(controller.is_loading());
        assert!(controller.finish_load(
            ticket,
            Err(ListingError::UpstreamUnavailable("offline".to_string()))
        ));
        assert!(matches!(controller.state(), CarouselState::Error(_)));
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut controller = CarouselController::new(1280.0);

        let first = controller.begin_load(FilterCriteria::default());
        let second = controller.begin_load(FilterCriteria {
            min_price: Some(100.0),
            ..Default::default()
        });

        assert!(controller.finish_load(second, Ok(items(2))));
        assert!(!controller.finish_load(first, Ok(items(10))));
        assert_eq!(ready(&controller).items().len(), 2);
        assert_eq!(controller.filters().min_price, Some(100.0));

        // A ticket is consumed once
        assert!(!controller.finish_load(second, Ok(items(7))));
        assert_eq!(ready(&controller).items().len(), 2);
    }

    #[test]
    fn test_late_stale_failure_does_not_clobber_ready() {
        let mut controller = CarouselController::new(800.0);

        let first = controller.begin_load(FilterCriteria::default());
        let second = controller.clear_filters();
        assert!(controller.finish_load(second, Ok(items(5))));

        assert!(!controller.finish_load(
            first,
            Err(ListingError::UpstreamUnavailable("timeout".to_string()))
        ));
        assert!(matches!(controller.state(), CarouselState::Ready(_)));
    }

    #[test]
    fn test_navigation_is_noop_unless_ready() {
        let mut controller = CarouselController::new(1280.0);
        assert!(!controller.next());
        assert!(!controller.previous());
        assert_eq!(controller.swipe(400.0, 100.0), None);
        assert!(!controller.select_color(0, ColorVariant::Rose));
    }

    #[test]
    fn test_resize_while_loading_applies_to_next_listing() {
        let mut controller = CarouselController::new(1280.0);
        let ticket = controller.begin_load(FilterCriteria::default());

        controller.resize(500.0);
        controller.finish_load(ticket, Ok(items(10)));
        assert_eq!(ready(&controller).items_per_view(), 2);
    }

    #[test]
    fn test_reload_resets_window_and_colors() {
        let mut controller = CarouselController::new(1280.0);
        let ticket = controller.begin_load(FilterCriteria::default());
        controller.finish_load(ticket, Ok(items(10)));

        controller.next();
        controller.next();
        controller.select_color(3, ColorVariant::White);
        assert_eq!(controller.swipe(300.0, 200.0), Some(SwipeDirection::Next));
        assert_eq!(ready(&controller).window_start(), 3);

        let ticket = controller.begin_load(FilterCriteria::default());
        controller.finish_load(ticket, Ok(items(10)));
        assert_eq!(ready(&controller).window_start(), 0);
        assert_eq!(ready(&controller).selected_color(3), Some(ColorVariant::Yellow));
    }
}
