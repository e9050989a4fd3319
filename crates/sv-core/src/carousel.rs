//! Paging state for the rotating game-card list

use std::time::Duration;

use crate::timer::IntervalTimer;

/// Card geometry used to translate a page index into a scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    pub cards_per_page: usize,
    pub card_width: f32,
    pub card_margin: f32,
    pub inset: f32,
}

impl Default for CarouselLayout {
    fn default() -> Self {
        Self {
            cards_per_page: 4,
            card_width: 300.0,
            card_margin: 20.0,
            inset: 6.0,
        }
    }
}

/// Horizontal translation of the card strip for `page`.
pub fn page_offset(page: usize, layout: &CarouselLayout) -> f32 {
    page as f32 * (layout.card_width + layout.card_margin) * layout.cards_per_page as f32 + layout.inset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Left,
    Right,
    Page(usize),
}

pub struct CarouselState {
    cards_per_page: usize,
    current_page: usize,
    total_pages: usize,
    paused: bool,
    timer: IntervalTimer,
}

impl CarouselState {
    pub fn new(cards_per_page: usize, rotate_every: Duration) -> Self {
        Self {
            cards_per_page: cards_per_page.max(1),
            current_page: 0,
            total_pages: 0,
            paused: false,
            timer: IntervalTimer::new(rotate_every),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// New contents: back to the first page and restart rotation.
    pub fn set_item_count(&mut self, items: usize) {
        self.total_pages = items.div_ceil(self.cards_per_page);
        self.current_page = 0;
        self.timer.start();
    }

    /// Move to a page with wraparound. No-op when there are no pages.
    pub fn navigate(&mut self, target: PageTarget) {
        if self.total_pages == 0 {
            return;
        }
        self.current_page = match target {
            PageTarget::Left => (self.current_page + self.total_pages - 1) % self.total_pages,
            PageTarget::Right => (self.current_page + 1) % self.total_pages,
            PageTarget::Page(page) => page.min(self.total_pages - 1),
        };
    }

    /// User-driven navigation; the next auto-rotation is a full interval away.
    pub fn navigate_manually(&mut self, target: PageTarget) {
        self.navigate(target);
        self.timer.start();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Feed frame time. Returns whether the page changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let fires = self.timer.advance(dt);
        if fires == 0 || self.paused || self.total_pages == 0 {
            return false;
        }
        let before = self.current_page;
        for _ in 0..fires {
            self.navigate(PageTarget::Right);
        }
        before != self.current_page
    }

    pub fn offset(&self, layout: &CarouselLayout) -> f32 {
        page_offset(self.current_page, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(items: usize) -> CarouselState {
        let mut state = CarouselState::new(4, Duration::from_secs(5));
        state.set_item_count(items);
        state
    }

    #[test]
    fn test_page_count() {
        assert_eq!(carousel(24).total_pages(), 6);
        assert_eq!(carousel(5).total_pages(), 2);
        assert_eq!(carousel(0).total_pages(), 0);
    }

    #[test]
    fn test_right_wraps_after_last_page() {
        let mut state = carousel(24);
        for _ in 0..6 {
            state.navigate(PageTarget::Right);
        }
        assert_eq!(state.current_page(), 0);
    }

    #[test]
    fn test_left_wraps_from_first_page() {
        let mut state = carousel(24);
        state.navigate(PageTarget::Left);
        assert_eq!(state.current_page(), 5);
    }

    #[test]
    fn test_empty_carousel_ignores_navigation() {
        let mut state = carousel(0);
        state.navigate(PageTarget::Right);
        state.navigate(PageTarget::Left);
        state.navigate(PageTarget::Page(3));
        assert_eq!(state.current_page(), 0);
        assert!(!state.advance(Duration::from_secs(10)));
    }

    #[test]
    fn test_auto_rotation_respects_pause() {
        let mut state = carousel(8);
        state.pause();
        assert!(!state.advance(Duration::from_secs(5)));
        assert_eq!(state.current_page(), 0);

        state.resume();
        assert!(state.advance(Duration::from_secs(5)));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_manual_navigation_rearms_timer() {
        let mut state = carousel(24);
        state.advance(Duration::from_secs(4));
        state.navigate_manually(PageTarget::Page(3));
        assert!(!state.advance(Duration::from_secs(4)));
        assert_eq!(state.current_page(), 3);
        assert!(state.advance(Duration::from_secs(1)));
        assert_eq!(state.current_page(), 4);
    }

    #[test]
    fn test_new_items_reset_page() {
        let mut state = carousel(24);
        state.navigate(PageTarget::Page(2));
        state.set_item_count(12);
        assert_eq!(state.current_page(), 0);
        assert_eq!(state.total_pages(), 3);
    }

    #[test]
    fn test_offset() {
        let layout = CarouselLayout::default();
        let mut state = carousel(24);
        assert_eq!(state.offset(&layout), 6.0);
        state.navigate(PageTarget::Page(2));
        assert_eq!(state.offset(&layout), 2.0 * 320.0 * 4.0 + 6.0);
    }
}
