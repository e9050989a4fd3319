//! Rotating strip of game cards for the current scope

use std::borrow::Cow;
use std::time::Duration;

use egui::{Align, Color32, Image, ImageSource, Layout, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use sv_core::{CarouselLayout, CarouselState, DashboardEvent, PageTarget, PublisherKey, SelectionState};
use sv_data::{top_games, GameFilter, GameRecord, GameRef, PublisherScope};
use sv_ui::widgets::icon_button;
use sv_ui::{indexed_id, scoped_id};
use uuid::Uuid;

use crate::colors::SELECTED_COLOR;
use crate::format::{long_date, price, review_summary, thousands};
use crate::{DashboardView, ViewId, ViewerContext};

/// Seconds the strip takes to slide to a new page
const SLIDE_SECONDS: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct CardListConfig {
    /// Number of games in the strip
    pub limit: usize,
    /// Preferred card geometry; the width shrinks to fit the panel
    pub layout: CarouselLayout,
    pub rotate_every: Duration,
}

impl Default for CardListConfig {
    fn default() -> Self {
        Self {
            limit: 24,
            layout: CarouselLayout::default(),
            rotate_every: Duration::from_secs(5),
        }
    }
}

/// Heading for the card strip.
pub fn card_list_title(publisher: Option<&PublisherKey>) -> String {
    match publisher {
        None => "Top Games".to_string(),
        Some(PublisherKey::Indie) => "Top Indie Games".to_string(),
        Some(PublisherKey::Named(name)) => format!("Top Games by {name}"),
    }
}

/// Layout with the card width fitted so one page fills `available` pixels.
pub fn fit_layout(preferred: &CarouselLayout, available: f32) -> CarouselLayout {
    let per_page = preferred.cards_per_page.max(1) as f32;
    let gaps = preferred.card_margin * (per_page - 1.0) + preferred.inset * 2.0;
    let fitted = ((available - gaps) / per_page).max(80.0);
    CarouselLayout {
        card_width: fitted.min(preferred.card_width),
        ..*preferred
    }
}

/// Header artwork for a card, loaded through the installed image loaders.
pub fn card_image(game: &GameRecord) -> Option<ImageSource<'static>> {
    let url = game.header_image.as_deref().map(str::trim).filter(|url| !url.is_empty())?;
    Some(ImageSource::Uri(Cow::Owned(url.to_string())))
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    revision: u64,
    publisher: Option<PublisherKey>,
    peak_threshold: f64,
    show_indie: bool,
}

pub struct CardListView {
    id: ViewId,
    title: String,
    config: CardListConfig,
    carousel: CarouselState,
    games: Vec<GameRef>,
    cache_key: Option<CacheKey>,
    hovered: bool,
}

impl CardListView {
    pub fn new(config: CardListConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: card_list_title(None),
            carousel: CarouselState::new(config.layout.cards_per_page, config.rotate_every),
            config,
            games: Vec::new(),
            cache_key: None,
            hovered: false,
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext, selection: &SelectionState) {
        let key = CacheKey {
            revision: ctx.dataset.revision(),
            publisher: selection.selected_publisher.clone(),
            peak_threshold: selection.peak_threshold,
            show_indie: selection.show_indie,
        };
        if self.cache_key.as_ref() == Some(&key) {
            return;
        }

        let games = ctx.dataset.filtered_games();
        let scope = PublisherScope::from_key(selection.selected_publisher.as_ref());
        let filter = GameFilter::from_selection(selection);
        self.games = top_games(&games, &scope, &filter, self.config.limit);
        self.title = card_list_title(selection.selected_publisher.as_ref());
        self.carousel.set_item_count(self.games.len());
        self.cache_key = Some(key);
    }

    fn header_ui(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.strong(&self.title);
            ui.separator();

            let pages = self.carousel.total_pages();
            if pages > 1 {
                if icon_button(ui, "◀", "Previous page").clicked() {
                    self.carousel.navigate_manually(PageTarget::Left);
                }
                for page in 0..pages {
                    let dot = if page == self.carousel.current_page() { "●" } else { "○" };
                    if ui.small_button(dot).clicked() {
                        self.carousel.navigate_manually(PageTarget::Page(page));
                    }
                }
                if icon_button(ui, "▶", "Next page").clicked() {
                    self.carousel.navigate_manually(PageTarget::Right);
                }
            }
            if self.carousel.is_paused() {
                ui.label(RichText::new("paused").weak().small());
            }
        });
    }

    fn card_ui(ui: &mut Ui, game: &GameRef, selected: bool) {
        if let Some(source) = card_image(game) {
            ui.add(
                Image::new(source)
                    .max_width(ui.available_width())
                    .rounding(Rounding::same(4.0)),
            );
            ui.add_space(4.0);
        }
        ui.label(RichText::new(&game.name).strong().size(15.0));
        ui.label(RichText::new(&game.publisher_field).weak());
        ui.add_space(4.0);
        ui.label(price(game.price));
        ui.label(format!("Peak players: {}", thousands(game.peak_ccu)));
        ui.label(review_summary(game.positive, game.negative));
        ui.label(format!("Released {}", long_date(game.release_date)));
        ui.add_space(4.0);
        ui.hyperlink_to("Store page", game.store_url());
        if selected {
            ui.label(RichText::new("Selected").color(SELECTED_COLOR).small());
        }
    }
}

impl Default for CardListView {
    fn default() -> Self {
        Self::new(CardListConfig::default())
    }
}

impl DashboardView for CardListView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn view_type(&self) -> &str {
        "CardListView"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn on_frame_update(&mut self, _ctx: &ViewerContext, dt: Duration) {
        if self.carousel.advance(dt) {
            tracing::trace!(page = self.carousel.current_page(), "carousel rotated");
        }
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        if !ctx.dataset.is_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label("Loading...");
            });
            return;
        }

        let selection = ctx.selection.snapshot();
        self.rebuild(ctx, &selection);
        self.header_ui(ui);

        if self.games.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No games match the current filters");
            });
            return;
        }

        let size = ui.available_size().max(Vec2::new(100.0, 80.0));
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let layout = fit_layout(&self.config.layout, rect.width());

        let hovered = ui.rect_contains_pointer(rect);
        if hovered != self.hovered {
            if hovered {
                self.carousel.pause();
            } else {
                self.carousel.resume();
            }
            self.hovered = hovered;
        }

        let target = self.carousel.offset(&layout);
        let offset = ui
            .ctx()
            .animate_value_with_time(scoped_id(self.id, "strip_offset"), target, SLIDE_SECONDS);
        let shift = offset - layout.inset;
        let stride = layout.card_width + layout.card_margin;

        ui.painter().rect_filled(rect, Rounding::same(4.0), Color32::from_gray(20));

        let mut clicked = None;
        for (index, game) in self.games.iter().enumerate() {
            let left = rect.min.x + layout.inset + index as f32 * stride - shift;
            let card_rect = Rect::from_min_size(
                egui::pos2(left, rect.min.y + layout.inset),
                Vec2::new(layout.card_width, rect.height() - layout.inset * 2.0),
            );
            if !card_rect.intersects(rect) {
                continue;
            }

            let selected = selection.selected_game == Some(game.app_id);
            let response = ui.interact(card_rect, indexed_id(self.id, "card", index), Sense::click());
            let stroke = if selected {
                Stroke::new(2.0, SELECTED_COLOR)
            } else if response.hovered() {
                Stroke::new(1.5, ui.visuals().selection.stroke.color)
            } else {
                Stroke::new(1.0, Color32::from_gray(60))
            };

            let mut child = ui.child_ui(card_rect.shrink(8.0), Layout::top_down(Align::LEFT));
            child.set_clip_rect(card_rect.intersect(rect));
            child.painter().rect(card_rect, Rounding::same(6.0), Color32::from_gray(32), stroke);
            Self::card_ui(&mut child, game, selected);

            if response.clicked() {
                clicked = Some(game.app_id);
            }
        }

        if let Some(app_id) = clicked {
            self.carousel.pause();
            ctx.emit(DashboardEvent::GameSelected(Some(app_id)));
        }

        if self.carousel.total_pages() > 1 {
            ui.ctx().request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use sv_core::AppId;
    use sv_data::GameClass;

    use super::*;

    fn game(header_image: Option<&str>) -> GameRef {
        Arc::new(GameRecord {
            app_id: AppId(730),
            name: "Counter-Strike 2".to_string(),
            publisher_field: "Valve".to_string(),
            release_date: NaiveDate::from_ymd_opt(2012, 8, 21).unwrap(),
            price: 0.0,
            peak_ccu: 1_000_000.0,
            positive: 7_000_000.0,
            negative: 1_000_000.0,
            review_ratio: 0.875,
            class: GameClass::Other("AAA".to_string()),
            header_image: header_image.map(str::to_string),
            revenue: None,
        })
    }

    #[test]
    fn test_card_image_uses_header_image() {
        let url = "https://cdn.akamai.steamstatic.com/steam/apps/730/header.jpg";
        match card_image(&game(Some(url))) {
            Some(ImageSource::Uri(uri)) => assert_eq!(uri, url),
            other => panic!("unexpected image source: {other:?}"),
        }
        assert!(card_image(&game(None)).is_none());
        assert!(card_image(&game(Some("  "))).is_none());
    }

    #[test]
    fn test_titles_follow_scope() {
        assert_eq!(card_list_title(None), "Top Games");
        assert_eq!(card_list_title(Some(&PublisherKey::Indie)), "Top Indie Games");
        assert_eq!(card_list_title(Some(&PublisherKey::named("Valve"))), "Top Games by Valve");
    }

    #[test]
    fn test_fit_layout_shrinks_cards() {
        let preferred = CarouselLayout::default();
        let fitted = fit_layout(&preferred, 800.0);
        assert_eq!(fitted.card_width, (800.0 - 60.0 - 12.0) / 4.0);
        assert_eq!(fitted.cards_per_page, 4);
    }

    #[test]
    fn test_fit_layout_keeps_preferred_width_on_wide_panels() {
        let preferred = CarouselLayout::default();
        assert_eq!(fit_layout(&preferred, 5000.0).card_width, 300.0);
    }
}
