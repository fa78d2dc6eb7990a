//! Fixed screen layout: button rectangles and per-state hit testing.
//!
//! Tile hit testing lives with the map; this module covers everything else a
//! click can land on.

use rampart_core::{GameState, Position, Rect, TowerKind, UpgradeStat};

/// Full screen width, in pixels.
pub const SCREEN_WIDTH: f32 = 700.0;
/// Full screen height, in pixels.
pub const SCREEN_HEIGHT: f32 = 500.0;

const BUTTON_WIDTH: f32 = 160.0;
const BUTTON_HEIGHT: f32 = 40.0;
const PANEL_ICON_LENGTH: f32 = 50.0;
const PANEL_X: f32 = 625.0;

/// Interactive region a click or hover can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRegion {
    /// Menu: starts a fresh session.
    Start,
    /// Menu: opens the help pages.
    Help,
    /// Menu: requests application exit.
    Quit,
    /// Paused: returns to the running session.
    Resume,
    /// Paused: abandons the session and returns to the menu.
    MainMenu,
    /// Help: flips to the previous page.
    PrevPage,
    /// Help: flips to the next page.
    NextPage,
    /// Help: returns to the menu.
    Back,
    /// Cleared: acknowledges the wave summary and resumes play.
    Continue,
    /// Side panel: selects a tower kind for construction.
    TowerOption(TowerKind),
    /// Side panel: purchases an upgrade for the selected tower's kind.
    Upgrade(UpgradeStat),
}

/// Immutable rectangle table for the standard screen.
#[derive(Clone, Debug)]
pub struct Layout {
    regions: Vec<(HitRegion, Rect)>,
}

impl Layout {
    /// Builds the standard layout.
    pub fn standard() -> Self {
        let button = |x: f32, y: f32| Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT);
        let icon = |y: f32| Rect::new(PANEL_X, y, PANEL_ICON_LENGTH, PANEL_ICON_LENGTH);
        let regions = vec![
            (HitRegion::Start, button(270.0, 180.0)),
            (HitRegion::Help, button(270.0, 230.0)),
            (HitRegion::Quit, button(270.0, 280.0)),
            (HitRegion::Resume, button(270.0, 200.0)),
            (HitRegion::MainMenu, button(270.0, 250.0)),
            (HitRegion::PrevPage, Rect::new(30.0, 230.0, 40.0, 40.0)),
            (HitRegion::NextPage, Rect::new(630.0, 230.0, 40.0, 40.0)),
            (HitRegion::Back, Rect::new(10.0, 10.0, 100.0, 30.0)),
            (HitRegion::Continue, button(270.0, 264.0)),
            (HitRegion::TowerOption(TowerKind::Fire), icon(60.0)),
            (HitRegion::TowerOption(TowerKind::Ice), icon(115.0)),
            (HitRegion::TowerOption(TowerKind::Earth), icon(170.0)),
            (HitRegion::Upgrade(UpgradeStat::Damage), icon(240.0)),
            (HitRegion::Upgrade(UpgradeStat::Range), icon(290.0)),
            (HitRegion::Upgrade(UpgradeStat::Rate), icon(340.0)),
        ];
        Self { regions }
    }

    /// Rectangle backing the region, for tooltips and rendering.
    pub fn region_rect(&self, region: HitRegion) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(candidate, _)| *candidate == region)
            .map(|(_, rect)| *rect)
    }

    /// Resolves the point to the region active in the current state, if any.
    ///
    /// Regions belonging to other states never match, so overlapping
    /// rectangles across states are harmless.
    pub fn hit_test(&self, state: GameState, point: Position) -> Option<HitRegion> {
        self.regions
            .iter()
            .filter(|(region, _)| region_active(*region, state))
            .find(|(_, rect)| rect.contains(point))
            .map(|(region, _)| *region)
    }
}

fn region_active(region: HitRegion, state: GameState) -> bool {
    match region {
        HitRegion::Start | HitRegion::Help | HitRegion::Quit => state == GameState::Menu,
        HitRegion::Resume | HitRegion::MainMenu => state == GameState::Paused,
        HitRegion::PrevPage | HitRegion::NextPage | HitRegion::Back => state == GameState::Help,
        HitRegion::Continue => state == GameState::Cleared,
        HitRegion::TowerOption(_) | HitRegion::Upgrade(_) => state == GameState::InGame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_of(layout: &Layout, region: HitRegion) -> Position {
        layout.region_rect(region).expect("region rect").center()
    }

    #[test]
    fn menu_buttons_only_resolve_in_menu() {
        let layout = Layout::standard();
        let point = center_of(&layout, HitRegion::Start);
        assert_eq!(
            layout.hit_test(GameState::Menu, point),
            Some(HitRegion::Start)
        );
        assert_eq!(layout.hit_test(GameState::InGame, point), None);
    }

    #[test]
    fn overlapping_rectangles_disambiguate_by_state() {
        let layout = Layout::standard();
        // Resume and Help overlap near (270, 230..240).
        let point = Position::new(280.0, 235.0);
        assert_eq!(
            layout.hit_test(GameState::Menu, point),
            Some(HitRegion::Help)
        );
        assert_eq!(
            layout.hit_test(GameState::Paused, point),
            Some(HitRegion::Resume)
        );
    }

    #[test]
    fn panel_icons_resolve_while_playing() {
        let layout = Layout::standard();
        let fire = center_of(&layout, HitRegion::TowerOption(TowerKind::Fire));
        assert_eq!(
            layout.hit_test(GameState::InGame, fire),
            Some(HitRegion::TowerOption(TowerKind::Fire))
        );
        let rate = center_of(&layout, HitRegion::Upgrade(UpgradeStat::Rate));
        assert_eq!(
            layout.hit_test(GameState::InGame, rate),
            Some(HitRegion::Upgrade(UpgradeStat::Rate))
        );
    }

    #[test]
    fn empty_space_resolves_to_nothing() {
        let layout = Layout::standard();
        assert_eq!(
            layout.hit_test(GameState::InGame, Position::new(1.0, 490.0)),
            None
        );
    }
}
