#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rampart adapters.
//!
//! Adapters assemble a [`FrameSnapshot`] from world queries once per frame
//! and hand it to a [`RenderingBackend`]. The snapshot is declarative and
//! read-only; nothing in this crate can reach back into the simulation.
//!
//! The text presenter in the CLI adapter only consumes the snapshot types.
//! [`RenderingBackend`], [`FrameInput`], [`Presentation`], and
//! [`Color::lighten`] are the forward contract a windowed backend plugs
//! into; they are kept here so such a backend needs no changes to the
//! simulation crates.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use rampart_core::{EnemyKind, Rect, TowerKind};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Body color used when drawing an enemy of the given kind.
#[must_use]
pub const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Normal => Color::from_rgb_u8(0x2f, 0x95, 0x32),
        EnemyKind::Badass => Color::from_rgb_u8(0xc8, 0x2a, 0x36),
        EnemyKind::Bat => Color::from_rgb_u8(0x58, 0x47, 0xff),
    }
}

/// Fill color used when drawing a tower of the given kind.
#[must_use]
pub const fn tower_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::Fire => Color::from_rgb_u8(0xe2, 0x5a, 0x1c),
        TowerKind::Ice => Color::from_rgb_u8(0x3c, 0x8d, 0xd8),
        TowerKind::Earth => Color::from_rgb_u8(0x7a, 0x55, 0x2e),
    }
}

/// Input snapshot gathered by adapters before updating the frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in screen coordinates, if the pointer is on screen.
    pub pointer: Option<Vec2>,
    /// Whether the adapter detected a pointer press on this frame.
    pub clicked: bool,
    /// Whether the adapter detected a pause key press on this frame.
    pub pause_pressed: bool,
}

/// Axis-aligned rectangle expressed for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPresentation {
    /// Top-left corner of the rectangle.
    pub min: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

impl RectPresentation {
    /// Converts a simulation rectangle into its drawable form.
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self {
            min: Vec2::new(rect.x, rect.y),
            size: Vec2::new(rect.width, rect.height),
        }
    }
}

/// Labeled button drawn on menu-like screens.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonPresentation {
    /// Text drawn inside the button.
    pub label: String,
    /// Rectangle occupied by the button.
    pub rect: RectPresentation,
}

impl ButtonPresentation {
    /// Creates a new button descriptor.
    #[must_use]
    pub fn new<T>(label: T, rect: RectPresentation) -> Self
    where
        T: Into<String>,
    {
        Self {
            label: label.into(),
            rect,
        }
    }
}

/// One map tile ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Rectangle occupied by the tile.
    pub rect: RectPresentation,
    /// Fill color of the tile.
    pub color: Color,
    /// Indicates the tile is the current selection and should stand out.
    pub highlighted: bool,
}

/// One live enemy ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Center of the enemy on screen.
    pub center: Vec2,
    /// Side length of the square body.
    pub extent: f32,
    /// Body color.
    pub color: Color,
    /// Remaining health as a fraction of the maximum, in 0.0..=1.0.
    pub health_fraction: f32,
}

impl EnemyPresentation {
    /// Creates a new enemy descriptor.
    ///
    /// Returns an error when the health fraction leaves the unit interval.
    pub fn new(
        center: Vec2,
        extent: f32,
        color: Color,
        health_fraction: f32,
    ) -> Result<Self, RenderingError> {
        if !(0.0..=1.0).contains(&health_fraction) {
            return Err(RenderingError::InvalidHealthFraction {
                fraction: health_fraction,
            });
        }
        Ok(Self {
            center,
            extent,
            color,
            health_fraction,
        })
    }
}

/// One placed tower ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Center of the tower on screen.
    pub center: Vec2,
    /// Effective targeting radius, drawn as a range ring.
    pub range: f32,
    /// Fill color keyed by the tower kind.
    pub color: Color,
    /// Indicates the tower is cooling and should be drawn dimmed.
    pub cooling: bool,
}

/// One floating damage number ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecalPresentation {
    /// Position of the number on screen.
    pub position: Vec2,
    /// Damage amount to display.
    pub amount: u32,
}

/// Session counters drawn along the top of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Current score.
    pub score: u32,
    /// Wave being resolved.
    pub wave: u32,
    /// Enemies still waiting in the spawn queue.
    pub pending_spawns: u32,
}

/// Everything visible while a session runs.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Map tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Live enemies in release order.
    pub enemies: Vec<EnemyPresentation>,
    /// Placed towers.
    pub towers: Vec<TowerPresentation>,
    /// Floating damage numbers.
    pub decals: Vec<DecalPresentation>,
    /// Side-panel buttons for construction and upgrades.
    pub panel: Vec<ButtonPresentation>,
    /// Session counters.
    pub hud: HudPresentation,
    /// Tooltip under the pointer, if one applies.
    pub tooltip: Option<String>,
}

/// Frame contract assembled once per frame from world queries.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameSnapshot {
    /// Title screen with its buttons.
    Menu {
        /// Buttons drawn in the screen center.
        buttons: Vec<ButtonPresentation>,
    },
    /// Help pages with navigation buttons.
    Help {
        /// Zero-based page currently shown.
        page: usize,
        /// Total number of pages.
        page_count: usize,
        /// Navigation buttons.
        buttons: Vec<ButtonPresentation>,
    },
    /// Running session.
    Playing {
        /// Board content.
        board: BoardPresentation,
    },
    /// Suspended session with the pause overlay.
    Paused {
        /// Board content drawn dimmed behind the overlay.
        board: BoardPresentation,
        /// Overlay buttons.
        buttons: Vec<ButtonPresentation>,
    },
    /// Wave summary awaiting acknowledgement.
    Cleared {
        /// Board content drawn behind the summary.
        board: BoardPresentation,
        /// Wave that was resolved.
        wave: u32,
        /// Continue button.
        buttons: Vec<ButtonPresentation>,
    },
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Frame content that should be displayed.
    pub frame: FrameSnapshot,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, frame: FrameSnapshot) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            frame,
        }
    }
}

/// Rendering backend capable of presenting Rampart frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The `update_frame` closure receives the simulated frame delta and the
    /// input captured by the adapter, and replaces the frame snapshot before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut FrameSnapshot) + 'static;
}

/// Errors that can occur when constructing frame descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Health fractions must stay inside the unit interval.
    #[error("health fraction must lie in 0.0..=1.0 (received {fraction})")]
    InvalidHealthFraction {
        /// Provided fraction that failed validation.
        fraction: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_presentation_accepts_unit_interval_fractions() {
        let enemy = EnemyPresentation::new(
            Vec2::new(75.0, 125.0),
            30.0,
            enemy_color(EnemyKind::Normal),
            0.4,
        )
        .expect("fraction inside the unit interval");
        assert!((enemy.health_fraction - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn enemy_presentation_rejects_out_of_range_fractions() {
        let error = EnemyPresentation::new(
            Vec2::ZERO,
            30.0,
            enemy_color(EnemyKind::Bat),
            1.5,
        )
        .expect_err("fraction above one must be rejected");
        assert_eq!(
            error,
            RenderingError::InvalidHealthFraction { fraction: 1.5 }
        );
    }

    #[test]
    fn lighten_clamps_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(2.0);
        assert!((color.red - 1.0).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rect_presentation_preserves_geometry() {
        let rect = RectPresentation::from_rect(Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(rect.min, Vec2::new(50.0, 50.0));
        assert_eq!(rect.size, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn enemy_kinds_use_distinct_colors() {
        assert_ne!(enemy_color(EnemyKind::Normal), enemy_color(EnemyKind::Badass));
        assert_ne!(enemy_color(EnemyKind::Badass), enemy_color(EnemyKind::Bat));
    }
}
