//! Fixed screen geometry and colours of the play screen.

use crate::models::engine::Direction;
use crate::models::error::RenderError;
use image::Rgba;

pub const SCREEN_MARGIN: u32 = 4;
pub const PADDING_X: u32 = 4;
pub const PADDING_Y: u32 = 6;
pub const TOP_ROW_HEIGHT: u32 = 21;
pub const LEFT_COLUMN_WIDTH: u32 = 48;
pub const STATUS_BOX_PADDING: u32 = 2;
pub const SCORE_HEIGHT: u32 = 22;
pub const THERMOMETER_HEIGHT: u32 = 22;
pub const LANE_GAP: u32 = PADDING_X / 2;

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Three-tone palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub light: Rgba<u8>,
    pub medium: Rgba<u8>,
    pub dark: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light: Rgba([157, 179, 107, 255]),
            medium: Rgba([111, 127, 75, 255]),
            dark: Rgba([59, 74, 44, 255]),
        }
    }
}

/// Where every region of the play screen sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Dark frame inside the screen margin.
    pub container: Rect,
    /// Drummer animation strip.
    pub drummer: Rect,
    /// Four lanes with receptors at the bottom.
    pub track: Rect,
    pub score: Rect,
    pub health: Rect,
    pub illustration: Rect,
    pub lane_width: u32,
}

impl ScreenLayout {
    pub fn new(screen_width: u32, screen_height: u32) -> Result<Self, RenderError> {
        let too_small = RenderError::ScreenTooSmall {
            width: screen_width,
            height: screen_height,
        };

        let container_width = screen_width.checked_sub(SCREEN_MARGIN * 2);
        let container_height = screen_height.checked_sub(SCREEN_MARGIN * 2);
        let inner_width = container_width.and_then(|w| w.checked_sub(PADDING_X * 2));
        let inner_height = container_height
            .and_then(|h| h.checked_sub(PADDING_Y * 3 + TOP_ROW_HEIGHT));
        let track_width = inner_width.and_then(|w| w.checked_sub(PADDING_Y + LEFT_COLUMN_WIDTH));
        let illustration_height = inner_height.and_then(|h| {
            h.checked_sub(SCORE_HEIGHT + THERMOMETER_HEIGHT + PADDING_Y * 2)
        });

        let (
            Some(container_width),
            Some(container_height),
            Some(inner_width),
            Some(inner_height),
            Some(track_width),
            Some(illustration_height),
        ) = (
            container_width,
            container_height,
            inner_width,
            inner_height,
            track_width,
            illustration_height,
        )
        else {
            return Err(too_small);
        };

        let lane_width = track_width.saturating_sub(LANE_GAP * 3) / 4;
        // Receptors must fit an arrow glyph plus a border.
        if lane_width < 9 || illustration_height == 0 || lane_width * 2 > inner_height {
            return Err(too_small);
        }

        let origin_x = SCREEN_MARGIN;
        let origin_y = SCREEN_MARGIN;
        let body_y = origin_y + TOP_ROW_HEIGHT + PADDING_Y * 2;
        let status_x = origin_x + PADDING_X + track_width + PADDING_Y;

        Ok(Self {
            screen_width,
            screen_height,
            container: Rect::new(origin_x, origin_y, container_width, container_height),
            drummer: Rect::new(origin_x + PADDING_X, origin_y + PADDING_Y, inner_width, TOP_ROW_HEIGHT),
            track: Rect::new(origin_x + PADDING_X, body_y, track_width, inner_height),
            score: Rect::new(status_x, body_y, LEFT_COLUMN_WIDTH, SCORE_HEIGHT),
            health: Rect::new(
                status_x,
                body_y + SCORE_HEIGHT + PADDING_Y,
                LEFT_COLUMN_WIDTH,
                THERMOMETER_HEIGHT,
            ),
            illustration: Rect::new(
                status_x,
                body_y + SCORE_HEIGHT + THERMOMETER_HEIGHT + PADDING_Y * 2,
                LEFT_COLUMN_WIDTH,
                illustration_height,
            ),
            lane_width,
        })
    }

    /// Lane column of `direction`, in screen pixels.
    pub fn lane(&self, direction: Direction) -> Rect {
        let index = direction.lane() as u32;
        Rect::new(
            self.track.x + index * (self.lane_width + LANE_GAP),
            self.track.y,
            self.lane_width,
            self.track.height,
        )
    }

    /// Receptor square at the bottom of a lane.
    pub fn receptor(&self, direction: Direction) -> Rect {
        let lane = self.lane(direction);
        Rect::new(
            lane.x,
            lane.bottom() - self.lane_width,
            self.lane_width,
            self.lane_width,
        )
    }

    /// Top of a moving note for a normalized progress, relative to the track.
    ///
    /// At `hit_line` the note covers the receptor exactly; at 0 it sits just
    /// above the track.
    pub fn note_offset_y(&self, progress: f64, hit_line: f64) -> i64 {
        let travel = if hit_line > 0.0 { progress / hit_line } else { 1.0 };
        (travel * self.track.height as f64).round() as i64 - self.lane_width as i64
    }
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            screen_width: 160,
            screen_height: 144,
            container: Rect::new(4, 4, 152, 136),
            drummer: Rect::new(8, 10, 144, 21),
            track: Rect::new(8, 37, 90, 97),
            score: Rect::new(104, 37, 48, 22),
            health: Rect::new(104, 65, 48, 22),
            illustration: Rect::new(104, 93, 48, 41),
            lane_width: 21,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_screen_matches_computed_layout() {
        let layout = ScreenLayout::new(160, 144).unwrap();
        assert_eq!(layout, ScreenLayout::default());
    }

    #[test]
    fn regions_are_inside_container_and_disjoint() {
        let layout = ScreenLayout::new(160, 144).unwrap();
        let regions = [
            layout.drummer,
            layout.track,
            layout.score,
            layout.health,
            layout.illustration,
        ];
        for (i, a) in regions.iter().enumerate() {
            assert!(layout.container.contains(a), "{:?} outside container", a);
            for b in &regions[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn lanes_fit_the_track() {
        let layout = ScreenLayout::default();
        assert_eq!(layout.lane(Direction::Left).x, 8);
        assert_eq!(layout.lane(Direction::Right).right(), 8 + 21 * 4 + 6);
        assert!(layout.lane(Direction::Right).right() <= layout.track.right());
        assert_eq!(layout.receptor(Direction::Up).bottom(), layout.track.bottom());
    }

    #[test]
    fn note_reaches_receptor_on_hit_line() {
        let layout = ScreenLayout::default();
        let y = layout.note_offset_y(2.0 / 3.0, 2.0 / 3.0);
        assert_eq!(y, 97 - 21);
        assert_eq!(layout.note_offset_y(0.0, 2.0 / 3.0), -21);
    }

    #[test]
    fn tiny_screen_is_rejected() {
        assert!(matches!(
            ScreenLayout::new(64, 64),
            Err(RenderError::ScreenTooSmall { width: 64, height: 64 })
        ));
    }
}
