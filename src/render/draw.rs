//! Drawing routines for each layer of the play screen.
//!
//! Everything is procedural: glyphs, arrows and sprites are small built-in
//! bitmaps, so rendering needs no asset files.

use crate::models::engine::Direction;
use crate::models::progress::Mood;
use crate::render::font::{GLYPH_HEIGHT, draw_text};
use crate::render::layout::{PADDING_Y, Palette, Rect, STATUS_BOX_PADDING, ScreenLayout};
use crate::render::surface::Surface;
use crate::state::game::GameplaySnapshot;
use image::Rgba;

pub const THERMOMETER_BLOCKS: u32 = 5;
const BLOCK_WIDTH: u32 = 8;
const BLOCK_HEIGHT: u32 = 5;
const CORNER_SIZE: u32 = 2;
/// Y of the value row inside a status box.
const VALUE_ROW_Y: i64 = 11;
const MAX_DISPLAY_SCORE: u32 = 999_999;

const ARROW_SIZE: u32 = 7;
/// Left-pointing arrow; bit 6 is the leftmost column.
const ARROW_LEFT: [u8; 7] = [0x08, 0x18, 0x3F, 0x7F, 0x3F, 0x18, 0x08];

const ILLUSTRATION_SIZE: u32 = 12;
/// Two beamed eighth notes; bit 11 is the leftmost column.
const ILLUSTRATION: [u16; 12] = [
    0x0FF, 0x0FF, 0x081, 0x081, 0x081, 0x081, 0x081, 0x081, 0x381, 0x787, 0x70F, 0x20E,
];

/// Backdrop drawn once per round: screen background and the dark container.
pub fn draw_static(layout: &ScreenLayout, palette: &Palette) -> Surface {
    let mut surface = Surface::filled(layout.screen_width, layout.screen_height, palette.light);
    surface.fill_area(layout.container, palette.dark);
    surface
}

/// Light box with the dark corner marker shared by every status box.
pub fn status_box(width: u32, height: u32, palette: &Palette) -> Surface {
    let mut surface = Surface::filled(width, height, palette.light);
    surface.fill_rect(
        width.saturating_sub(CORNER_SIZE) as i64,
        0,
        CORNER_SIZE,
        CORNER_SIZE,
        palette.dark,
    );
    surface
}

pub fn draw_score(area: Rect, score: u32, palette: &Palette) -> Surface {
    let mut surface = status_box(area.width, area.height, palette);
    let pad = STATUS_BOX_PADDING as i64;
    draw_text(&mut surface, "SCORE", pad, pad, palette.dark);
    let digits = format!("{:06}", score.min(MAX_DISPLAY_SCORE));
    draw_text(&mut surface, &digits, pad, VALUE_ROW_Y, palette.dark);
    surface
}

/// Thermometer blocks lit for `health`; any non-zero health lights one.
pub fn filled_blocks(health: u32, health_max: u32) -> u32 {
    if health_max == 0 {
        return 0;
    }
    let health = health.min(health_max);
    (health * THERMOMETER_BLOCKS).div_ceil(health_max)
}

pub fn draw_health(area: Rect, health: u32, health_max: u32, palette: &Palette) -> Surface {
    let mut surface = status_box(area.width, area.height, palette);
    let pad = STATUS_BOX_PADDING as i64;
    draw_text(&mut surface, "HEALTH", pad, pad, palette.dark);

    let filled = filled_blocks(health, health_max);
    for i in 0..THERMOMETER_BLOCKS {
        let x = pad + (i * (BLOCK_WIDTH + 1)) as i64;
        if i < filled {
            surface.fill_rect(x, VALUE_ROW_Y, BLOCK_WIDTH, BLOCK_HEIGHT, palette.dark);
        } else {
            surface.fill_rect(x, VALUE_ROW_Y, BLOCK_WIDTH, BLOCK_HEIGHT, palette.medium);
            surface.fill_rect(
                x + 1,
                VALUE_ROW_Y + 1,
                BLOCK_WIDTH - 2,
                BLOCK_HEIGHT - 2,
                palette.light,
            );
        }
    }
    surface
}

pub fn draw_illustration(area: Rect, mood: Mood, palette: &Palette) -> Surface {
    let mut surface = status_box(area.width, area.height, palette);
    let ink = match mood {
        Mood::Light => palette.medium,
        Mood::Dark => {
            surface.fill(palette.medium);
            palette.dark
        }
    };

    let x0 = area.width.saturating_sub(ILLUSTRATION_SIZE) as i64 / 2;
    let y0 = area.height.saturating_sub(ILLUSTRATION_SIZE) as i64 / 2;
    for (row, bits) in ILLUSTRATION.iter().enumerate() {
        for col in 0..ILLUSTRATION_SIZE {
            if bits & (0x800 >> col) != 0 {
                surface.plot(x0 + col as i64, y0 + row as i64, ink);
            }
        }
    }
    surface
}

fn arrow_bit(direction: Direction, x: u32, y: u32) -> bool {
    let last = ARROW_SIZE - 1;
    let (row, col) = match direction {
        Direction::Left => (y, x),
        Direction::Right => (y, last - x),
        Direction::Up => (x, y),
        Direction::Down => (x, last - y),
    };
    ARROW_LEFT[row as usize] & (0x40 >> col) != 0
}

/// Draws a direction arrow centred in a `size` square at `(x, y)`.
pub fn draw_arrow(
    surface: &mut Surface,
    direction: Direction,
    x: i64,
    y: i64,
    size: u32,
    color: Rgba<u8>,
) {
    let inset = size.saturating_sub(ARROW_SIZE) as i64 / 2;
    for ay in 0..ARROW_SIZE {
        for ax in 0..ARROW_SIZE {
            if arrow_bit(direction, ax, ay) {
                surface.plot(x + inset + ax as i64, y + inset + ay as i64, color);
            }
        }
    }
}

/// Draws the lanes, receptors and moving notes into a track-sized surface.
pub fn draw_track(
    track: &mut Surface,
    layout: &ScreenLayout,
    snapshot: &GameplaySnapshot,
    palette: &Palette,
) {
    track.fill(palette.dark);
    let lane_width = layout.lane_width;
    let origin = layout.track;
    let receptor_y = (layout.receptor(Direction::Left).y - origin.y) as i64;

    for direction in Direction::ALL {
        let lane = layout.lane(direction);
        let lane_x = (lane.x - origin.x) as i64;
        track.fill_rect(lane_x, 0, lane_width, lane.height, palette.light);

        let receptor = layout.receptor(direction);
        let (x, y) = ((receptor.x - origin.x) as i64, (receptor.y - origin.y) as i64);
        let (fill, ink) = if snapshot.pressed.contains(direction) {
            (palette.dark, palette.medium)
        } else {
            (palette.medium, palette.light)
        };
        track.fill_rect(x, y, receptor.width, receptor.height, fill);
        draw_arrow(track, direction, x, y, receptor.width, ink);
    }

    // Border above the receptor row.
    let border = (PADDING_Y / 2) as i64;
    track.fill_rect(0, receptor_y - border, track.width(), border as u32, palette.dark);

    for note in &snapshot.active_notes {
        let lane = layout.lane(note.direction);
        let lane_x = (lane.x - origin.x) as i64;
        let y = layout.note_offset_y(note.progress, snapshot.hit_line);
        draw_moving_note(track, note.direction, lane_x, y, lane_width, palette);
    }
}

fn draw_moving_note(
    track: &mut Surface,
    direction: Direction,
    x: i64,
    y: i64,
    size: u32,
    palette: &Palette,
) {
    track.fill_rect(x, y, size, size, palette.medium);
    track.fill_rect(x + 1, y + 1, size - 2, size - 2, palette.dark);
    draw_arrow(track, direction, x, y, size, palette.light);
}

/// Draws the drummer strip with the sprite in `frame` (0 or 1).
pub fn draw_drummer(strip: &mut Surface, frame: usize, palette: &Palette) {
    strip.fill(palette.medium);
    let top = strip.height().saturating_sub(GLYPH_HEIGHT * 2 + 3) as i64 / 2;
    let x = 4;

    // Head and body.
    strip.fill_rect(x + 6, top, 5, 4, palette.dark);
    strip.fill_rect(x + 5, top + 5, 7, 4, palette.dark);
    // Drum.
    strip.fill_rect(x + 2, top + 10, 13, 6, palette.dark);
    strip.fill_rect(x + 2, top + 12, 13, 1, palette.light);

    if frame % 2 == 0 {
        // Sticks down on the drum head.
        strip.fill_rect(x + 3, top + 8, 3, 1, palette.light);
        strip.fill_rect(x + 11, top + 8, 3, 1, palette.light);
    } else {
        // Sticks raised.
        strip.fill_rect(x + 1, top + 2, 1, 5, palette.light);
        strip.fill_rect(x + 15, top + 2, 1, 5, palette.light);
    }
}
