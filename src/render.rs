use std::cmp::{max, min};

use macroquad::prelude::*;

use crate::game::{GameState, Status};
use crate::grid::{COLS, ROWS};
use crate::tetromino::Tetromino;
use crate::updater::FrameStats;

const FIELD_COLOR: Color = Color::new(3.0 / 255.0, 25.0 / 255.0, 42.0 / 255.0, 1.0);
const PANEL_COLOR: Color = Color::new(0.0, 31.0 / 255.0, 73.0 / 255.0, 1.0);
const PANEL_BORDER: f32 = 5.0;
const GHOST_ALPHA: f32 = 0.3;

/// Share of the window width given to the play field.
const FIELD_SHARE: f32 = 0.62;
const LABEL_SIZE: u16 = 30;
const DIAGNOSTICS_SIZE: u16 = 16;

/// `mm:ss`, minutes capped at 99.
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0) as u32;
    let secs = (seconds - f64::from(minutes) * 60.0) as u32;
    format!("{:02}:{:02}", minutes.min(99), secs)
}

/// Draws one frame: the play field on the left, NEXT / SCORE / BEST / TIME
/// panes on the right, diagnostics and overlays on top.
pub fn draw_game(game: &GameState, stats: &FrameStats, font: Option<&Font>) {
    clear_background(BLACK);

    let tile = (screen_width() * FIELD_SHARE / COLS as f32).min(screen_height() / ROWS as f32);
    let field_w = tile * COLS as f32;
    let field_h = tile * ROWS as f32;
    draw_field(game, 0.0, 0.0, tile);

    let pane_x = field_w;
    let pane_w = screen_width() - field_w;
    let pane_h = field_h / 4.0;
    draw_pane(pane_x, 0.0, pane_w, pane_h, "NEXT", font);
    draw_preview(game.next_piece(), pane_x, 0.0, pane_w, pane_h, tile);

    let panes = [
        ("SCORE", game.score().to_string()),
        ("BEST", game.best_score().to_string()),
        ("TIME", format_time(game.time())),
    ];
    for (i, (title, value)) in panes.iter().enumerate() {
        let y = pane_h * (i + 1) as f32;
        draw_pane(pane_x, y, pane_w, pane_h, title, font);
        draw_centered(value, pane_x + pane_w / 2.0, y + pane_h * 0.65, LABEL_SIZE, WHITE, font);
    }

    let diagnostics = format!(
        "FPS: {} | Ticks: {} | Lines: {}",
        stats.fps,
        stats.ticks,
        game.lines_cleared()
    );
    draw_text_ex(
        &diagnostics,
        4.0,
        field_h - 4.0,
        TextParams {
            font,
            font_size: DIAGNOSTICS_SIZE,
            color: GRAY,
            ..Default::default()
        },
    );

    match game.status() {
        Status::Paused => draw_overlay("PAUSED", None, field_w, field_h, font),
        Status::GameOver => draw_overlay("GAME OVER", Some("Press R to restart"), field_w, field_h, font),
        Status::Playing => {}
    }
}

/// Locked cells, the landing ghost, the falling piece, then grid lines.
fn draw_field(game: &GameState, origin_x: f32, origin_y: f32, tile: f32) {
    draw_rectangle(origin_x, origin_y, tile * COLS as f32, tile * ROWS as f32, FIELD_COLOR);

    for (row, cells) in game.grid().rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(color) = cell {
                draw_block(origin_x + col as f32 * tile, origin_y + row as f32 * tile, tile, *color);
            }
        }
    }

    if game.status() != Status::GameOver {
        let current = game.current_piece();
        let ghost = game.landing_position();
        let ghost_color = Color { a: GHOST_ALPHA, ..current.color() };
        for (row, col) in ghost.cells().filter(|&(row, _)| row >= 0) {
            draw_rectangle(origin_x + col as f32 * tile, origin_y + row as f32 * tile, tile, tile, ghost_color);
        }
        for (row, col) in current.cells().filter(|&(row, _)| row >= 0) {
            draw_block(origin_x + col as f32 * tile, origin_y + row as f32 * tile, tile, current.color());
        }
    }

    for row in 0..ROWS {
        for col in 0..COLS {
            draw_rectangle_lines(
                origin_x + col as f32 * tile,
                origin_y + row as f32 * tile,
                tile,
                tile,
                1.0,
                BLACK,
            );
        }
    }
}

fn draw_pane(x: f32, y: f32, w: f32, h: f32, title: &str, font: Option<&Font>) {
    draw_rectangle(x, y, w, h, PANEL_COLOR);
    draw_rectangle_lines(x, y, w, h, PANEL_BORDER * 2.0, BLUE);
    draw_centered(title, x + w / 2.0, y + PANEL_BORDER + LABEL_SIZE as f32, LABEL_SIZE, WHITE, font);
}

fn draw_centered(text: &str, center_x: f32, baseline: f32, size: u16, color: Color, font: Option<&Font>) {
    let measure = measure_text(text, font, size, 1.0);
    draw_text_ex(
        text,
        center_x - measure.width / 2.0,
        baseline,
        TextParams {
            font,
            font_size: size,
            color,
            ..Default::default()
        },
    );
}

fn draw_overlay(title: &str, hint: Option<&str>, w: f32, h: f32, font: Option<&Font>) {
    draw_rectangle(0.0, 0.0, w, h, Color::new(0.0, 0.0, 0.0, 0.6));
    draw_centered(title, w / 2.0, h / 2.0, 40, YELLOW, font);
    if let Some(hint) = hint {
        draw_centered(hint, w / 2.0, h / 2.0 + 36.0, 20, WHITE, font);
    }
}

fn draw_block(x: f32, y: f32, size: f32, color: Color) {
    draw_rectangle(x, y, size, size, color);
    let highlight = Color::new(
        (color.r + 0.4).min(1.0),
        (color.g + 0.4).min(1.0),
        (color.b + 0.4).min(1.0),
        1.0,
    );
    let shadow = Color::new(color.r * 0.5, color.g * 0.5, color.b * 0.5, 1.0);
    let border = size * 0.15;
    draw_rectangle(x, y, size, border, highlight);
    draw_rectangle(x, y, border, size, highlight);
    draw_rectangle(x, y + size - border, size, border, shadow);
    draw_rectangle(x + size - border, y, border, size, shadow);
}

/// Draws `piece` centered in the lower part of a pane, ignoring its anchor.
fn draw_preview(piece: &Tetromino, pane_x: f32, pane_y: f32, pane_w: f32, pane_h: f32, tile: f32) {
    let shape = piece.shape();
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for &[bx, by] in shape.iter() {
        min_x = min(min_x, bx);
        min_y = min(min_y, by);
        max_x = max(max_x, bx);
        max_y = max(max_y, by);
    }
    let shape_w = (max_x - min_x + 1) as f32 * tile;
    let shape_h = (max_y - min_y + 1) as f32 * tile;
    let top = pane_y + LABEL_SIZE as f32 + PANEL_BORDER;
    let offset_x = pane_x + (pane_w - shape_w) / 2.0;
    let offset_y = top + (pane_h - (top - pane_y) - shape_h) / 2.0;
    for &[bx, by] in shape.iter() {
        let draw_x = offset_x + (bx - min_x) as f32 * tile;
        let draw_y = offset_y + (by - min_y) as f32 * tile;
        draw_block(draw_x, draw_y, tile, piece.color());
    }
}
