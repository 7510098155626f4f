//! Back-to-front scene composition
//!
//! Everything here reads the game and writes pixels; nothing mutates game
//! state. World coordinates are logical pixels and are scaled to the buffer
//! on the fly, so one frame looks the same at any terminal size.

use super::font::{self, GLYPH_H};
use super::pixbuf::{PixelBuf, Rgb};
use crate::game::{Game, Phase};
use crate::world::{Cloud, Obstacle};

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const SUN: Rgb = Rgb(255, 214, 92);
const SUN_CORE: Rgb = Rgb(255, 246, 200);
const SUN_GLOW: Rgb = Rgb(255, 240, 170);
const CLOUD: Rgb = Rgb(250, 252, 255);
const CLOUD_SHADE: Rgb = Rgb(200, 222, 236);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_FAR_CREST: Rgb = Rgb(146, 212, 96);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const HILL_NEAR_CREST: Rgb = Rgb(118, 192, 70);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const GROUND_EDGE: Rgb = Rgb(60, 120, 40);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_HI: Rgb = Rgb(255, 232, 120);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_BELLY: Rgb = Rgb(222, 160, 40);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Height of each pipe cap and how far it overhangs the body.
const CAP_H: f32 = 20.0;
const CAP_OVERHANG: f32 = 4.0;
/// Vertical bob of the waiting bird (logical px, rad/s).
const BOB_AMPLITUDE: f32 = 6.0;
const BOB_FREQUENCY: f64 = 3.0;

/// World to buffer scale.
struct View {
    sx: f32,
    sy: f32,
}

impl View {
    fn x(&self, wx: f32) -> f32 {
        wx * self.sx
    }

    fn y(&self, wy: f32) -> f32 {
        wy * self.sy
    }
}

/// Draw one frame. `elapsed` drives the periodic animations.
pub fn draw(game: &Game, elapsed: f64, buf: &mut PixelBuf) {
    if buf.is_empty() {
        return;
    }
    let view = View {
        sx: buf.width() as f32 / game.viewport.width,
        sy: buf.height() as f32 / game.viewport.height,
    };

    draw_sky(buf);
    draw_sun(buf, game, &view);
    for cloud in &game.scenery.clouds {
        draw_cloud(buf, cloud, &view);
    }
    draw_hills(buf, game, &view);
    draw_ground(buf, game, &view);
    for obstacle in &game.obstacles {
        draw_obstacle(buf, obstacle, game, &view);
    }
    draw_bird(buf, game, &view, elapsed);
    draw_score(buf, game.score);
    if game.phase != Phase::Running {
        draw_overlay(buf, game);
    }
}

fn ground_top(game: &Game) -> f32 {
    game.viewport.height - game.tuning.ground_height
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.height();
    for y in 0..h {
        let c = SKY_TOP.mix(SKY_BOT, y as f32 / h.saturating_sub(1).max(1) as f32);
        buf.fill_rect(0, y as i32, buf.width() as i32, 1, c);
    }
}

fn draw_sun(buf: &mut PixelBuf, game: &Game, view: &View) {
    let cx = view.x(game.viewport.width * 0.82);
    let cy = view.y(game.viewport.height * 0.2);
    let (rx, ry) = (view.x(30.0), view.y(30.0));
    buf.blend_ellipse(cx, cy, rx * 2.4, ry * 2.4, SUN_GLOW, 0.12);
    buf.blend_ellipse(cx, cy, rx * 1.6, ry * 1.6, SUN_GLOW, 0.22);
    buf.fill_ellipse_with(cx, cy, rx, ry, |u, v| {
        SUN.mix(SUN_CORE, 1.0 - (u * u + v * v))
    });
}

fn draw_cloud(buf: &mut PixelBuf, cloud: &Cloud, view: &View) {
    let w = cloud.width();
    let h = w * 0.45;
    // (x, y, radius) as fractions of the cloud width/height
    let puffs = [(0.28, 0.62, 0.2), (0.5, 0.42, 0.27), (0.72, 0.6, 0.19)];
    for (colour, dy) in [(CLOUD_SHADE, 1.0), (CLOUD, 0.0)] {
        for (fx, fy, fr) in puffs {
            buf.fill_ellipse(
                view.x(cloud.x + w * fx),
                view.y(cloud.y + h * fy) + dy,
                view.x(w * fr),
                view.y(w * fr),
                colour,
            );
        }
        buf.fill_ellipse(
            view.x(cloud.x + w * 0.5),
            view.y(cloud.y + h * 0.72) + dy,
            view.x(w * 0.44),
            view.y(w * 0.14),
            colour,
        );
    }
}

/// A hill silhouette traced by two summed sine waves.
struct Ribbon {
    /// Fraction of the ground scroll applied
    parallax: f64,
    /// Radians per logical pixel
    frequency: f64,
    /// Radians per second of scenery time
    drift: f64,
    base: f32,
    amp: (f32, f32),
    fill: Rgb,
    crest: Rgb,
}

const HILLS: [Ribbon; 2] = [
    Ribbon {
        parallax: 0.2,
        frequency: 0.011,
        drift: 0.3,
        base: 46.0,
        amp: (20.0, 9.0),
        fill: HILL_FAR,
        crest: HILL_FAR_CREST,
    },
    Ribbon {
        parallax: 0.45,
        frequency: 0.019,
        drift: 0.45,
        base: 24.0,
        amp: (12.0, 6.0),
        fill: HILL_NEAR,
        crest: HILL_NEAR_CREST,
    },
];

fn draw_hills(buf: &mut PixelBuf, game: &Game, view: &View) {
    let base_y = view.y(ground_top(game)).round() as i32;
    for ribbon in &HILLS {
        for px in 0..buf.width() as i32 {
            let wx = f64::from((px as f32 + 0.5) / view.sx);
            let phase = (wx + game.scenery.scroll * ribbon.parallax) * ribbon.frequency
                + game.scenery.time * ribbon.drift;
            let height = ribbon.base
                + ribbon.amp.0 * phase.sin() as f32
                + ribbon.amp.1 * (phase * 2.3 + 1.3).sin() as f32;
            let top = view.y(ground_top(game) - height).round() as i32;
            buf.fill_rect(px, top, 1, base_y - top, ribbon.fill);
            buf.set(px, top, ribbon.crest);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, game: &Game, view: &View) {
    let top = ground_top(game);
    let gy = view.y(top).round() as i32;
    let grass_h = view.y(8.0).round().max(2.0) as i32;
    let scroll = game.scenery.scroll;
    for px in 0..buf.width() as i32 {
        let wx = f64::from((px as f32 + 0.5) / view.sx) + scroll;
        let tile = (wx / 12.0).floor() as i64;
        buf.set(px, gy, if tile.rem_euclid(2) == 0 { GRASS_LIGHT } else { GRASS });
        buf.fill_rect(px, gy + 1, 1, grass_h - 1, GRASS);
        buf.set(px, gy + grass_h, GROUND_EDGE);
        for py in (gy + grass_h + 1)..buf.height() as i32 {
            let depth = f64::from((py - gy) as f32 / view.sy);
            let stripe = ((wx + depth * 2.0) / 18.0).floor() as i64;
            buf.set(px, py, if stripe.rem_euclid(2) == 0 { DIRT } else { DIRT_DARK });
        }
    }
}

/// Cylinder shading across a pipe `total_w` pixels wide.
fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = x as f32 / (total_w - 1) as f32;
    if t < 0.25 {
        PIPE_L.mix(PIPE_M, t * 4.0)
    } else if t < 0.4 {
        PIPE_M.mix(PIPE_HI, (t - 0.25) / 0.15)
    } else if t < 0.62 {
        PIPE_HI.mix(PIPE_R, (t - 0.4) / 0.22)
    } else {
        PIPE_R.mix(PIPE_L, (t - 0.62) / 0.38)
    }
}

fn draw_obstacle(buf: &mut PixelBuf, obstacle: &Obstacle, game: &Game, view: &View) {
    let pipe_w = game.tuning.pipe_width;
    let x0 = view.x(obstacle.x).round() as i32;
    let body_w = (view.x(obstacle.x + pipe_w).round() as i32 - x0).max(1);
    let cap_x0 = view.x(obstacle.x - CAP_OVERHANG).round() as i32;
    let cap_w = (view.x(obstacle.x + pipe_w + CAP_OVERHANG).round() as i32 - cap_x0).max(1);

    let gap_top = view.y(obstacle.gap_top).round() as i32;
    let gap_bot = view.y(obstacle.gap_bottom()).round() as i32;
    let cap_h = view.y(CAP_H).round().max(2.0) as i32;
    let floor = view.y(ground_top(game)).round() as i32;

    // bodies
    for i in 0..body_w {
        let c = pipe_shade(i, body_w);
        buf.fill_rect(x0 + i, 0, 1, gap_top - cap_h, c);
        buf.fill_rect(x0 + i, gap_bot + cap_h, 1, floor - gap_bot - cap_h, c);
    }
    // caps, with a dark rim on both edges
    for i in 0..cap_w {
        let c = pipe_shade(i, cap_w);
        let x = cap_x0 + i;
        buf.fill_rect(x, gap_top - cap_h, 1, cap_h, c);
        buf.fill_rect(x, gap_bot, 1, cap_h, c);
        buf.set(x, gap_top - cap_h, CAP_DARK);
        buf.set(x, gap_top - 1, CAP_DARK);
        buf.set(x, gap_bot, CAP_DARK);
        buf.set(x, gap_bot + cap_h - 1, CAP_DARK);
    }
    // highlight strip down the lit side
    let strip_x = x0 + body_w / 5;
    let strip_w = (body_w / 8).max(1);
    buf.blend_rect(strip_x, 0, strip_w, gap_top - 1, PIPE_HI, 0.55);
    buf.blend_rect(strip_x, gap_bot + 1, strip_w, floor - gap_bot - 1, PIPE_HI, 0.55);
}

fn draw_bird(buf: &mut PixelBuf, game: &Game, view: &View, elapsed: f64) {
    let bird = &game.bird;
    let bob = if game.phase == Phase::NotStarted {
        BOB_AMPLITUDE * (elapsed * BOB_FREQUENCY).sin() as f32
    } else {
        0.0
    };
    let cx = view.x(bird.x + bird.size / 2.0);
    let cy = view.y(bird.y + bird.size / 2.0 + bob);
    let u = view.x(bird.size);

    // shadow shrinks and fades as the bird climbs
    let top = ground_top(game);
    let above = (top - bird.bottom() - bob).max(0.0);
    let k = (1.0 - above / game.viewport.height).clamp(0.2, 1.0);
    buf.blend_ellipse(
        cx,
        view.y(top) + 1.0,
        (0.6 * u * k).max(1.0),
        (view.y(bird.size) * 0.15 * k).max(0.5),
        SHADOW,
        0.45 * k,
    );

    // tail
    buf.fill_polygon(
        &[
            (cx - 0.55 * u, cy - 0.1 * u),
            (cx - 0.85 * u, cy - 0.28 * u),
            (cx - 0.8 * u, cy + 0.12 * u),
        ],
        BIRD_WING,
    );

    buf.fill_ellipse_with(cx, cy, 0.62 * u, 0.5 * u, |_, v| {
        let t = (v + 1.0) / 2.0;
        if t < 0.5 {
            BIRD_HI.mix(BIRD_BODY, t * 2.0)
        } else {
            BIRD_BODY.mix(BIRD_BELLY, (t - 0.5) * 2.0)
        }
    });

    let beat = (elapsed * f64::from(game.tuning.wing_frequency)).sin() as f32;
    buf.fill_polygon(
        &[
            (cx - 0.45 * u, cy - 0.05 * u),
            (cx + 0.1 * u, cy - 0.05 * u),
            (cx, cy + 0.15 * u),
            (cx - 0.3 * u, cy + beat * 0.45 * u),
        ],
        BIRD_WING,
    );

    buf.fill_polygon(
        &[
            (cx + 0.45 * u, cy - 0.05 * u),
            (cx + 0.9 * u, cy + 0.08 * u),
            (cx + 0.45 * u, cy + 0.22 * u),
        ],
        BIRD_BEAK,
    );
    buf.fill_polygon(
        &[
            (cx + 0.45 * u, cy - 0.05 * u),
            (cx + 0.9 * u, cy + 0.08 * u),
            (cx + 0.45 * u, cy + 0.08 * u),
        ],
        BIRD_BEAK_HI,
    );

    let (ex, ey) = (cx + 0.25 * u, cy - 0.18 * u);
    buf.fill_circle(ex, ey, (0.17 * u).max(0.6), BIRD_EYE);
    buf.fill_circle(ex + 0.05 * u, ey, (0.08 * u).max(0.5), BIRD_PUPIL);
}

/// Base text scale for this buffer height.
fn text_scale(buf: &PixelBuf) -> i32 {
    (buf.height() / 48).max(1) as i32
}

/// Largest scale up to `want` at which `text` fits the buffer width.
fn fit_scale(text: &str, want: i32, buf: &PixelBuf) -> i32 {
    let mut scale = want.max(1);
    while scale > 1 && font::text_width(text, scale) > buf.width() as i32 - 2 {
        scale -= 1;
    }
    scale
}

fn draw_score(buf: &mut PixelBuf, score: u32) {
    let text = score.to_string();
    let scale = fit_scale(&text, text_scale(buf) + 1, buf);
    let y = (buf.height() as i32 / 20).max(2);
    font::draw_text(buf, &text, buf.width() as i32 / 2, y, scale, WHITE, Some(SHADOW));
}

fn draw_overlay(buf: &mut PixelBuf, game: &Game) {
    let (w, h) = (buf.width() as i32, buf.height() as i32);
    let base = text_scale(buf);
    let (scrim, title, title_colour, lines) = match game.phase {
        Phase::NotStarted => (
            0.25,
            "FLAPPY SKY".to_string(),
            BIRD_BODY,
            vec!["SPACE OR CLICK TO FLAP".to_string()],
        ),
        _ => (
            0.45,
            "GAME OVER".to_string(),
            BIRD_BEAK,
            vec![
                format!("SCORE {}  BEST {}", game.score, game.best),
                format!("TIME {:.1}", game.run_time),
                "ENTER OR CLICK TO RESTART".to_string(),
            ],
        ),
    };
    buf.blend_rect(0, 0, w, h, SHADOW, scrim);

    let title_scale = fit_scale(&title, base * 2, buf);
    let mut y = h * 28 / 100;
    font::draw_text(buf, &title, w / 2, y, title_scale, title_colour, Some(SHADOW));
    y += GLYPH_H * title_scale + 2 * base + 1;
    for line in &lines {
        let scale = fit_scale(line, base, buf);
        font::draw_text(buf, line, w / 2, y, scale, WHITE, Some(SHADOW));
        y += GLYPH_H * scale + base + 1;
    }
}
