//! Bird integration, collision tests and scoring

use crate::config::Tuning;
use crate::viewport::Viewport;
use crate::world::{Bird, Obstacle};

/// What ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Ground,
    Pipe,
}

/// Advance the bird by `dt` seconds. The ceiling stops the bird dead; the
/// floor clamps it and reports a crash.
pub fn integrate(bird: &mut Bird, dt: f32, tuning: &Tuning, viewport: &Viewport) -> Option<Crash> {
    bird.vy += tuning.gravity * dt;
    bird.y += bird.vy * dt;

    if bird.y < 0.0 {
        bird.y = 0.0;
        bird.vy = 0.0;
    }
    if bird.bottom() > viewport.height {
        bird.y = bird.floor_y(viewport);
        return Some(Crash::Ground);
    }
    None
}

/// Axis-aligned overlap between the bird's hitbox and either pipe body.
pub fn hits_obstacle(bird: &Bird, obstacle: &Obstacle, pipe_width: f32) -> bool {
    let overlaps_x = bird.x + bird.size > obstacle.x && bird.x < obstacle.right(pipe_width);
    overlaps_x && (bird.y < obstacle.gap_top || bird.bottom() > obstacle.gap_bottom())
}

/// Index of the first obstacle the bird overlaps, in sequence order.
pub fn first_collision(bird: &Bird, obstacles: &[Obstacle], pipe_width: f32) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| hits_obstacle(bird, o, pipe_width))
}

/// Mark every obstacle whose trailing edge is now behind the bird as passed.
/// Returns the number of newly passed obstacles.
pub fn award_passes(bird: &Bird, obstacles: &mut [Obstacle], pipe_width: f32) -> u32 {
    let mut gained = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.right(pipe_width) < bird.x {
            obstacle.passed = true;
            gained += 1;
        }
    }
    gained
}
