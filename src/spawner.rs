//! Obstacle spawning, scrolling and pruning

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::Tuning;
use crate::viewport::Viewport;
use crate::world::Obstacle;

/// Keeps a rolling window of obstacles ordered left to right.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Scroll every obstacle left, drop the ones that left the screen and
    /// append a new one when there is room. Returns true if one spawned.
    pub fn update(
        &mut self,
        obstacles: &mut Vec<Obstacle>,
        dt: f32,
        viewport: &Viewport,
        tuning: &Tuning,
    ) -> bool {
        for obstacle in obstacles.iter_mut() {
            obstacle.x -= tuning.scroll_speed * dt;
        }
        obstacles.retain(|o| o.right(tuning.pipe_width) >= -tuning.despawn_margin);

        if !should_spawn(obstacles, viewport, tuning) {
            return false;
        }
        let obstacle = random_obstacle(
            &mut self.rng,
            viewport.width + tuning.spawn_margin,
            viewport,
            tuning,
        );
        log::debug!(
            "spawned obstacle gap_top={:.0} gap_height={:.0}",
            obstacle.gap_top,
            obstacle.gap_height
        );
        obstacles.push(obstacle);
        true
    }
}

/// True when the sequence is empty or the rightmost obstacle has scrolled a
/// full spacing interval clear of the right edge.
pub fn should_spawn(obstacles: &[Obstacle], viewport: &Viewport, tuning: &Tuning) -> bool {
    match obstacles.last() {
        None => true,
        Some(last) => viewport.width - last.right(tuning.pipe_width) >= tuning.spacing,
    }
}

/// An obstacle at `x` with a uniformly placed gap that stays clear of the
/// top margin and the floor band.
pub fn random_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    x: f32,
    viewport: &Viewport,
    tuning: &Tuning,
) -> Obstacle {
    let gap_height = sample(rng, tuning.min_gap, tuning.max_gap);
    let lowest_top = viewport.height - gap_height - tuning.floor_clearance;
    let gap_top = sample(rng, tuning.margin_top, lowest_top);
    Obstacle::new(x, gap_top, gap_height)
}

// Collapses to `lo` when the range is empty.
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_sequence_spawns_at_right_margin() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(480.0, 640.0);
        let mut spawner = Spawner::new(1);
        let mut obstacles = Vec::new();
        assert!(spawner.update(&mut obstacles, 0.0, &viewport, &tuning));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].x, 480.0 + tuning.spawn_margin);
        assert!(!obstacles[0].passed);
    }

    #[test]
    fn waits_for_spacing_before_next_spawn() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(480.0, 640.0);
        let mut spawner = Spawner::new(1);
        let mut obstacles = vec![Obstacle::new(300.0, 100.0, 150.0)];
        // right edge 364, free space 116 < 220
        assert!(!spawner.update(&mut obstacles, 0.0, &viewport, &tuning));
        obstacles[0].x = 480.0 - tuning.spacing - tuning.pipe_width;
        assert!(spawner.update(&mut obstacles, 0.0, &viewport, &tuning));
        assert_eq!(obstacles.len(), 2);
        assert!(obstacles[0].x < obstacles[1].x);
    }

    #[test]
    fn obstacle_scrolls_off_and_is_removed() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(480.0, 640.0);
        let mut spawner = Spawner::new(9);
        let mut obstacles = vec![Obstacle::new(500.0, 200.0, 170.0)];
        let first = obstacles[0].clone();
        let dt = 1.0 / 60.0;
        let mut last_x = first.x;
        for _ in 0..600 {
            spawner.update(&mut obstacles, dt, &viewport, &tuning);
            match obstacles.iter().find(|o| o.gap_top == first.gap_top && o.gap_height == 170.0) {
                Some(o) => last_x = o.x,
                None => break,
            }
        }
        assert!(
            !obstacles
                .iter()
                .any(|o| o.gap_top == first.gap_top && o.gap_height == 170.0)
        );
        assert!(last_x < -tuning.pipe_width);
    }

    #[test]
    fn obstacles_stay_ordered_left_to_right() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(800.0, 450.0);
        let mut spawner = Spawner::new(4);
        let mut obstacles = Vec::new();
        for _ in 0..2000 {
            spawner.update(&mut obstacles, 1.0 / 30.0, &viewport, &tuning);
            assert!(obstacles.windows(2).all(|w| w[0].x < w[1].x));
        }
        // pruning bounds the window
        assert!(obstacles.len() <= 4);
    }

    #[test]
    fn degenerate_viewport_still_places_gap_at_margin() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(200.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let obstacle = random_obstacle(&mut rng, 0.0, &viewport, &tuning);
        assert_eq!(obstacle.gap_top, tuning.margin_top);
    }

    proptest! {
        #[test]
        fn spawned_gaps_respect_bounds(seed in any::<u64>(), height in 360.0f32..1000.0) {
            let tuning = Tuning::default();
            let viewport = Viewport::new(height * 16.0 / 9.0, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            let o = random_obstacle(&mut rng, viewport.width, &viewport, &tuning);
            prop_assert!(o.gap_height >= tuning.min_gap && o.gap_height <= tuning.max_gap);
            prop_assert!(o.gap_top >= tuning.margin_top);
            prop_assert!(o.gap_top + o.gap_height <= viewport.height - tuning.floor_clearance + 1e-3);
        }
    }
}
