//! Entity state: the bird, the obstacle pairs and background decoration

use rand::Rng;

use crate::config::Tuning;
use crate::viewport::Viewport;

/// The player. `x`/`y` are the top-left corner of a square hitbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub size: f32,
}

impl Bird {
    pub fn new(tuning: &Tuning, viewport: &Viewport) -> Self {
        let mut bird = Self {
            x: tuning.bird_x,
            y: Self::start_y(viewport, tuning.bird_size),
            vy: 0.0,
            size: tuning.bird_size,
        };
        bird.clamp_to(viewport);
        bird
    }

    /// Resting height before the first flap.
    pub fn start_y(viewport: &Viewport, size: f32) -> f32 {
        viewport.height * 0.4 - size / 2.0
    }

    pub fn flap(&mut self, velocity: f32) {
        self.vy = velocity;
    }

    /// Lowest allowed `y` for this viewport.
    pub fn floor_y(&self, viewport: &Viewport) -> f32 {
        (viewport.height - self.size).max(0.0)
    }

    pub fn clamp_to(&mut self, viewport: &Viewport) {
        self.y = self.y.clamp(0.0, self.floor_y(viewport));
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }
}

/// A pipe pair with a gap. `x` is the left edge of both bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    /// Set once the bird has cleared it and it has been scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, gap_height: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_height,
            passed: false,
        }
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Trailing (right) edge.
    pub fn right(&self, pipe_width: f32) -> f32 {
        self.x + pipe_width
    }
}

/// Cosmetic cloud drifting right to left.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Drift speed at full scenery rate (px/s)
    pub speed: f32,
}

impl Cloud {
    /// Width of a cloud at scale 1.
    pub const BASE_WIDTH: f32 = 96.0;

    pub fn width(&self) -> f32 {
        Self::BASE_WIDTH * self.scale
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, x: f32, viewport: &Viewport) -> Self {
        Self {
            x,
            y: rng.random_range(viewport.height * 0.05..=viewport.height * 0.35),
            scale: rng.random_range(0.6..=1.3),
            speed: rng.random_range(12.0..=30.0),
        }
    }
}

/// Background decoration that scrolls independently of the simulation.
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    pub clouds: Vec<Cloud>,
    /// Ground and hill parallax offset in logical pixels
    pub scroll: f64,
    /// Seconds of scenery motion, scaled by the rate; drives the hill drift
    pub time: f64,
}

impl Scenery {
    pub fn new<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        let mut scenery = Self::default();
        scenery.reseed(viewport, rng);
        scenery
    }

    /// Scatter a fresh set of clouds across the viewport.
    pub fn reseed<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        let count = (viewport.width / 200.0).ceil() as usize + 1;
        self.clouds = (0..count)
            .map(|_| {
                let x = rng.random_range(0.0..=viewport.width);
                Cloud::random(rng, x, viewport)
            })
            .collect();
    }

    /// Drift clouds and scroll the ground at `rate` (0 freezes everything).
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rate: f32,
        scroll_speed: f32,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        if rate <= 0.0 || dt <= 0.0 {
            return;
        }
        self.scroll += f64::from(scroll_speed * rate * dt);
        self.time += f64::from(rate * dt);
        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed * rate * dt;
            if cloud.x + cloud.width() < 0.0 {
                let x = viewport.width + rng.random_range(0.0..=60.0);
                *cloud = Cloud::random(rng, x, viewport);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn bird_starts_inside_viewport() {
        let viewport = Viewport::new(480.0, 640.0);
        let bird = Bird::new(&Tuning::default(), &viewport);
        assert_eq!(bird.x, Tuning::default().bird_x);
        assert_eq!(bird.vy, 0.0);
        assert!(bird.y >= 0.0 && bird.y <= viewport.height - bird.size);
    }

    #[test]
    fn clamp_pulls_bird_into_smaller_viewport() {
        let mut bird = Bird::new(&Tuning::default(), &Viewport::new(480.0, 640.0));
        bird.y = 600.0;
        bird.clamp_to(&Viewport::new(480.0, 300.0));
        assert_eq!(bird.y, 300.0 - bird.size);
    }

    #[test]
    fn clouds_cover_viewport() {
        let mut rng = Pcg32::seed_from_u64(7);
        let viewport = Viewport::new(800.0, 450.0);
        let scenery = Scenery::new(&viewport, &mut rng);
        assert_eq!(scenery.clouds.len(), 5);
        for cloud in &scenery.clouds {
            assert!((0.0..=viewport.width).contains(&cloud.x));
            assert!(cloud.y <= viewport.height * 0.35);
        }
    }

    #[test]
    fn clouds_wrap_to_right_edge() {
        let mut rng = Pcg32::seed_from_u64(7);
        let viewport = Viewport::new(800.0, 450.0);
        let mut scenery = Scenery::new(&viewport, &mut rng);
        scenery.clouds[0].x = -Cloud::BASE_WIDTH * 2.0;
        scenery.advance(0.016, 1.0, 180.0, &viewport, &mut rng);
        assert!(scenery.clouds[0].x >= viewport.width);
    }

    #[test]
    fn zero_rate_freezes_scenery() {
        let mut rng = Pcg32::seed_from_u64(3);
        let viewport = Viewport::new(800.0, 450.0);
        let mut scenery = Scenery::new(&viewport, &mut rng);
        let before = scenery.clouds.clone();
        scenery.advance(0.05, 0.0, 180.0, &viewport, &mut rng);
        assert_eq!(scenery.clouds, before);
        assert_eq!(scenery.scroll, 0.0);
        assert_eq!(scenery.time, 0.0);
    }

    #[test]
    fn idle_rate_scrolls_slower() {
        let mut rng = Pcg32::seed_from_u64(3);
        let viewport = Viewport::new(800.0, 450.0);
        let mut idle = Scenery::new(&viewport, &mut rng);
        let mut full = idle.clone();
        idle.advance(0.1, 0.35, 180.0, &viewport, &mut rng);
        full.advance(0.1, 1.0, 180.0, &viewport, &mut rng);
        assert!(idle.scroll > 0.0 && idle.scroll < full.scroll);
        assert!((idle.time - 0.035).abs() < 1e-6);
        assert!((full.time - 0.1).abs() < 1e-6);
    }
}
