/// Narrowest playfield the host fit will produce, in logical pixels.
pub const MIN_WIDTH: f32 = 640.0;
/// Widest playfield the host fit will produce.
pub const MAX_WIDTH: f32 = 1280.0;
/// Height of the narrowest fitted playfield (16:9).
pub const MIN_HEIGHT: f32 = MIN_WIDTH * 9.0 / 16.0;

/// Hard floor for any viewport, fitted or not. Keeps gap and floor math
/// from collapsing to an empty range.
const MIN_SIDE: f32 = 160.0;

/// Logical pixels per terminal pixel when measuring the host.
pub const LOGICAL_PER_PIXEL: f32 = 4.0;

/// Playfield dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(MIN_SIDE),
            height: height.max(MIN_SIDE),
        }
    }

    /// Largest 16:9 playfield that fits a host area, with the width bounded
    /// to `[MIN_WIDTH, MAX_WIDTH]`. The renderer scales it to the host.
    pub fn fit(host_width: f32, host_height: f32) -> Self {
        let width = host_width
            .min(host_height * 16.0 / 9.0)
            .clamp(MIN_WIDTH, MAX_WIDTH);
        Self {
            width,
            height: width * 9.0 / 16.0,
        }
    }

    /// Fit from a terminal pixel area (columns by half-block rows).
    pub fn fit_pixels(px_width: usize, px_height: usize) -> Self {
        Self::fit(
            px_width as f32 * LOGICAL_PER_PIXEL,
            px_height as f32 * LOGICAL_PER_PIXEL,
        )
    }
}
