//! Game tuning and command line options
//!
//! Tuning values are logical pixels and seconds. They can be overridden from
//! a JSON file; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::viewport::MIN_HEIGHT;

/// Physics, obstacle and pacing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity set by a flap (px/s, negative is up)
    pub flap_velocity: f32,
    /// Side of the bird's square hitbox
    pub bird_size: f32,
    /// Fixed horizontal position of the bird's left edge
    pub bird_x: f32,
    pub pipe_width: f32,
    /// Horizontal obstacle speed (px/s)
    pub scroll_speed: f32,
    /// Free space between the viewport's right edge and the last obstacle
    /// before another one spawns
    pub spacing: f32,
    /// How far past the right edge new obstacles appear
    pub spawn_margin: f32,
    /// How far past the left edge obstacles are dropped
    pub despawn_margin: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Smallest distance from the top edge to a gap
    pub margin_top: f32,
    /// Smallest distance from a gap to the bottom edge
    pub floor_clearance: f32,
    /// Height of the drawn ground band
    pub ground_height: f32,
    /// Background scroll rate before the first flap (1.0 = running)
    pub idle_rate: f32,
    /// Wing beat angular frequency (rad/s)
    pub wing_frequency: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            flap_velocity: -420.0,
            bird_size: 22.0,
            bird_x: 150.0,
            pipe_width: 64.0,
            scroll_speed: 180.0,
            spacing: 220.0,
            spawn_margin: 40.0,
            despawn_margin: 10.0,
            min_gap: 140.0,
            max_gap: 180.0,
            margin_top: 40.0,
            floor_clearance: 96.0,
            ground_height: 56.0,
            idle_rate: 0.35,
            wing_frequency: 14.0,
        }
    }
}

impl Tuning {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::TuningRead {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&text).map_err(|source| Error::TuningParse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects values that would break the gap placement or physics.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gravity", self.gravity),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("scroll_speed", self.scroll_speed),
            ("min_gap", self.min_gap),
            ("wing_frequency", self.wing_frequency),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be positive")));
            }
        }
        let non_negative = [
            ("bird_x", self.bird_x),
            ("spacing", self.spacing),
            ("spawn_margin", self.spawn_margin),
            ("despawn_margin", self.despawn_margin),
            ("margin_top", self.margin_top),
            ("ground_height", self.ground_height),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must not be negative")));
            }
        }
        if !(self.flap_velocity.is_finite() && self.flap_velocity < 0.0) {
            return Err(Error::InvalidTuning("flap_velocity must be negative".into()));
        }
        if self.min_gap > self.max_gap {
            return Err(Error::InvalidTuning("min_gap is larger than max_gap".into()));
        }
        if self.min_gap <= self.bird_size {
            return Err(Error::InvalidTuning("min_gap must exceed bird_size".into()));
        }
        if self.floor_clearance < self.ground_height {
            return Err(Error::InvalidTuning(
                "floor_clearance must cover the ground band".into(),
            ));
        }
        if self.margin_top + self.max_gap + self.floor_clearance > MIN_HEIGHT {
            return Err(Error::InvalidTuning(format!(
                "margin_top + max_gap + floor_clearance must fit in {MIN_HEIGHT}px"
            )));
        }
        if !(0.0..=1.0).contains(&self.idle_rate) {
            return Err(Error::InvalidTuning("idle_rate must be within 0..=1".into()));
        }
        Ok(())
    }
}

pub const USAGE: &str = "\
Usage: flappy-sky [OPTIONS]

Options:
  --seed <N>        Seed for gap placement and clouds
  --fps <N>         Frame rate cap (1-240, default 30)
  --tuning <FILE>   JSON file overriding physics constants
  --log <FILE>      Write logs to FILE (filter with RUST_LOG)
  --mute            Disable sound effects
  -h, --help        Print this help

Keys: Space/Up/W/K flap, Enter or click start/restart, R restart, Q/Esc quit";

/// Command line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub seed: Option<u64>,
    pub fps: u32,
    pub tuning: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub mute: bool,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: None,
            fps: 30,
            tuning: None,
            log: None,
            mute: false,
            help: false,
        }
    }
}

impl Options {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or(Error::MissingValue("--seed"))?;
                    let seed = value.parse().map_err(|_| Error::InvalidValue {
                        flag: "--seed",
                        value,
                    })?;
                    opts.seed = Some(seed);
                }
                "--fps" => {
                    let value = args.next().ok_or(Error::MissingValue("--fps"))?;
                    opts.fps = match value.parse::<u32>() {
                        Ok(fps) if (1..=240).contains(&fps) => fps,
                        _ => {
                            return Err(Error::InvalidValue {
                                flag: "--fps",
                                value,
                            });
                        }
                    };
                }
                "--tuning" => {
                    let value = args.next().ok_or(Error::MissingValue("--tuning"))?;
                    opts.tuning = Some(PathBuf::from(value));
                }
                "--log" => {
                    let value = args.next().ok_or(Error::MissingValue("--log"))?;
                    opts.log = Some(PathBuf::from(value));
                }
                "--mute" => opts.mute = true,
                "-h" | "--help" => opts.help = true,
                _ => return Err(Error::UnknownArgument(arg)),
            }
        }
        Ok(opts)
    }

    pub fn load_tuning(&self) -> Result<Tuning> {
        match &self.tuning {
            Some(path) => Tuning::from_file(path),
            None => Ok(Tuning::default()),
        }
    }
}
