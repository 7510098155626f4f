//! Sound cues for game events
//!
//! Each cue is a small fundsp graph: an `lfo` frequency sweep feeding an
//! oscillator, multiplied by an `lfo` gain ramp down to silence. Graphs are
//! rendered to a mono sample buffer up front. Playback goes through rodio
//! when the `audio` feature is enabled and is silent otherwise.

use fundsp::prelude::{AudioUnit, lfo, saw, sine, square};

use crate::game::GameEvent;

pub const SAMPLE_RATE: u32 = 44_100;

/// Oscillator a cue is voiced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Square,
    Saw,
    Sine,
}

fn progress(t: f32, secs: f32) -> f32 {
    (t / secs).min(1.0)
}

fn render(mut unit: impl AudioUnit, len: usize) -> Vec<f32> {
    unit.set_sample_rate(f64::from(SAMPLE_RATE));
    unit.reset();
    (0..len).map(|_| unit.get_mono()).collect()
}

/// Mono samples sweeping `from_hz` to `to_hz` over `secs`, with gain
/// falling linearly from `gain` to silence.
pub fn chirp(from_hz: f32, to_hz: f32, secs: f32, gain: f32, wave: Wave) -> Vec<f32> {
    let len = (secs.max(0.0) * SAMPLE_RATE as f32) as usize;
    if len == 0 {
        return Vec::new();
    }
    let sweep = lfo(move |t: f32| from_hz + (to_hz - from_hz) * progress(t, secs));
    let envelope = lfo(move |t: f32| gain * (1.0 - progress(t, secs)));
    match wave {
        Wave::Square => render((sweep >> square()) * envelope, len),
        Wave::Saw => render((sweep >> saw()) * envelope, len),
        Wave::Sine => render((sweep >> sine::<f32>()) * envelope, len),
    }
}

/// The sound for an event, if it has one.
pub fn cue(event: &GameEvent) -> Option<Vec<f32>> {
    match event {
        GameEvent::Flapped => Some(chirp(520.0, 880.0, 0.08, 0.12, Wave::Square)),
        GameEvent::Scored(_) => Some(chirp(880.0, 1320.0, 0.12, 0.1, Wave::Sine)),
        GameEvent::Crashed(_) => Some(chirp(400.0, 80.0, 0.5, 0.15, Wave::Saw)),
        GameEvent::Started | GameEvent::Restarted => None,
    }
}

pub struct Sfx {
    output: Option<backend::Output>,
}

impl Sfx {
    pub fn new(muted: bool) -> Self {
        let output = if muted { None } else { backend::Output::open() };
        Self { output }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, event: &GameEvent) {
        if let (Some(output), Some(samples)) = (&self.output, cue(event)) {
            output.play(samples);
        }
    }
}

#[cfg(feature = "audio")]
mod backend {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle};

    use super::SAMPLE_RATE;

    pub struct Output {
        // dropping the stream stops playback
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                }),
                Err(err) => {
                    log::warn!("no audio output, continuing without sound: {err}");
                    None
                }
            }
        }

        pub fn play(&self, samples: Vec<f32>) {
            if let Err(err) = self
                .handle
                .play_raw(SamplesBuffer::new(1, SAMPLE_RATE, samples))
            {
                log::warn!("failed to play sound: {err}");
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod backend {
    pub struct Output;

    impl Output {
        pub fn open() -> Option<Self> {
            log::debug!("built without the audio feature");
            None
        }

        pub fn play(&self, _samples: Vec<f32>) {}
    }
}
