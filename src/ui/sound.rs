/// Tone engine: a continuous buzzer-style tone via rodio.
///
/// The game drives a piezo the way a PWM pin would: a tone starts,
/// keeps sounding for as long as the caller sleeps or polls, and stops
/// on request. Each start gets its own Sink; dropping it silences the
/// previous tone.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub ToneEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::time::Duration;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::warn;

    const SAMPLE_RATE: u32 = 44100;

    pub struct ToneEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        current: Option<Sink>,
        volume: f32,
    }

    impl ToneEngine {
        pub fn new(volume: f32) -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(ToneEngine {
                _stream: stream,
                handle,
                current: None,
                volume,
            })
        }

        /// Start sounding `hz`, replacing whatever was playing.
        pub fn start(&mut self, hz: u32) {
            self.stop();
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.set_volume(self.volume);
                    sink.append(PiezoWave::new(hz));
                    self.current = Some(sink);
                }
                Err(e) => warn!(error = %e, hz, "could not open sink"),
            }
        }

        pub fn stop(&mut self) {
            // Sink stops its sources on drop
            self.current = None;
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform: endless square-ish wave (sine + odd harmonics)
    // ════════════════════════════════════════════════════════════

    pub(super) struct PiezoWave {
        freq: f32,
        index: u64,
    }

    impl PiezoWave {
        pub(super) fn new(hz: u32) -> Self {
            PiezoWave { freq: hz as f32, index: 0 }
        }
    }

    impl Iterator for PiezoWave {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            let t = self.index as f32 / SAMPLE_RATE as f32;
            self.index = (self.index + 1) % SAMPLE_RATE as u64;
            let phase = t * self.freq * 2.0 * std::f32::consts::PI;
            let wave = phase.sin() * 0.7
                + (phase * 3.0).sin() * 0.2
                + (phase * 5.0).sin() * 0.1;
            Some(wave)
        }
    }

    impl Source for PiezoWave {
        fn current_frame_len(&self) -> Option<usize> { None }
        fn channels(&self) -> u16 { 1 }
        fn sample_rate(&self) -> u32 { SAMPLE_RATE }
        fn total_duration(&self) -> Option<Duration> { None }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::ToneEngine;

#[cfg(not(feature = "sound"))]
pub struct ToneEngine;

#[cfg(not(feature = "sound"))]
impl ToneEngine {
    pub fn new(_volume: f32) -> Option<Self> { Some(ToneEngine) }
    pub fn start(&mut self, _hz: u32) {}
    pub fn stop(&mut self) {}
}
