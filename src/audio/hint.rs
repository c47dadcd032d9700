use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

/// How long a hint sounds unless told otherwise
pub const DEFAULT_HINT: Duration = Duration::from_millis(600);

/// Frequency in Hz of a MIDI note, A4 = 69 = 440 Hz
pub fn midi_to_frequency(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Shared between the REPL and the output callback
#[derive(Clone, Default)]
struct HintState {
    frequencies: Vec<f32>,
    remaining_samples: u64,
}

/// Plays the current step's notes as a short sine chord
pub struct HintPlayer {
    _stream: Stream,
    state: Arc<Mutex<HintState>>,
    sample_rate: u32,
}

impl HintPlayer {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();

        let state = Arc::new(Mutex::new(HintState::default()));
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, state.clone())?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, state.clone())?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, state.clone())?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };
        stream
            .play()
            .map_err(|e| anyhow!("Failed to play stream: {}", e))?;

        Ok(HintPlayer {
            _stream: stream,
            state,
            sample_rate: config.sample_rate.0,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        state: Arc<Mutex<HintState>>,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;
        let mut sample_clock = 0f32;

        let err_fn = |err: cpal::StreamError| warn!(error = %err, "Audio output stream error");

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut state) = state.lock() else {
                        return;
                    };
                    let voices = state.frequencies.len().max(1) as f32;

                    for frame in data.chunks_mut(channels) {
                        let mut value = 0.0;
                        if state.remaining_samples > 0 {
                            state.remaining_samples -= 1;
                            for &frequency in &state.frequencies {
                                value += next_sine_value(sample_rate, sample_clock, frequency);
                            }
                            value /= voices;
                        }
                        sample_clock = (sample_clock + 1.0) % sample_rate;

                        let value: T = cpal::Sample::from_sample(value);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }

    /// Sound `notes` together for `duration`, replacing any hint in progress
    pub fn play(&self, notes: &[u8], duration: Duration) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow!("Failed to lock audio state: {}", e))?;
        state.frequencies = notes.iter().map(|&n| midi_to_frequency(n)).collect();
        state.remaining_samples = samples_for(duration, self.sample_rate);
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow!("Failed to lock audio state: {}", e))?;
        state.remaining_samples = 0;
        Ok(())
    }
}

fn samples_for(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_secs_f64() * sample_rate as f64).round() as u64
}

/// Sine sample at `sample_clock`, scaled to a quiet volume
fn next_sine_value(sample_rate: f32, sample_clock: f32, frequency: f32) -> f32 {
    let volume = 0.2;
    volume * (2.0 * std::f32::consts::PI * frequency * sample_clock / sample_rate).sin()
}
