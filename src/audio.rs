use std::f32::consts::PI;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use log::{info, warn};

/// Tone color for a single fire-and-forget voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
}

/// Attack/release ramp applied to every tone so starts and stops don't click.
const RAMP_SECONDS: f32 = 0.01;

#[derive(Debug, Clone)]
struct Tone {
    frequency: f32,
    shape: WaveShape,
    phase: f32,
    /// Seconds until this tone starts sounding (used by the chime).
    delay: f32,
    age: f32,
    duration: f32,
}

impl Tone {
    fn envelope(&self) -> f32 {
        let attack = (self.age / RAMP_SECONDS).min(1.0);
        let release = ((self.duration - self.age) / RAMP_SECONDS).min(1.0);
        attack.min(release).max(0.0)
    }
}

/// Mixes the currently sounding tones into mono samples. Shared with the
/// cpal callback behind an RwLock; the UI thread only pushes tones.
pub struct ToneMixer {
    sample_rate: f32,
    volume: f32,
    tones: Vec<Tone>,
}

impl ToneMixer {
    pub fn new(sample_rate: f32) -> Self {
        ToneMixer {
            sample_rate,
            volume: 0.5,
            tones: Vec::new(),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn queue(&mut self, frequency: f32, shape: WaveShape, duration: f32, delay: f32) {
        self.tones.push(Tone {
            frequency,
            shape,
            phase: 0.0,
            delay: delay.max(0.0),
            age: 0.0,
            duration: duration.max(0.0),
        });
    }

    pub fn active_tones(&self) -> usize {
        self.tones.len()
    }

    /// Produce the next mono sample and advance all voices.
    pub fn next_sample(&mut self) -> f32 {
        let dt = 1.0 / self.sample_rate;
        let mut sample = 0.0;
        for tone in &mut self.tones {
            if tone.delay > 0.0 {
                tone.delay -= dt;
                continue;
            }
            let value = match tone.shape {
                WaveShape::Sine => (2.0 * PI * tone.phase).sin(),
                WaveShape::Square => {
                    if tone.phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                WaveShape::Triangle => {
                    if tone.phase < 0.25 {
                        4.0 * tone.phase
                    } else if tone.phase < 0.75 {
                        2.0 - 4.0 * tone.phase
                    } else {
                        -4.0 + 4.0 * tone.phase
                    }
                }
            };
            sample += value * tone.envelope() * 0.3;
            tone.phase = (tone.phase + tone.frequency * dt) % 1.0;
            tone.age += dt;
        }
        self.tones
            .retain(|tone| tone.delay > 0.0 || tone.age < tone.duration);
        sample * self.volume
    }
}

/// Owns the output stream and the mixer feeding it. Created lazily on the
/// first Start press; if the platform refuses us an output device the app
/// simply runs silent.
pub struct AudioEngine {
    mixer: Arc<RwLock<ToneMixer>>,
    _stream: Stream,
}

impl AudioEngine {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no audio output device available"))?;
        info!("audio output device: {:?}", device.name());

        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let config = cpal::StreamConfig::from(config);
        let sample_rate = config.sample_rate.0 as f32;

        let mixer = Arc::new(RwLock::new(ToneMixer::new(sample_rate)));

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, Arc::clone(&mixer)),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, Arc::clone(&mixer)),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, Arc::clone(&mixer)),
            _ => anyhow::bail!("unsupported sample format"),
        }?;

        stream.play()?;
        info!("audio stream started at {} Hz", sample_rate);

        Ok(AudioEngine {
            mixer,
            _stream: stream,
        })
    }

    /// Fire-and-forget tone playback. Lock failure means the audio thread
    /// panicked; scoring must keep working regardless, so just log it.
    pub fn play_tone(&self, frequency: f32, shape: WaveShape, duration: f32) {
        match self.mixer.write() {
            Ok(mut mixer) => mixer.queue(frequency, shape, duration, 0.0),
            Err(_) => warn!("tone dropped: mixer lock poisoned"),
        }
    }

    /// Two short high sines after a beat, layered over the note tone as the
    /// confirmation for a correct answer.
    pub fn play_success_chime(&self) {
        if let Ok(mut mixer) = self.mixer.write() {
            mixer.queue(1318.51, WaveShape::Sine, 0.12, 0.15); // E6
            mixer.queue(1567.98, WaveShape::Sine, 0.18, 0.27); // G6
        }
    }

    pub fn set_volume(&self, volume: f32) {
        if let Ok(mut mixer) = self.mixer.write() {
            mixer.set_volume(volume);
        }
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<RwLock<ToneMixer>>,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| warn!("audio stream error: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let value = match mixer.write() {
                    Ok(mut guard) => guard.next_sample(),
                    Err(_) => 0.0,
                };
                let value_t = T::from_sample(value);
                for sample in frame.iter_mut() {
                    *sample = value_t;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f32 = 48000.0;

    fn drain(mixer: &mut ToneMixer, seconds: f32) -> Vec<f32> {
        (0..(seconds * RATE) as usize)
            .map(|_| mixer.next_sample())
            .collect()
    }

    #[test]
    fn queued_tone_produces_sound_then_ends() {
        let mut mixer = ToneMixer::new(RATE);
        mixer.queue(440.0, WaveShape::Sine, 0.1, 0.0);
        let samples = drain(&mut mixer, 0.05);
        assert!(samples.iter().any(|s| s.abs() > 0.01));
        drain(&mut mixer, 0.1);
        assert_eq!(mixer.active_tones(), 0);
        assert_eq!(mixer.next_sample(), 0.0);
    }

    #[test]
    fn delayed_tone_is_silent_until_its_start() {
        let mut mixer = ToneMixer::new(RATE);
        mixer.queue(880.0, WaveShape::Sine, 0.1, 0.2);
        let early = drain(&mut mixer, 0.1);
        assert!(early.iter().all(|s| *s == 0.0));
        assert_eq!(mixer.active_tones(), 1);
        let later = drain(&mut mixer, 0.2);
        assert!(later.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn volume_zero_silences_everything() {
        let mut mixer = ToneMixer::new(RATE);
        mixer.set_volume(0.0);
        mixer.queue(440.0, WaveShape::Square, 0.1, 0.0);
        let samples = drain(&mut mixer, 0.05);
        assert!(samples.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn tones_mix_additively() {
        let mut mixer = ToneMixer::new(RATE);
        mixer.queue(440.0, WaveShape::Sine, 0.5, 0.0);
        mixer.queue(660.0, WaveShape::Triangle, 0.5, 0.0);
        assert_eq!(mixer.active_tones(), 2);
        let samples = drain(&mut mixer, 0.1);
        assert!(samples.iter().any(|s| s.abs() > 0.01));
    }
}
