use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::error;

use crate::config::Settings;

/// A square-wave tone that plays while the sound timer is non-zero.
pub struct Sound {
    // dropping the stream stops playback
    _stream: cpal::Stream,
    active: Arc<AtomicBool>,
}

impl Sound {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let supported_config = device
            .default_output_config()
            .context("error while querying configs")?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let active = Arc::new(AtomicBool::new(false));
        let tone = Tone {
            hz: settings.tone_hz,
            volume: settings.volume,
            active: Arc::clone(&active),
        };

        let stream = match sample_format {
            cpal::SampleFormat::I8 => tone.build::<i8>(&device, &config),
            cpal::SampleFormat::I16 => tone.build::<i16>(&device, &config),
            cpal::SampleFormat::I32 => tone.build::<i32>(&device, &config),
            cpal::SampleFormat::I64 => tone.build::<i64>(&device, &config),
            cpal::SampleFormat::U8 => tone.build::<u8>(&device, &config),
            cpal::SampleFormat::U16 => tone.build::<u16>(&device, &config),
            cpal::SampleFormat::U32 => tone.build::<u32>(&device, &config),
            cpal::SampleFormat::U64 => tone.build::<u64>(&device, &config),
            cpal::SampleFormat::F32 => tone.build::<f32>(&device, &config),
            cpal::SampleFormat::F64 => tone.build::<f64>(&device, &config),
            sample_format => return Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.play().context("could not start audio stream")?;

        Ok(Self {
            _stream: stream,
            active,
        })
    }

    pub fn set_active(&self, on: bool) {
        self.active.store(on, Ordering::Relaxed);
    }
}

struct Tone {
    hz: f32,
    volume: f32,
    active: Arc<AtomicBool>,
}

impl Tone {
    fn build<T>(self, device: &cpal::Device, config: &cpal::StreamConfig) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let half_period = (sample_rate / self.hz.max(1.0) / 2.0).max(1.0);

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            if !self.active.load(Ordering::Relaxed) {
                return 0.0;
            }
            sample_clock = (sample_clock + 1.0) % (half_period * 2.0);
            if sample_clock < half_period {
                self.volume
            } else {
                -self.volume
            }
        };

        let err_fn = |err| error!("an error occurred on stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
