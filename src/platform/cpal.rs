//! Hardware backend on top of cpal.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, SampleFormat, SampleRate, Stream, SupportedStreamConfig,
};
use rtrb::Producer;
use tracing::{error, info, warn};

use crate::{
    engine::renderer::GraphRenderer,
    error::{EngineError, Result},
    platform::{AudioPlatform, CaptureHandle, DenialReason, OutputConfig, Permission},
};

pub struct CpalPlatform {
    host: cpal::Host,
    output: Option<(Device, SupportedStreamConfig)>,
}

impl CpalPlatform {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
            output: None,
        }
    }

    /// Pick an input config at the output's sample rate if the device has
    /// one; otherwise fall back to its default and let the caller know.
    fn input_config(device: &Device, sample_rate: f32) -> std::result::Result<SupportedStreamConfig, DenialReason> {
        let wanted = SampleRate(sample_rate as u32);
        let matching = device
            .supported_input_configs()
            .map_err(|err| DenialReason::Device(err.to_string()))?
            .filter(|range| range.sample_format() == SampleFormat::F32)
            .find(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate())
            .map(|range| range.with_sample_rate(wanted));

        match matching {
            Some(config) => Ok(config),
            None => {
                let config = device
                    .default_input_config()
                    .map_err(|err| DenialReason::Device(err.to_string()))?;
                warn!(
                    input_rate = config.sample_rate().0,
                    output_rate = sample_rate,
                    "microphone runs at a different sample rate, pitch will be off"
                );
                Ok(config)
            }
        }
    }
}

impl Default for CpalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlatform for CpalPlatform {
    type Output = Stream;
    type Capture = CpalCapture;

    fn output_config(&mut self) -> Result<OutputConfig> {
        let device = self
            .host
            .default_output_device()
            .ok_or_else(|| EngineError::UnsupportedEnvironment("no default output device available".into()))?;
        let config = device.default_output_config().map_err(|err| {
            EngineError::UnsupportedEnvironment(format!("failed to fetch default output config: {err}"))
        })?;

        let output = OutputConfig {
            sample_rate: config.sample_rate().0 as f32,
            channels: config.channels(),
        };
        self.output = Some((device, config));
        Ok(output)
    }

    fn start_output(&mut self, config: &OutputConfig, mut renderer: GraphRenderer) -> Result<Stream> {
        let (device, supported) = self
            .output
            .take()
            .ok_or_else(|| EngineError::UnsupportedEnvironment("output device was not probed".into()))?;
        let channels = config.channels as usize;

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
                |err| error!(%err, "output stream error"),
                None,
            )
            .map_err(|err| {
                EngineError::UnsupportedEnvironment(format!("failed to build output stream: {err}"))
            })?;

        stream.play().map_err(|err| {
            EngineError::UnsupportedEnvironment(format!("failed to start output stream: {err}"))
        })?;

        info!(
            device = device.name().unwrap_or_default(),
            sample_rate = config.sample_rate,
            channels,
            "output stream started"
        );
        Ok(stream)
    }

    fn request_capture(&mut self, sample_rate: f32, mut sink: Producer<f32>) -> Permission<CpalCapture> {
        let Some(device) = self.host.default_input_device() else {
            return Permission::Denied(DenialReason::NoDevice);
        };

        let config = match Self::input_config(&device, sample_rate) {
            Ok(config) => config,
            Err(reason) => return Permission::Denied(reason),
        };
        let channels = config.channels().max(1) as usize;

        let stream = device.build_input_stream(
            &config.into(),
            move |data: &[f32], _| {
                for frame in data.chunks(channels) {
                    let mono = frame.iter().sum::<f32>() / channels as f32;
                    if sink.push(mono).is_err() {
                        break;
                    }
                }
            },
            |err| error!(%err, "input stream error"),
            None,
        );

        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => return Permission::Denied(DenialReason::Device(err.to_string())),
        };
        if let Err(err) = stream.play() {
            return Permission::Denied(DenialReason::Device(err.to_string()));
        }

        Permission::Granted(CpalCapture {
            stream: Some(stream),
        })
    }
}

pub struct CpalCapture {
    stream: Option<Stream>,
}

impl CaptureHandle for CpalCapture {
    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                warn!(%err, "failed to pause input stream");
            }
        }
    }
}
