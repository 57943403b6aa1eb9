//! WAV file reading and writing.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavWriter};

/// Deinterleaved audio loaded from a WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Audio {
    /// One sample buffer per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Audio {
    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Reads a WAV file into per-channel `f32` buffers in `[-1, 1]`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> anyhow::Result<Audio> {
    let path = path.as_ref();
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels);
    if channel_count == 0 {
        anyhow::bail!("{} has no channels", path.display());
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(Audio {
        channels,
        sample_rate: spec.sample_rate,
    })
}

/// Output bit depths accepted by [`write_wav`].
pub const BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Writes per-channel buffers to a WAV file.
///
/// `bit_depth` 32 writes IEEE float; 16 and 24 write clipped integer PCM.
pub fn write_wav<P: AsRef<Path>>(path: P, audio: &Audio, bit_depth: u16) -> anyhow::Result<()> {
    let path = path.as_ref();
    if !BIT_DEPTHS.contains(&bit_depth) {
        anyhow::bail!("unsupported bit depth {bit_depth} (expected 16, 24 or 32)");
    }
    let channel_count =
        u16::try_from(audio.channels.len()).context("too many channels for a WAV file")?;

    let spec = hound::WavSpec {
        channels: channel_count,
        sample_rate: audio.sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("failed to create {}", path.display()))?;

    let max_val = (1i32 << (bit_depth - 1)) as f32;
    for frame in 0..audio.frames() {
        for channel in &audio.channels {
            let sample = channel.get(frame).copied().unwrap_or(0.0);
            if bit_depth == 32 {
                writer.write_sample(sample)?;
            } else {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sine(len: usize, step: f32, amplitude: f32) -> Vec<f32> {
        (0..len).map(|i| (i as f32 * step).sin() * amplitude).collect()
    }

    #[test]
    fn roundtrip_stereo_f32() {
        let audio = Audio {
            channels: vec![sine(1000, 0.001, 1.0), sine(1000, 0.002, 0.5)],
            sample_rate: 48000,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &audio, 32).unwrap();
        let loaded = read_wav(file.path()).unwrap();

        assert_eq!(loaded.sample_rate, 48000);
        assert_eq!(loaded.channels.len(), 2);
        assert_eq!(loaded, audio);
    }

    #[test]
    fn roundtrip_i16_and_i24() {
        let audio = Audio {
            channels: vec![sine(1000, 0.001, 0.9)],
            sample_rate: 44100,
        };

        for (bits, tolerance) in [(16, 1e-3), (24, 1e-6)] {
            let file = NamedTempFile::new().unwrap();
            write_wav(file.path(), &audio, bits).unwrap();
            let loaded = read_wav(file.path()).unwrap();

            assert_eq!(loaded.frames(), 1000);
            for (a, b) in audio.channels[0].iter().zip(&loaded.channels[0]) {
                assert!((a - b).abs() < tolerance, "{bits}-bit: {a} vs {b}");
            }
        }
    }

    #[test]
    fn integer_output_clips() {
        let audio = Audio {
            channels: vec![vec![2.0, -2.0]],
            sample_rate: 48000,
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &audio, 16).unwrap();

        let loaded = read_wav(file.path()).unwrap();
        assert!((loaded.channels[0][0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(loaded.channels[0][1], -1.0);
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        let audio = Audio {
            channels: vec![vec![0.0; 4]],
            sample_rate: 48000,
        };
        let file = NamedTempFile::new().unwrap();
        assert!(write_wav(file.path(), &audio, 8).is_err());
    }
}
