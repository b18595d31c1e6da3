use std::{path::Path, time::Duration};

use anyhow::Context;
use symphonia::core::{
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

use crate::foundation::error::{SkinampError, SkinampResult};

/// One decoded track attached to the output device.
///
/// Implementations start paused; `close` detaches the track for good.
pub trait AudioOutput: Send {
    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// The track ran to its end.
    fn is_finished(&self) -> bool;

    fn seek(&mut self, position: Duration) -> SkinampResult<()>;

    fn close(&mut self) -> SkinampResult<()>;
}

/// Result of opening a file: a paused output plus the track length.
pub struct LoadedSource {
    pub output: Box<dyn AudioOutput>,
    pub total_secs: u64,
}

impl std::fmt::Debug for LoadedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedSource")
            .field("total_secs", &self.total_secs)
            .finish_non_exhaustive()
    }
}

/// Opens files against the process-wide audio device.
pub trait AudioBackend: Send {
    fn open(&mut self, path: &Path) -> SkinampResult<LoadedSource>;
}

/// Track length from the container: frame count over sample rate.
pub fn probe_duration(path: &Path) -> SkinampResult<Duration> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open audio file '{}'", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SkinampError::decode(format!("probe '{}': {e}", path.display())))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| SkinampError::decode(format!("'{}' has no audio track", path.display())))?;
    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => {
            Ok(Duration::from_secs_f64(frames as f64 / f64::from(rate)))
        }
        _ => Err(SkinampError::decode(format!(
            "'{}' does not report its length",
            path.display()
        ))),
    }
}

#[cfg(feature = "rodio")]
pub use self::device::{AudioDevice, RodioBackend};

#[cfg(feature = "rodio")]
mod device {
    use std::{fs::File, io::BufReader, path::Path, time::Duration};

    use anyhow::Context;
    use rodio::Source;

    use super::{AudioBackend, AudioOutput, LoadedSource, probe_duration};
    use crate::foundation::error::{SkinampError, SkinampResult};

    /// The process-wide output device. Keep it alive for as long as anything plays.
    pub struct AudioDevice {
        stream: rodio::OutputStream,
    }

    impl AudioDevice {
        pub fn open_default() -> SkinampResult<Self> {
            let stream = rodio::OutputStreamBuilder::open_default_stream()
                .map_err(|e| SkinampError::playback(format!("open default output: {e}")))?;
            tracing::info!("audio device opened");
            Ok(Self { stream })
        }

        /// A backend mixing into this device.
        pub fn backend(&self) -> RodioBackend {
            RodioBackend {
                mixer: self.stream.mixer().clone(),
            }
        }
    }

    impl std::fmt::Debug for AudioDevice {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("AudioDevice").finish_non_exhaustive()
        }
    }

    /// [`AudioBackend`] that decodes with rodio and plays through a [`rodio::Sink`].
    pub struct RodioBackend {
        mixer: rodio::mixer::Mixer,
    }

    impl AudioBackend for RodioBackend {
        fn open(&mut self, path: &Path) -> SkinampResult<LoadedSource> {
            let file = File::open(path)
                .with_context(|| format!("open audio file '{}'", path.display()))?;
            let decoder = rodio::Decoder::new(BufReader::new(file))
                .map_err(|e| SkinampError::decode(format!("'{}': {e}", path.display())))?;

            let total = match probe_duration(path) {
                Ok(d) => d,
                Err(err) => {
                    tracing::debug!(%err, "container probe failed; using decoder length");
                    decoder.total_duration().unwrap_or(Duration::ZERO)
                }
            };

            let sink = rodio::Sink::connect_new(&self.mixer);
            sink.pause();
            sink.append(decoder);
            Ok(LoadedSource {
                output: Box::new(RodioOutput { sink }),
                total_secs: total.as_secs(),
            })
        }
    }

    struct RodioOutput {
        sink: rodio::Sink,
    }

    impl AudioOutput for RodioOutput {
        fn play(&mut self) {
            self.sink.play();
        }

        fn pause(&mut self) {
            self.sink.pause();
        }

        fn is_playing(&self) -> bool {
            !self.sink.is_paused() && !self.sink.empty()
        }

        fn is_finished(&self) -> bool {
            self.sink.empty()
        }

        fn seek(&mut self, position: Duration) -> SkinampResult<()> {
            self.sink
                .try_seek(position)
                .map_err(|e| SkinampError::playback(format!("seek to {position:?}: {e}")))
        }

        fn close(&mut self) -> SkinampResult<()> {
            self.sink.stop();
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/output.rs"]
mod tests;
