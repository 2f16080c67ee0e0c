//! Dedicated audio thread that handles all playback operations.
//!
//! Loading and seeking decode the file again, which must never stall the
//! game loop's tick.

use crate::system::bus::{AudioBus, AudioCommand};
use crossbeam_channel::RecvTimeoutError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// How often the worker checks whether the track ran out.
const END_POLL_INTERVAL: Duration = Duration::from_millis(20);

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    current_path: Option<PathBuf>,
    volume: f32,
    bus: AudioBus,
}

impl AudioWorker {
    fn new(bus: AudioBus) -> Self {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                (Some(stream), Some(handle))
            }
            Err(e) => {
                log::warn!("AUDIO: No audio device found ({}), running in silent mode", e);
                (None, None)
            }
        };
        Self {
            _stream: stream,
            stream_handle,
            sink: None,
            current_path: None,
            volume: 1.0,
            bus,
        }
    }

    /// Returns false when the thread should exit.
    fn handle_command(&mut self, cmd: AudioCommand) -> bool {
        match cmd {
            AudioCommand::Load { path } => {
                self.current_path = Some(path);
                self.load_from_position(0.0);
            }
            AudioCommand::Play => {
                if let Some(sink) = &self.sink {
                    sink.play();
                    self.set_playing(true);
                }
            }
            AudioCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
                self.set_playing(false);
            }
            AudioCommand::Stop => {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.bus.audio_position.store(0, Ordering::Relaxed);
                self.set_playing(false);
                self.set_live(false);
            }
            AudioCommand::Seek { position_secs } => {
                self.seek_to(position_secs);
            }
            AudioCommand::SetVolume { volume } => {
                self.volume = volume;
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
            AudioCommand::Shutdown => return false,
        }
        true
    }

    fn set_playing(&self, playing: bool) {
        self.bus.audio_playing.store(playing, Ordering::Relaxed);
    }

    fn set_live(&self, live: bool) {
        self.bus.audio_live.store(live, Ordering::Relaxed);
    }

    fn load_from_position(&mut self, position_secs: f64) {
        self.set_live(false);
        let Some(stream_handle) = &self.stream_handle else {
            log::warn!("AUDIO: No output device, track not loaded");
            return;
        };
        let Some(path) = &self.current_path else {
            return;
        };

        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let source = match open_source(path) {
            Ok(source) => source,
            Err(e) => {
                log::error!("AUDIO: {}", e);
                return;
            }
        };

        let sample_rate = source.sample_rate();
        let channels = source.channels();
        self.bus
            .audio_sample_rate
            .store(sample_rate as u64, Ordering::Relaxed);
        self.bus
            .audio_channels
            .store(channels as u64, Ordering::Relaxed);

        let position_secs = position_secs.max(0.0);
        let skipped_samples = (position_secs * sample_rate as f64 * channels as f64) as u64;
        self.bus
            .audio_position
            .store(skipped_samples, Ordering::Relaxed);

        let monitor = AudioMonitor {
            inner: source.skip_duration(Duration::from_secs_f64(position_secs)),
            position_counter: self.bus.audio_position.clone(),
        };

        let sink = match Sink::try_new(stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("AUDIO: Failed to create sink: {}", e);
                return;
            }
        };
        sink.set_volume(self.volume);
        sink.append(monitor);
        sink.pause();

        self.sink = Some(sink);
        self.set_playing(false);
        self.set_live(true);
        self.bus.audio_ended.store(false, Ordering::Relaxed);
        log::info!("AUDIO: Loaded from {:.2}s", position_secs);
    }

    fn seek_to(&mut self, position_secs: f64) {
        let was_playing = self.sink.as_ref().is_some_and(|s| !s.is_paused());

        self.load_from_position(position_secs);

        if was_playing && let Some(sink) = &self.sink {
            sink.play();
            self.set_playing(true);
        }

        log::info!("AUDIO: Seeked to {:.2}s", position_secs);
    }

    /// Marks playback stopped once the sink drained its track.
    fn check_end(&mut self) {
        let drained = self
            .sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && sink.empty());
        if drained && self.bus.audio_playing.load(Ordering::Relaxed) {
            log::info!("AUDIO: Track ended");
            self.set_playing(false);
            self.bus.audio_ended.store(true, Ordering::Relaxed);
        }
    }
}

fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, String> {
    let file = File::open(path).map_err(|e| format!("Cannot open file {:?}: {}", path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| format!("Cannot decode file {:?}: {}", path, e))
}

/// Counts samples as the sink pulls them, publishing the playback position.
struct AudioMonitor<I> {
    inner: I,
    position_counter: Arc<AtomicU64>,
}

impl<I> Iterator for AudioMonitor<I>
where
    I: Iterator,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.position_counter.fetch_add(1, Ordering::Relaxed);
        }
        item
    }
}

impl<I> Source for AudioMonitor<I>
where
    I: Source,
    I::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }
    fn channels(&self) -> u16 {
        self.inner.channels()
    }
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Starts the dedicated audio thread.
pub fn start_audio_thread(bus: AudioBus) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let rx = bus.audio_cmd_rx.clone();
            let mut worker = AudioWorker::new(bus);

            loop {
                match rx.recv_timeout(END_POLL_INTERVAL) {
                    Ok(cmd) => {
                        if !worker.handle_command(cmd) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => worker.check_end(),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            log::info!("AUDIO: Thread stopped");
        })
        .expect("Failed to spawn Audio thread")
}
