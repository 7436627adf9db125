use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::audio::fade::{AudioOp, Crossfader, TICK_RATE};
use crate::audio::scene::SceneType;
use crate::ui::settings::AudioSettings;

pub enum AudioCommand {
    Start,
    Scene(SceneType),
    ToggleMute,
    SetVolume(f32),
}

/// Handle to the ambience thread.
pub struct AmbiencePlayer {
    tx: Sender<AudioCommand>,
    muted: Arc<AtomicBool>,
}

impl AmbiencePlayer {
    pub fn spawn(settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        let muted = Arc::new(AtomicBool::new(false));

        let thread_muted = muted.clone();
        let settings = settings.clone();
        let spawned = std::thread::Builder::new()
            .name("ambience".into())
            .spawn(move || {
                let output: Box<dyn AmbientOutput> = if !settings.enabled {
                    Box::new(SilentOutput)
                } else {
                    match RodioOutput::open(settings.tracks.clone()) {
                        Ok(output) => Box::new(output),
                        Err(e) => {
                            tracing::warn!("no audio output, ambience disabled: {e:#}");
                            Box::new(SilentOutput)
                        }
                    }
                };
                run(rx, output, Crossfader::new(settings.volume), thread_muted);
            });
        if let Err(e) = spawned {
            tracing::warn!("could not start ambience thread: {e}");
        }

        Self { tx, muted }
    }

    pub fn start(&self) {
        self.send(AudioCommand::Start);
    }

    pub fn play_scene(&self, scene: SceneType) {
        self.send(AudioCommand::Scene(scene));
    }

    pub fn toggle_mute(&self) {
        self.send(AudioCommand::ToggleMute);
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(AudioCommand::SetVolume(volume));
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn send(&self, cmd: AudioCommand) {
        // The thread only goes away if audio could not start at all.
        let _ = self.tx.send(cmd);
    }
}

/// Ticks the crossfader on a fixed timer and forwards its operations.
fn run(
    rx: Receiver<AudioCommand>,
    mut output: Box<dyn AmbientOutput>,
    mut fader: Crossfader,
    muted: Arc<AtomicBool>,
) {
    let mut next_tick = Instant::now() + TICK_RATE;

    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        let ops = match rx.recv_timeout(wait) {
            Ok(AudioCommand::Start) => {
                fader.start();
                Vec::new()
            }
            Ok(AudioCommand::Scene(scene)) => {
                if fader.is_transitioning() {
                    tracing::debug!(scene = scene.key(), "crossfade in progress, scene change dropped");
                }
                fader.request(scene)
            }
            Ok(AudioCommand::ToggleMute) => {
                let ops = fader.toggle_mute();
                muted.store(fader.is_muted(), Ordering::Relaxed);
                ops
            }
            Ok(AudioCommand::SetVolume(v)) => fader.set_target_volume(v),
            Err(RecvTimeoutError::Timeout) => {
                next_tick += TICK_RATE;
                fader.tick()
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        for op in ops {
            output.apply(op);
        }
    }
}

/// Where crossfader operations land.
pub trait AmbientOutput {
    fn play(&mut self, scene: SceneType);
    fn set_volume(&mut self, volume: f32);
    fn pause(&mut self);

    fn apply(&mut self, op: AudioOp) {
        match op {
            AudioOp::SetVolume(v) => self.set_volume(v),
            AudioOp::Play(scene) => self.play(scene),
            AudioOp::Pause => self.pause(),
        }
    }
}

struct SilentOutput;

impl AmbientOutput for SilentOutput {
    fn play(&mut self, _: SceneType) {}
    fn set_volume(&mut self, _: f32) {}
    fn pause(&mut self) {}
}

struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
    tracks: BTreeMap<SceneType, PathBuf>,
}

impl RodioOutput {
    fn open(tracks: BTreeMap<SceneType, PathBuf>) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("opening default audio device")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            volume: 0.0,
            tracks,
        })
    }

    fn load(&self, scene: SceneType, sink: &Sink) -> Result<()> {
        match self.tracks.get(&scene) {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening track {}", path.display()))?;
                let decoder = Decoder::new(BufReader::new(file))
                    .with_context(|| format!("decoding track {}", path.display()))?;
                sink.append(decoder.repeat_infinite());
            }
            None => sink.append(SineWave::new(drone_frequency(scene)).amplify(0.15)),
        }
        Ok(())
    }
}

impl AmbientOutput for RodioOutput {
    fn play(&mut self, scene: SceneType) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!("could not create audio sink: {e}");
                return;
            }
        };
        sink.set_volume(self.volume);

        if let Err(e) = self.load(scene, &sink) {
            tracing::warn!(scene = scene.key(), "ambient track unavailable: {e:#}");
            return;
        }
        self.sink = Some(sink);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }
}

/// Hum used when no track file is configured for a scene.
fn drone_frequency(scene: SceneType) -> f32 {
    match scene {
        SceneType::Battle => 110.0,
        SceneType::Dungeon => 65.4,
        SceneType::Forest => 196.0,
        SceneType::Peaceful => 261.6,
        SceneType::Default => 146.8,
    }
}
