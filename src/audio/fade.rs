use std::time::Duration;

use crate::audio::scene::SceneType;

pub const TICK_RATE: Duration = Duration::from_millis(50);
pub const CROSSFADE_DURATION: Duration = Duration::from_millis(500);
pub const MUTE_FADE_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Linear volume ramp over a fixed number of timer ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    ticks: u32,
    tick: u32,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        let ticks = (duration.as_millis() / TICK_RATE.as_millis()).max(1) as u32;
        Self {
            from,
            to,
            ticks,
            tick: 0,
        }
    }

    #[cfg(test)]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_done(&self) -> bool {
        self.from == self.to || self.tick >= self.ticks
    }

    /// Advance one tick and return the volume to apply.
    pub fn step(&mut self) -> f32 {
        if self.is_done() {
            return self.to;
        }

        self.tick += 1;
        if self.tick >= self.ticks {
            return self.to;
        }

        let progress = self.tick as f32 / self.ticks as f32;
        (self.from + (self.to - self.from) * progress).clamp(0.0, 1.0)
    }
}

/// What the output device should do after a crossfader call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioOp {
    SetVolume(f32),
    Play(SceneType),
    Pause,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Muting(Fade),
    FadingOut { next: SceneType, fade: Fade },
    FadingIn(Fade),
}

/// Keeps at most one ambient track playing and fades between tracks.
///
/// The crossfader never touches a device itself. Each call returns the
/// operations to perform, and `tick` is expected every [`TICK_RATE`].
/// Only one fade runs at a time: a scene change requested while a
/// crossfade is in progress is dropped.
#[derive(Debug, Clone)]
pub struct Crossfader {
    current: Option<SceneType>,
    playing: bool,
    volume: f32,
    target_volume: f32,
    muted: bool,
    started: bool,
    phase: Phase,
}

impl Default for Crossfader {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

impl Crossfader {
    pub fn new(target_volume: f32) -> Self {
        Self {
            current: None,
            playing: false,
            volume: 0.0,
            target_volume: target_volume.clamp(0.0, 1.0),
            muted: false,
            started: false,
            phase: Phase::Idle,
        }
    }

    /// Nothing plays before the first user interaction.
    pub fn start(&mut self) {
        self.started = true;
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<SceneType> {
        self.current
    }

    #[cfg(test)]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::FadingOut { .. } | Phase::FadingIn(_))
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Switch ambience to `scene`.
    pub fn request(&mut self, scene: SceneType) -> Vec<AudioOp> {
        if !self.started || self.is_transitioning() {
            return Vec::new();
        }
        if self.current == Some(scene) && self.playing {
            return Vec::new();
        }

        if self.playing && self.volume > 0.0 {
            self.phase = Phase::FadingOut {
                next: scene,
                fade: Fade::new(self.volume, 0.0, CROSSFADE_DURATION),
            };
            return Vec::new();
        }

        let mut ops = Vec::new();
        if self.playing {
            ops.push(AudioOp::Pause);
        }
        self.swap_to(scene, &mut ops);
        ops
    }

    pub fn toggle_mute(&mut self) -> Vec<AudioOp> {
        if self.current.is_none() {
            return Vec::new();
        }
        self.muted = !self.muted;
        let target = self.audible_volume();

        match &self.phase {
            Phase::FadingOut { .. } => {}
            Phase::FadingIn(_) => {
                self.phase = Phase::FadingIn(Fade::new(self.volume, target, MUTE_FADE_DURATION));
            }
            Phase::Idle | Phase::Muting(_) => {
                self.phase = if self.playing {
                    Phase::Muting(Fade::new(self.volume, target, MUTE_FADE_DURATION))
                } else {
                    Phase::Idle
                };
            }
        }
        Vec::new()
    }

    pub fn set_target_volume(&mut self, volume: f32) -> Vec<AudioOp> {
        self.target_volume = volume.clamp(0.0, 1.0);
        if self.phase == Phase::Idle && self.playing && !self.muted {
            self.volume = self.target_volume;
            return vec![AudioOp::SetVolume(self.volume)];
        }
        Vec::new()
    }

    /// One timer tick.
    pub fn tick(&mut self) -> Vec<AudioOp> {
        let mut ops = Vec::new();

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Muting(mut fade) => {
                self.apply_step(&mut fade, &mut ops);
                if !fade.is_done() {
                    self.phase = Phase::Muting(fade);
                }
            }
            Phase::FadingIn(mut fade) => {
                self.apply_step(&mut fade, &mut ops);
                if !fade.is_done() {
                    self.phase = Phase::FadingIn(fade);
                }
            }
            Phase::FadingOut { next, mut fade } => {
                self.apply_step(&mut fade, &mut ops);
                if fade.is_done() {
                    ops.push(AudioOp::Pause);
                    self.playing = false;
                    self.swap_to(next, &mut ops);
                } else {
                    self.phase = Phase::FadingOut { next, fade };
                }
            }
        }

        ops
    }

    fn apply_step(&mut self, fade: &mut Fade, ops: &mut Vec<AudioOp>) {
        self.volume = fade.step();
        ops.push(AudioOp::SetVolume(self.volume));
    }

    fn swap_to(&mut self, scene: SceneType, ops: &mut Vec<AudioOp>) {
        self.current = Some(scene);
        self.playing = true;
        self.volume = 0.0;
        ops.push(AudioOp::SetVolume(0.0));
        ops.push(AudioOp::Play(scene));

        self.phase = if self.muted {
            Phase::Idle
        } else {
            Phase::FadingIn(Fade::new(0.0, self.target_volume, CROSSFADE_DURATION))
        };
    }

    fn audible_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.target_volume
        }
    }
}
