//! Sound and haptic cues
//!
//! The simulation only names cues; an external backend plays them. Playback
//! is fire-and-forget and never blocks a frame.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Bullet or splash fired
    Shoot,
    /// Monster killed, board cleared
    Explosion,
    /// Projectile hit a monster that survived
    Hit,
    /// Player level-up or defense buff
    LevelUp,
    /// Village destroyed
    GameOver,
}

impl SoundEffect {
    /// Stable cue name handed to the backend
    pub fn cue_name(self) -> &'static str {
        match self {
            Self::Shoot => "shoot",
            Self::Explosion => "explosion",
            Self::Hit => "hit",
            Self::LevelUp => "level_up",
            Self::GameOver => "game_over",
        }
    }

    /// Per-cue mix level
    pub fn base_volume(self) -> f32 {
        match self {
            Self::Shoot => 0.3,
            Self::Explosion => 0.6,
            Self::Hit => 0.2,
            Self::LevelUp => 0.8,
            Self::GameOver => 1.0,
        }
    }
}

/// Vibration strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Haptic {
    Light,
    Medium,
    Heavy,
}

/// Playback backend
pub trait CuePlayer {
    /// Start a one-shot cue at `volume` (0-1)
    fn play(&mut self, cue: &'static str, volume: f32);
    fn vibrate(&mut self, strength: Haptic);
    fn set_music(&mut self, playing: bool);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: &'static str, volume: f32) {
        log::trace!("sound {cue} at {volume:.2}");
    }

    fn vibrate(&mut self, strength: Haptic) {
        log::trace!("vibrate {strength:?}");
    }

    fn set_music(&mut self, playing: bool) {
        log::trace!("music {}", if playing { "on" } else { "off" });
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn CuePlayer>,
    master_volume: f32,
    sfx_volume: f32,
    sound_enabled: bool,
    music_enabled: bool,
    music_playing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogCuePlayer))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("sound_enabled", &self.sound_enabled)
            .field("music_enabled", &self.music_enabled)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn CuePlayer>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            sound_enabled: true,
            music_enabled: true,
            music_playing: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Toggling music off stops the background track immediately
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.stop_music();
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.sound_enabled {
            self.master_volume * self.sfx_volume * effect.base_volume()
        } else {
            0.0
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect.cue_name(), vol);
    }

    /// Haptics follow the sound toggle
    pub fn vibrate(&mut self, strength: Haptic) {
        if self.sound_enabled {
            self.backend.vibrate(strength);
        }
    }

    pub fn start_music(&mut self) {
        if self.music_enabled && !self.music_playing {
            self.music_playing = true;
            self.backend.set_music(true);
        }
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.music_playing = false;
            self.backend.set_music(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(&'static str, f32)>,
        vibrations: Vec<Haptic>,
        music: Vec<bool>,
    }

    struct Shared(Rc<RefCell<Recorder>>);

    impl CuePlayer for Shared {
        fn play(&mut self, cue: &'static str, volume: f32) {
            self.0.borrow_mut().played.push((cue, volume));
        }
        fn vibrate(&mut self, strength: Haptic) {
            self.0.borrow_mut().vibrations.push(strength);
        }
        fn set_music(&mut self, playing: bool) {
            self.0.borrow_mut().music.push(playing);
        }
    }

    fn manager() -> (AudioManager, Rc<RefCell<Recorder>>) {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        (AudioManager::new(Box::new(Shared(rec.clone()))), rec)
    }

    #[test]
    fn test_volume_mix() {
        let (mut audio, rec) = manager();
        audio.set_master_volume(0.5);
        audio.play(SoundEffect::GameOver);
        let played = &rec.borrow().played;
        assert_eq!(played[0].0, "game_over");
        assert!((played[0].1 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sound_toggle_silences_cues_and_haptics() {
        let (mut audio, rec) = manager();
        audio.set_sound_enabled(false);
        audio.play(SoundEffect::Shoot);
        audio.vibrate(Haptic::Heavy);
        assert!(rec.borrow().played.is_empty());
        assert!(rec.borrow().vibrations.is_empty());
    }

    #[test]
    fn test_music_toggle() {
        let (mut audio, rec) = manager();
        audio.start_music();
        audio.start_music();
        audio.set_music_enabled(false);
        audio.start_music();
        assert_eq!(rec.borrow().music, vec![true, false]);
    }
}
