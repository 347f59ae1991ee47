//! Game signals and sound cues
//!
//! The engine never plays audio itself. It hands every [`GameEvent`] to an
//! [`EventSink`]; [`SoundCues`] turns the ones with a sound into a
//! [`SoundEffect`] for whatever backend the host has.

use crate::sim::GameEvent;

/// Receives game events as they happen
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Logs every event at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        log::debug!("event: {} {:?}", event.name(), event);
    }
}

/// Collects events in order
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Regular food eaten
    EatRegular,
    /// Green food eaten
    EatGreen,
    /// Bonus (purple) food eaten
    EatPurple,
    /// Powerup (orange) food eaten
    EatOrange,
    /// Forbidden fruit touched
    Forbidden,
    /// Ball bounced off an obstacle
    ObstacleHit,
    /// Ball caught by a sticky mine
    StickyMine,
    /// Ball bounced off a wall
    WallHit,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::AteRegular => Some(SoundEffect::EatRegular),
            GameEvent::AteGreen => Some(SoundEffect::EatGreen),
            GameEvent::AteBonus => Some(SoundEffect::EatPurple),
            GameEvent::AtePowerup => Some(SoundEffect::EatOrange),
            GameEvent::ForbiddenDeath => Some(SoundEffect::Forbidden),
            GameEvent::ObstacleHit => Some(SoundEffect::ObstacleHit),
            GameEvent::StuckInMine => Some(SoundEffect::StickyMine),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            _ => None,
        }
    }

    /// Sample file shipped with the web build
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::EatRegular => "assets/sfx/eat-regular-food.wav",
            SoundEffect::EatGreen => "assets/sfx/green-fruit.wav",
            SoundEffect::EatPurple => "assets/sfx/purple-fruit.wav",
            SoundEffect::EatOrange => "assets/sfx/orange-fruit.wav",
            SoundEffect::Forbidden => "assets/sfx/forbidden-fruit.wav",
            SoundEffect::ObstacleHit => "assets/sfx/obstacle-hit.wav",
            SoundEffect::StickyMine => "assets/sfx/sticky-mines.wav",
            SoundEffect::WallHit => "assets/sfx/wall-hit.wav",
        }
    }
}

/// Sink that plays a cue through a host callback
pub struct SoundCues<F: FnMut(SoundEffect)> {
    play: F,
    muted: bool,
}

impl<F: FnMut(SoundEffect)> SoundCues<F> {
    pub fn new(play: F) -> Self {
        Self { play, muted: false }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl<F: FnMut(SoundEffect)> EventSink for SoundCues<F> {
    fn on_event(&mut self, event: &GameEvent) {
        if self.muted {
            return;
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            (self.play)(effect);
        }
    }
}
