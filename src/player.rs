use fugit::HertzU32;
use log::{debug, trace};

use crate::music::{Event, Music, Settings, Tune};

/// Millisecond instant, as read from the host's monotonic clock.
pub type Instant = fugit::TimerInstantU64<1000>;
pub type Duration = fugit::TimerDurationU64<1000>;

/// Fraction of a note's slot during which the tone actually sounds.
pub const ARTICULATION: f32 = 0.85;

/// A single tone-generating output.
///
/// The output pin is configured when the implementor is built; the player
/// only asks it to sound.
pub trait Buzzer {
    /// Start sounding `frequency` for `duration`. Must not block.
    fn tone(&mut self, frequency: HertzU32, duration: Duration);

    /// Called on every [`Player::update`], so a buzzer without a hardware
    /// timer can end its tone on time.
    fn update(&mut self, _now: Instant) {}
}

impl<B: Buzzer + ?Sized> Buzzer for &mut B {
    fn tone(&mut self, frequency: HertzU32, duration: Duration) {
        (**self).tone(frequency, duration)
    }

    fn update(&mut self, now: Instant) {
        (**self).update(now)
    }
}

/// Plays one tune at a time on a [`Buzzer`] without blocking.
///
/// Nothing happens on its own: [`Player::update`] has to be called from the
/// main loop (or a periodic task) more often than the shortest note of the
/// tune, otherwise notes are stretched to the polling period.
pub struct Player<'a, B: Buzzer> {
    music: Music<'a>,
    next_event: Instant,
    buzzer: B,
}

impl<'a, B: Buzzer> Player<'a, B> {
    pub fn new(buzzer: B) -> Self {
        Player {
            music: Music::empty(),
            next_event: Instant::from_ticks(0),
            buzzer,
        }
    }

    /// Start `tune` from the beginning with default tempo, octave and length.
    pub fn play(&mut self, tune: impl Into<Tune<'a>>, now: Instant) {
        self.music = Music::new(tune);
        self.next_event = now;
        debug!("play: {} bytes", self.music.tune().len());
    }

    /// Drop the current tune. A tone already sounding is not cut short.
    pub fn stop(&mut self) {
        if self.music.is_playing() {
            debug!("stop at {}", self.music.position());
        }
        self.music = Music::empty();
    }

    /// Advance playback. Does nothing until the current event's slot is over.
    pub fn update(&mut self, now: Instant) {
        self.buzzer.update(now);

        if now < self.next_event || !self.music.is_playing() {
            return;
        }

        let Some(event) = self.music.next_event() else {
            debug!("tune finished");
            return;
        };
        trace!("{} at {}", event, now.ticks());

        if let Event::Tone { note, millis } = event {
            self.buzzer.tone(note.frequency(), to_duration(millis * ARTICULATION));
        }
        self.next_event = now + to_duration(event.millis());
    }

    pub fn is_playing(&self) -> bool {
        self.music.is_playing()
    }

    pub fn settings(&self) -> &Settings {
        self.music.settings()
    }

    /// Cursor into the current tune.
    pub fn position(&self) -> usize {
        self.music.position()
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }

    pub fn buzzer_mut(&mut self) -> &mut B {
        &mut self.buzzer
    }

    pub fn free(self) -> B {
        self.buzzer
    }
}

// Saturates through u32, so a zero tempo parks the player for ~49 days
// instead of wrapping the deadline.
fn to_duration(millis: f32) -> Duration {
    Duration::millis(u64::from(millis as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        tones: Vec<(u32, u64)>,
        updates: usize,
    }

    impl Buzzer for Recorder {
        fn tone(&mut self, frequency: HertzU32, duration: Duration) {
            self.tones.push((frequency.raw(), duration.ticks()));
        }

        fn update(&mut self, _now: Instant) {
            self.updates += 1;
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    #[test]
    fn test_new_player_is_stopped() {
        let mut player = Player::new(Recorder::default());
        assert!(!player.is_playing());
        player.update(at(0));
        assert!(player.buzzer().tones.is_empty());
    }

    #[test]
    fn test_playing_before_first_update() {
        let mut player = Player::new(Recorder::default());
        player.play("C", at(0));
        assert!(player.is_playing());
        assert!(player.buzzer().tones.is_empty());
    }

    #[test]
    fn test_empty_tune_is_not_playing() {
        let mut player = Player::new(Recorder::default());
        player.play("", at(0));
        assert!(!player.is_playing());
        player.play("\0C", at(0));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_tone_is_articulated() {
        let mut player = Player::new(Recorder::default());
        player.play("T120 O4 C", at(10));
        player.update(at(10));
        assert_eq!(player.buzzer().tones, vec![(262, 425)]);
    }

    #[test]
    fn test_update_before_deadline_is_noop() {
        let mut player = Player::new(Recorder::default());
        player.play("C D", at(0));
        player.update(at(0));
        let position = player.position();

        for ms in [1, 100, 250, 499] {
            player.update(at(ms));
        }
        assert_eq!(player.buzzer().tones.len(), 1);
        assert_eq!(player.position(), position);

        player.update(at(500));
        assert_eq!(player.buzzer().tones, vec![(262, 425), (294, 425)]);
    }

    #[test]
    fn test_deadline_counts_from_update_time() {
        let mut player = Player::new(Recorder::default());
        player.play("C8 C8", at(0));
        player.update(at(0));
        // polled late: the next slot starts when the update actually ran
        player.update(at(300));
        player.update(at(549));
        assert_eq!(player.buzzer().tones.len(), 2);
        assert_eq!(player.next_event, at(550));
    }

    #[test]
    fn test_last_note_plays_out() {
        let mut player = Player::new(Recorder::default());
        player.play("C D2", at(0));
        player.update(at(0));
        player.update(at(500));
        assert_eq!(player.buzzer().tones, vec![(262, 425), (294, 850)]);

        player.update(at(1499));
        assert!(player.is_playing());
        player.update(at(1500));
        assert!(!player.is_playing());
        assert_eq!(player.buzzer().tones.len(), 2);
    }

    #[test]
    fn test_rest_is_silent() {
        let mut player = Player::new(Recorder::default());
        player.play("P2 C", at(0));
        player.update(at(0));
        assert!(player.buzzer().tones.is_empty());
        player.update(at(999));
        assert!(player.buzzer().tones.is_empty());
        player.update(at(1000));
        assert_eq!(player.buzzer().tones.len(), 1);
    }

    #[test]
    fn test_stop() {
        let mut player = Player::new(Recorder::default());
        player.play("CDEFGAB", at(0));
        player.update(at(0));
        player.stop();
        assert!(!player.is_playing());
        player.update(at(10_000));
        assert_eq!(player.buzzer().tones.len(), 1);

        // stopping twice is harmless
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_play_restarts_with_defaults() {
        let mut player = Player::new(Recorder::default());
        player.play("T60 L8 O6 C", at(0));
        player.update(at(0));
        assert_eq!(player.settings().tempo, 60.0);

        player.play("C", at(5));
        assert_eq!(player.position(), 0);
        assert_eq!(*player.settings(), Settings::default());
        player.update(at(5));
        assert_eq!(player.buzzer().tones[1], (262, 425));
    }

    #[test]
    fn test_zero_tempo_parks_player() {
        let mut player = Player::new(Recorder::default());
        player.play("T0 C D", at(0));
        player.update(at(0));
        assert_eq!(player.next_event, at(u64::from(u32::MAX)));
        player.update(at(1_000_000));
        assert_eq!(player.buzzer().tones.len(), 1);
    }

    #[test]
    fn test_buzzer_sees_every_update() {
        let mut player = Player::new(Recorder::default());
        player.update(at(0));
        player.play("C", at(0));
        player.update(at(1));
        player.update(at(2));
        assert_eq!(player.free().updates, 3);
    }

    #[test]
    fn test_borrowed_buzzer() {
        let mut recorder = Recorder::default();
        {
            let mut player = Player::new(&mut recorder);
            player.play("A", at(0));
            player.update(at(0));
        }
        assert_eq!(recorder.tones, vec![(440, 425)]);
    }
}
