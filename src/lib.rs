//! Non-blocking tune interpreter for buzzer-equipped boards.
//!
//! A [`Player`] walks a compact music notation (see [`music`]) one event at a
//! time and asks a [`Buzzer`] to sound each note, so a melody plays in the
//! background while the main loop keeps calling [`Player::update`].
//!
//! ```
//! use tunebox::{Buzzer, Duration, Instant, Player};
//! use fugit::HertzU32;
//!
//! struct Silent;
//!
//! impl Buzzer for Silent {
//!     fn tone(&mut self, _frequency: HertzU32, _duration: Duration) {}
//! }
//!
//! let mut player = Player::new(Silent);
//! player.play("T120 O4 C E G", Instant::from_ticks(0));
//!
//! let mut now = 0;
//! while player.is_playing() {
//!     player.update(Instant::from_ticks(now));
//!     now += 10;
//! }
//! assert_eq!(now, 1010);
//! ```
#![cfg_attr(not(test), no_std)]

pub mod melody;
pub mod music;
pub mod note;
pub mod player;

pub use music::{Event, Music, Settings, Tune};
pub use note::{Accidental, Letter, Length, Note, Octave, Pitch};
pub use player::{Buzzer, Duration, Instant, Player, ARTICULATION};
