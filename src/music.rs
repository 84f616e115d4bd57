//! Notation interpreter.
//!
//! A tune is a string of single-byte directives:
//!
//! | Directive            | Meaning                                   |
//! |----------------------|-------------------------------------------|
//! | `<` / `>`            | octave down / up (clamped to 1..=7)       |
//! | `On`                 | set octave, `n` in 1..=7                  |
//! | `Ln`                 | default length denominator (ignored if 0) |
//! | `Tn`                 | tempo in quarter notes per minute         |
//! | `Pn[.]`              | pause                                     |
//! | `A`..`G` `[-+][n][.]`| note with optional flat/sharp, length, dot|
//!
//! Anything else is skipped.

pub mod parser;

use core::fmt;

use nom::IResult;

use crate::note::{Length, Note, Octave};

/// Borrowed tune text, ending at the end of the slice or at the first NUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tune<'a>(&'a [u8]);

impl Tune<'static> {
    pub const EMPTY: Self = Tune(&[]);
}

impl<'a> Tune<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Tune(&bytes[..end])
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> From<&'a str> for Tune<'a> {
    fn from(s: &'a str) -> Self {
        Tune::new(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Tune<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Tune::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Tune<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Tune::new(bytes)
    }
}

/// Musical parameters changed by control directives.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Quarter notes per minute.
    pub tempo: f32,
    pub octave: Octave,
    /// Denominator used when a note or pause has no length of its own.
    pub default_length: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            octave: Octave::DEFAULT,
            default_length: 4.0,
        }
    }
}

/// One sound (or silence) produced by a parse pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Tone { note: Note, millis: f32 },
    Rest { millis: f32 },
}

impl Event {
    /// Length of the slot this event occupies.
    pub fn millis(&self) -> f32 {
        match *self {
            Event::Tone { millis, .. } | Event::Rest { millis } => millis,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Tone { note, millis } => write!(f, "{} for {}ms", note, millis),
            Event::Rest { millis } => write!(f, "rest for {}ms", millis),
        }
    }
}

/// Cursor over a [`Tune`] plus the settings accumulated so far.
#[derive(Debug, Clone)]
pub struct Music<'a> {
    tune: Tune<'a>,
    pos: usize,
    settings: Settings,
}

impl<'a> Music<'a> {
    pub fn new(tune: impl Into<Tune<'a>>) -> Self {
        Self {
            tune: tune.into(),
            pos: 0,
            settings: Settings::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Tune::EMPTY)
    }

    pub fn tune(&self) -> Tune<'a> {
        self.tune
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `true` while the cursor has not reached the terminator.
    ///
    /// After a note or pause with an explicit length the cursor still rests
    /// on that length, so a tune ending in `P4` keeps playing until the pass
    /// that steps over the `4`.
    pub fn is_playing(&self) -> bool {
        self.pos < self.tune.len()
    }

    fn rest(&self) -> &'a [u8] {
        &self.tune.as_bytes()[self.pos..]
    }

    /// Runs `parser` at the cursor and moves past whatever it consumed.
    fn take<O>(
        &mut self,
        mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    ) -> Option<O> {
        let input = self.rest();
        let (rest, output) = parser(input).ok()?;
        self.pos += input.len() - rest.len();
        Some(output)
    }

    /// Length operand of a note or pause. When digits were given the cursor
    /// is left on the last byte of the operand.
    fn length(&mut self) -> Length {
        let start = self.pos;
        let (denominator, dotted) = self.take(parser::length).unwrap_or((0.0, false));
        if self.tune.as_bytes()[start..self.pos]
            .first()
            .is_some_and(u8::is_ascii_digit)
        {
            self.pos -= 1;
        }
        Length::resolve(denominator, self.settings.default_length, dotted)
    }

    /// Number operand of `L` and `T`. With no digits the byte following the
    /// directive is swallowed too.
    fn operand(&mut self) -> f32 {
        let start = self.pos;
        let number = self.take(parser::number).unwrap_or(0.0);
        if self.pos == start && self.is_playing() {
            self.pos += 1;
        }
        number
    }

    /// Applies control directives until a note or pause is found.
    ///
    /// Returns `None` once the terminator is reached.
    pub fn next_event(&mut self) -> Option<Event> {
        while let Some(&directive) = self.rest().first() {
            match directive {
                b'<' => {
                    self.settings.octave = self.settings.octave.lower();
                    self.pos += 1;
                }
                b'>' => {
                    self.settings.octave = self.settings.octave.raise();
                    self.pos += 1;
                }
                b'O' => {
                    self.pos += 1;
                    if let Some(octave) = self.take(parser::octave) {
                        self.settings.octave = octave;
                    }
                }
                b'L' => {
                    self.pos += 1;
                    let length = self.operand();
                    if length != 0.0 {
                        self.settings.default_length = length;
                    }
                }
                b'T' => {
                    self.pos += 1;
                    self.settings.tempo = self.operand();
                }
                b'P' => {
                    self.pos += 1;
                    let millis = self.length().millis(self.settings.tempo);
                    return Some(Event::Rest { millis });
                }
                b'A'..=b'G' => {
                    let pitch = self.take(parser::pitch)?;
                    let note = Note {
                        pitch,
                        octave: self.settings.octave,
                    };
                    let millis = self.length().millis(self.settings.tempo);
                    return Some(Event::Tone { note, millis });
                }
                _ => self.pos += 1,
            }
        }
        None
    }
}

impl<'a> Iterator for Music<'a> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
