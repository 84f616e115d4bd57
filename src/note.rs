use core::fmt::{self, Display};

use fugit::HertzU32;

use self::error::Error;

/// Base frequencies (Hz) at octave 4, one row per letter A..G.
/// Columns: natural, flat, sharp.
static BASE_FREQUENCIES: [[u16; 3]; 7] = [
    [440, 415, 466], // A
    [494, 466, 523], // B
    [262, 247, 277], // C
    [294, 277, 311], // D
    [330, 311, 349], // E
    [349, 330, 370], // F
    [392, 370, 415], // G
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    fn row(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Letter {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Letter::*;

        let letter = match byte {
            b'A' => A,
            b'B' => B,
            b'C' => C,
            b'D' => D,
            b'E' => E,
            b'F' => F,
            b'G' => G,
            _ => return Err(Error::InvalidLetter),
        };
        Ok(letter)
    }
}

impl Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Letter::*;
        let symbol = match *self {
            A => "A",
            B => "B",
            C => "C",
            D => "D",
            E => "E",
            F => "F",
            G => "G",
        };

        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Accidental {
    #[default]
    Natural,
    /// `-`
    Flat,
    /// `+`
    Sharp,
}

impl Accidental {
    fn column(self) -> usize {
        match self {
            Accidental::Natural => 0,
            Accidental::Flat => 1,
            Accidental::Sharp => 2,
        }
    }
}

impl Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Accidental::Natural => "",
            Accidental::Flat => "♭",
            Accidental::Sharp => "♯",
        };
        write!(f, "{}", s)
    }
}

/// Pitch class: a letter with its accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl Pitch {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// Frequency of this pitch at octave 4.
    pub fn base_frequency(&self) -> u32 {
        u32::from(BASE_FREQUENCIES[self.letter.row()][self.accidental.column()])
    }

    /// Each octave step doubles or halves the octave 4 frequency.
    pub fn frequency(&self, octave: Octave) -> HertzU32 {
        let base = self.base_frequency();
        let hz = match octave.get() {
            o if o < Octave::DEFAULT.get() => base >> (Octave::DEFAULT.get() - o),
            o if o > Octave::DEFAULT.get() => base << (o - Octave::DEFAULT.get()),
            _ => base,
        };
        HertzU32::from_raw(hz)
    }
}

impl Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental)
    }
}

/// 八度, 取值 1-7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Octave(u8);

impl Octave {
    pub const MIN: Octave = Octave(1);
    pub const MAX: Octave = Octave(7);
    pub const DEFAULT: Octave = Octave(4);

    pub const fn get(self) -> u8 {
        self.0
    }

    /// One octave down, saturating at [`Octave::MIN`].
    #[must_use]
    pub fn lower(self) -> Self {
        if self > Self::MIN {
            Octave(self.0 - 1)
        } else {
            self
        }
    }

    /// One octave up, saturating at [`Octave::MAX`].
    #[must_use]
    pub fn raise(self) -> Self {
        if self < Self::MAX {
            Octave(self.0 + 1)
        } else {
            self
        }
    }
}

impl Default for Octave {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Octave {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Octave(value))
        } else {
            Err(Error::InvalidOctave)
        }
    }
}

impl Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音符时值: a duration denominator (4 = quarter note), optionally dotted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Length {
    pub denominator: f32,
    /// 附点音符
    pub dotted: bool,
}

impl Length {
    /// A parsed denominator of 0 means "not given" and falls back to `default`.
    pub fn resolve(denominator: f32, default: f32, dotted: bool) -> Self {
        let denominator = if denominator != 0.0 {
            denominator
        } else {
            default
        };
        Self {
            denominator,
            dotted,
        }
    }

    /// Length in quarter notes.
    pub fn beats(&self) -> f32 {
        let beats = 4.0 / self.denominator;
        if self.dotted {
            beats * 1.5
        } else {
            beats
        }
    }

    /// Length in milliseconds at `tempo` quarter notes per minute.
    ///
    /// A tempo of 0 yields infinity; it is not rejected here.
    pub fn millis(&self, tempo: f32) -> f32 {
        (60.0 / tempo) * self.beats() * 1000.0
    }
}

impl Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dotted = if self.dotted { "." } else { "" };
        write!(f, "{}{}", self.denominator, dotted)
    }
}

/// A resolved note: what to sound, independent of how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub pitch: Pitch,
    pub octave: Octave,
}

impl Note {
    pub fn frequency(&self) -> HertzU32 {
        self.pitch.frequency(self.octave)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

pub mod error {
    use core::fmt;
    use core::fmt::Display;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Error {
        InvalidLetter,
        InvalidOctave,
    }

    impl Error {
        #[doc(hidden)]
        pub fn __description(&self) -> &str {
            match &self {
                Error::InvalidLetter => "note letter must be one of A..G",
                Error::InvalidOctave => "octave must be between 1 and 7",
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.__description().fmt(f)
        }
    }
}
