//! Built-in tunes.

/// Happy Birthday
/// Score available at https://musescore.com/user/8221/scores/26906
pub const HAPPY_BIRTHDAY: &str = "T140 O4 L4
    C C8 D. C. F. E2.
    C C8 D. C. G. F2.
    C C8 >C.< A. F. E. D.
    A+ A+8 A. F. G. F2.";

/// Rising arpeggio, for boot or success feedback.
pub const POWER_UP: &str = "T200 O5 L16 C E G >C8";

/// Two short high beeps.
pub const ALERT: &str = "T180 O6 A8 P8 A8";

pub const MELODIES: &[&str] = &[HAPPY_BIRTHDAY, POWER_UP, ALERT];
