//! Lexical pieces of the tune notation.
//!
//! Every parser works on the remaining bytes of a tune and never looks past
//! the slice, so the terminator is simply the end of the input.

use nom::{
    character::complete::{char, digit0, one_of, satisfy},
    combinator::{map, map_res, opt},
    number::complete::u8 as byte,
    sequence::pair,
    IResult,
};

use crate::note::{Accidental, Letter, Octave, Pitch};

/// Consecutive ASCII digits as a base-10 number.
///
/// Yields `0.0` and consumes nothing when the input does not start with a
/// digit; callers treat that as "no operand".
pub fn number(input: &[u8]) -> IResult<&[u8], f32> {
    map(digit0, |digits: &[u8]| {
        digits
            .iter()
            .fold(0.0f32, |acc, d| acc * 10.0 + f32::from(d - b'0'))
    })(input)
}

/// A single octave digit `1`..`7`.
pub fn octave(input: &[u8]) -> IResult<&[u8], Octave> {
    map_res(satisfy(|c| c.is_ascii_digit()), |c: char| {
        Octave::try_from(c as u8 - b'0')
    })(input)
}

pub fn letter(input: &[u8]) -> IResult<&[u8], Letter> {
    map_res(byte, Letter::try_from)(input)
}

/// Optional `-` (flat) or `+` (sharp).
pub fn accidental(input: &[u8]) -> IResult<&[u8], Accidental> {
    map(opt(one_of(&b"-+"[..])), |sign| match sign {
        Some('-') => Accidental::Flat,
        Some(_) => Accidental::Sharp,
        None => Accidental::Natural,
    })(input)
}

pub fn dotted(input: &[u8]) -> IResult<&[u8], bool> {
    map(opt(char('.')), |dot| dot.is_some())(input)
}

pub fn pitch(input: &[u8]) -> IResult<&[u8], Pitch> {
    map(pair(letter, accidental), |(letter, accidental)| {
        Pitch::new(letter, accidental)
    })(input)
}

/// Denominator (0.0 when absent) and dotted flag.
pub fn length(input: &[u8]) -> IResult<&[u8], (f32, bool)> {
    pair(number, dotted)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        assert_eq!(number(b"120 C"), Ok((&b" C"[..], 120.0)));
        assert_eq!(number(b"8."), Ok((&b"."[..], 8.0)));
        assert_eq!(number(b"007"), Ok((&b""[..], 7.0)));
    }

    #[test]
    fn test_number_without_digits() {
        assert_eq!(number(b"C4"), Ok((&b"C4"[..], 0.0)));
        assert_eq!(number(b""), Ok((&b""[..], 0.0)));
    }

    #[test]
    fn test_octave() {
        let five = Octave::try_from(5u8).unwrap();
        assert_eq!(octave(b"5C"), Ok((&b"C"[..], five)));
        assert!(octave(b"0").is_err());
        assert!(octave(b"8").is_err());
        assert!(octave(b"C").is_err());
        assert!(octave(b"").is_err());
    }

    #[test]
    fn test_accidental() {
        assert_eq!(accidental(b"-4"), Ok((&b"4"[..], Accidental::Flat)));
        assert_eq!(accidental(b"+"), Ok((&b""[..], Accidental::Sharp)));
        assert_eq!(accidental(b"4"), Ok((&b"4"[..], Accidental::Natural)));
    }

    #[test]
    fn test_pitch() {
        let (rest, parsed) = pitch(b"F+8.").unwrap();
        assert_eq!(rest, &b"8."[..]);
        assert_eq!(parsed, Pitch::new(Letter::F, Accidental::Sharp));

        assert!(pitch(b"H").is_err());
    }

    #[test]
    fn test_length() {
        assert_eq!(length(b"8. C"), Ok((&b" C"[..], (8.0, true))));
        assert_eq!(length(b". C"), Ok((&b" C"[..], (0.0, true))));
        assert_eq!(length(b"16C"), Ok((&b"C"[..], (16.0, false))));
        assert_eq!(length(b""), Ok((&b""[..], (0.0, false))));
    }
}
