use crate::{
    error::{fmt::Error as E, Error},
    tz::UtcOffset,
};

/// Parses exactly `count` ASCII digits from the beginning of `inp`.
///
/// `what` names the value being parsed for error messages.
pub(crate) fn parse_digits<'i>(
    inp: &'i [u8],
    count: u8,
    what: &'static str,
) -> Result<(i64, &'i [u8]), Error> {
    let len = usize::from(count);
    let digits = match inp.get(..len) {
        Some(digits) if digits.iter().all(u8::is_ascii_digit) => digits,
        _ => return Err(E::ExpectedDigits { what, count }.into()),
    };
    let n = digits
        .iter()
        .fold(0i64, |n, &byte| n * 10 + i64::from(byte - b'0'));
    Ok((n, &inp[len..]))
}

/// Parses between one and `max` ASCII digits from the beginning of `inp`.
pub(crate) fn parse_number<'i>(
    inp: &'i [u8],
    max: u8,
    what: &'static str,
) -> Result<(i64, &'i [u8]), Error> {
    let len = inp
        .iter()
        .take(usize::from(max))
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return Err(E::ExpectedDigits { what, count: 1 }.into());
    }
    // `len` is at most `max`, which came from a `u8`.
    parse_digits(inp, len as u8, what)
}

/// Parses the byte `expected` from the beginning of `inp`.
pub(crate) fn parse_byte(inp: &[u8], expected: u8) -> Result<&[u8], Error> {
    match inp.split_first() {
        None => Err(E::ExpectedByteEnd { expected }.into()),
        Some((&got, rest)) if got == expected => Ok(rest),
        Some((&got, _)) => Err(E::ExpectedByte { expected, got }.into()),
    }
}

/// Parses the digits of a fractional second (after the separator) and
/// returns them as milliseconds.
///
/// Up to nine digits are accepted. Anything beyond millisecond precision is
/// truncated.
pub(crate) fn parse_fraction(inp: &[u8]) -> Result<(i16, &[u8]), Error> {
    let len = inp.iter().take(9).take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return Err(E::ExpectedFraction.into());
    }
    let millis = inp[..len]
        .iter()
        .chain(core::iter::repeat(&b'0'))
        .take(3)
        .fold(0i16, |n, &byte| n * 10 + i16::from(byte - b'0'));
    Ok((millis, &inp[len..]))
}

/// How a colon between the hours and minutes of an offset is treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Colon {
    Absent,
    Required,
    Optional,
}

/// Parses a `±HHMM` or `±HH:MM` UTC offset from the beginning of `inp`.
pub(crate) fn parse_offset(
    inp: &[u8],
    colon: Colon,
) -> Result<(UtcOffset, &[u8]), Error> {
    let (sign, inp) = match inp.split_first() {
        Some((&b'+', rest)) => (1, rest),
        Some((&b'-', rest)) => (-1, rest),
        _ => return Err(E::ExpectedOffsetSign.into()),
    };
    let (hours, mut inp) = parse_digits(inp, 2, "offset hours")?;
    match colon {
        Colon::Absent => {}
        Colon::Required => inp = parse_byte(inp, b':')?,
        Colon::Optional => {
            if let Some((&b':', rest)) = inp.split_first() {
                inp = rest;
            }
        }
    }
    let (minutes, inp) = parse_digits(inp, 2, "offset minutes")?;
    // Two digits always fit in an `i8`.
    let offset = UtcOffset::new(sign * hours as i8, sign * minutes as i8)?;
    Ok((offset, inp))
}

/// Matches one of `choices` at the beginning of `inp`, ignoring ASCII case,
/// and returns its index.
///
/// Longer choices should come first when one choice is a prefix of another.
pub(crate) fn parse_choice<'i>(
    inp: &'i [u8],
    choices: &[&str],
    what: &'static str,
) -> Result<(usize, &'i [u8]), Error> {
    for (i, choice) in choices.iter().enumerate() {
        let choice = choice.as_bytes();
        if let Some(candidate) = inp.get(..choice.len()) {
            if candidate.eq_ignore_ascii_case(choice) {
                return Ok((i, &inp[choice.len()..]));
            }
        }
    }
    Err(E::ExpectedChoice { what }.into())
}

/// Writes a year as at least four digits, with a leading `-` for negative
/// years.
pub(crate) fn write_year<W: core::fmt::Write>(
    mut wtr: W,
    year: i16,
) -> core::fmt::Result {
    if year < 0 {
        write!(wtr, "-{:04}", year.unsigned_abs())
    } else {
        write!(wtr, "{year:04}")
    }
}
