use crate::{error, util::escape};

pub(crate) mod iso8601;
pub(crate) mod strtime;

/// Errors shared by the text parsers.
#[derive(Clone, Debug)]
pub(crate) enum Error {
    ExpectedByte { expected: u8, got: u8 },
    ExpectedByteEnd { expected: u8 },
    ExpectedChoice { what: &'static str },
    ExpectedDigits { what: &'static str, count: u8 },
    ExpectedFraction,
    ExpectedOffsetSign,
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Fmt(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            ExpectedByte { expected, got } => write!(
                f,
                "expected `{expected}`, but found `{got}`",
                expected = escape::Byte(expected),
                got = escape::Byte(got),
            ),
            ExpectedByteEnd { expected } => write!(
                f,
                "expected `{expected}`, but found end of input",
                expected = escape::Byte(expected),
            ),
            ExpectedChoice { what } => {
                write!(f, "expected a recognized {what} name")
            }
            ExpectedDigits { what, count } => {
                write!(f, "expected {count} digits for {what}")
            }
            ExpectedFraction => f.write_str(
                "expected at least one digit after the decimal separator",
            ),
            ExpectedOffsetSign => f.write_str(
                "expected `+` or `-` at the start of a UTC offset",
            ),
        }
    }
}
