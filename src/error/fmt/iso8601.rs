use alloc::boxed::Box;

use crate::{error, tz::UtcOffset};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    EmptyAnnotation,
    ExpectedTimeSeparator,
    FailedParse { text: Box<str> },
    MismatchOffset { parsed: UtcOffset, zone: UtcOffset, name: Box<str> },
    MissingOffset,
    TrailingInput { remaining: Box<str> },
    UnterminatedAnnotation,
}

impl Error {
    pub(crate) fn failed_parse(text: &str) -> Error {
        Error::FailedParse { text: text.into() }
    }
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
        error::ErrorKind::FmtIso8601(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            EmptyAnnotation => {
                f.write_str("time zone annotation `[]` has no name")
            }
            ExpectedTimeSeparator => f.write_str(
                "expected `T` or a space between the date and the time",
            ),
            FailedParse { ref text } => write!(
                f,
                "failed to parse {text:?} as an ISO 8601 point in time",
            ),
            MismatchOffset { parsed, zone, ref name } => write!(
                f,
                "parsed UTC offset `{parsed}` does not match offset \
                 `{zone}` of time zone `{name}` at that time",
            ),
            MissingOffset => f.write_str(
                "expected a UTC offset or a time zone annotation \
                 after the time",
            ),
            TrailingInput { ref remaining } => write!(
                f,
                "unparsed input {remaining:?} remains after \
                 point in time",
            ),
            UnterminatedAnnotation => f.write_str(
                "expected `]` to close time zone annotation, \
                 but found end of input",
            ),
        }
    }
}
