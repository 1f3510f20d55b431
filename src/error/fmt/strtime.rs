use alloc::boxed::Box;

use crate::{error, util::escape};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    ColonCount { directive: u8 },
    DirectiveFailure { directive: u8, colons: u8 },
    ExpectedNonEmpty { directive: u8 },
    FailedStrftime,
    FailedStrptime,
    MismatchDayOfYear { parsed: i16, got: i16 },
    MissingField { what: &'static str },
    UnconsumedInput { remaining: Box<str> },
    UnexpectedEndAfterPercent,
    UnknownDirective { directive: u8 },
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
        error::ErrorKind::FmtStrtime(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            ColonCount { directive } => write!(
                f,
                "invalid number of `:` in `%{directive}` directive",
                directive = escape::Byte(directive),
            ),
            DirectiveFailure { directive, colons } => {
                f.write_str("%")?;
                for _ in 0..colons {
                    f.write_str(":")?;
                }
                write!(f, "{} failed", escape::Byte(directive))
            }
            ExpectedNonEmpty { directive } => write!(
                f,
                "expected non-empty input for directive `%{directive}`, \
                 but found end of input",
                directive = escape::Byte(directive),
            ),
            FailedStrftime => f.write_str("strftime formatting failed"),
            FailedStrptime => f.write_str("strptime parsing failed"),
            MismatchDayOfYear { parsed, got } => write!(
                f,
                "parsed day of year `{parsed}` does not match \
                 day of year `{got}` from parsed date",
            ),
            MissingField { what } => write!(
                f,
                "parsed input has no {what}, which is required \
                 to build a point in time",
            ),
            UnconsumedInput { ref remaining } => write!(
                f,
                "strptime expects to consume the entire input, but \
                 {remaining:?} remains unparsed",
            ),
            UnexpectedEndAfterPercent => f.write_str(
                "invalid format string, expected byte after `%`, \
                 but found end of format string",
            ),
            UnknownDirective { directive } => write!(
                f,
                "found unrecognized specifier directive `%{directive}`",
                directive = escape::Byte(directive),
            ),
        }
    }
}
