use alloc::boxed::Box;

use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    InvalidFormat { text: Box<str> },
    SignMismatch { hours: i8, minutes: i8 },
}

impl Error {
    pub(crate) fn invalid_format(text: &str) -> Error {
        Error::InvalidFormat { text: text.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzOffset(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            InvalidFormat { ref text } => write!(
                f,
                "invalid UTC offset {text:?}, expected a sign followed \
                 by two hour digits, an optional colon and two minute \
                 digits (e.g., `+05:30` or `-0800`)",
            ),
            SignMismatch { hours, minutes } => write!(
                f,
                "UTC offset hours ({hours}) and minutes ({minutes}) \
                 must not have opposite signs",
            ),
        }
    }
}
