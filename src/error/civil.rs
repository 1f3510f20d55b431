use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    FailedAddDays { days: i64 },
    FailedAddMilliseconds { milliseconds: i64 },
    FailedAddMonths { months: i64 },
    FailedAddYears { years: i64 },
    OverflowDuration,
    OverflowUnit { unit: &'static str },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Civil(err).into()
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
            FailedAddDays { days } => {
                write!(f, "failed to add {days} days to point in time")
            }
            FailedAddMilliseconds { milliseconds } => write!(
                f,
                "failed to add {milliseconds} milliseconds to point in time",
            ),
            FailedAddMonths { months } => {
                write!(f, "failed to add {months} months to point in time")
            }
            FailedAddYears { years } => {
                write!(f, "failed to add {years} years to point in time")
            }
            OverflowDuration => f.write_str(
                "duration is too big to be expressed in milliseconds",
            ),
            OverflowUnit { unit } => write!(
                f,
                "number of {unit} overflowed when converted \
                 to milliseconds",
            ),
        }
    }
}
