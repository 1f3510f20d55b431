use crate::{civil::Month, error};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    DayNotAlwaysInMonth { day: i8, month: Month },
    ToYearBeforeFromYear { from: i16, to: i16 },
    YearNotCovered { year: i16, from: i16, to: Option<i16> },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzRule(err).into()
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
            DayNotAlwaysInMonth { day, month } => write!(
                f,
                "weekday search anchored at day {day} can leave \
                 {month:?} in some years",
            ),
            ToYearBeforeFromYear { from, to } => write!(
                f,
                "transition rule ends in year {to}, \
                 which is before its first year {from}",
            ),
            YearNotCovered { year, from, to: Some(to) } => write!(
                f,
                "transition rule is only valid for years {from} \
                 through {to}, but was asked about year {year}",
            ),
            YearNotCovered { year, from, to: None } => write!(
                f,
                "transition rule is only valid from year {from} \
                 onwards, but was asked about year {year}",
            ),
        }
    }
}
