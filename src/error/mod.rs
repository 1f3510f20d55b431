use alloc::{boxed::Box, sync::Arc};

pub(crate) mod civil;
pub(crate) mod fmt;
pub(crate) mod tz;

/// An error that can occur in this crate.
///
/// The most common type of error is a field value that is out of range. But
/// other errors exist as well:
///
/// * A UTC offset whose hours and minutes disagree in sign.
/// * A transition rule evaluated for a year it doesn't cover.
/// * Arithmetic that overflows the supported range of years.
/// * Zone lookup failure in a [`ZoneRegistry`](crate::tz::ZoneRegistry).
/// * Parse errors.
///
/// # Introspection is limited
///
/// Other than implementing the [`std::error::Error`] trait when the
/// `std` feature is enabled, the [`core::fmt::Debug`] trait and the
/// [`core::fmt::Display`] trait, this error type currently provides
/// very limited introspection capabilities. Simple predicates like
/// `Error::is_invalid_argument` are provided, but the predicates are not
/// exhaustive. That is, there exist some errors (like arithmetic overflow)
/// that do not return `true` for any of the `Error::is_*` predicates.
///
/// # Design
///
/// This crate follows the "One True God Error Type Pattern," where only one
/// error type exists for a variety of different operations. Finer grained
/// error types exist internally, but they all funnel into this one.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cloneable and cheap to clone.
    /// It also keeps the size of an error equal to one word.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// It is expected to use [`format_args!`](format_args) from
    /// Rust's standard library (available in `core`) to create a
    /// `core::fmt::Arguments`.
    ///
    /// Callers should generally use their own error types. But in some
    /// circumstances, it can be convenient to manufacture an error value
    /// of this crate specifically. For example, when implementing
    /// [`ZoneProvider`](crate::tz::ZoneProvider).
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when this error originated from an argument that is not
    /// valid for the operation it was given to.
    ///
    /// This includes field values outside of their allowed range, UTC
    /// offsets whose hours and minutes conflict in sign, malformed UTC offset
    /// strings and transition rules evaluated outside of their validity
    /// years.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, PointInTime};
    ///
    /// let err = PointInTime::new(1900, Month::February, 29, 0, 0, 0, 0)
    ///     .unwrap_err();
    /// assert!(err.is_invalid_argument());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Expected day between 1 and 28 inclusive, found 29",
    /// );
    /// ```
    pub fn is_invalid_argument(&self) -> bool {
        use self::ErrorKind::*;
        use self::{
            tz::offset::Error as OffsetError, tz::rule::Error as RuleError,
        };

        self.chain().any(|err| {
            matches!(
                *err.kind(),
                Range(_)
                    | TzOffset(
                        OffsetError::SignMismatch { .. }
                            | OffsetError::InvalidFormat { .. }
                    )
                    | TzRule(
                        RuleError::YearNotCovered { .. }
                            | RuleError::ToYearBeforeFromYear { .. }
                            | RuleError::DayNotAlwaysInMonth { .. }
                    )
            )
        })
    }

    /// Returns true when this error originated from text that doesn't match
    /// the expected format. For example, a UTC offset string like `+5:30`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// let err = UtcOffset::parse("+5:30").unwrap_err();
    /// assert!(err.is_invalid_format());
    /// ```
    pub fn is_invalid_format(&self) -> bool {
        use self::ErrorKind::*;
        use self::tz::offset::Error as OffsetError;

        self.chain().any(|err| {
            matches!(
                *err.kind(),
                TzOffset(OffsetError::InvalidFormat { .. })
                    | Fmt(_)
                    | FmtIso8601(_)
                    | FmtStrtime(_)
            )
        })
    }

    /// Returns true when this error originated from looking up a time zone
    /// name that isn't known to a zone provider.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{ZoneProvider, ZoneRegistry};
    ///
    /// let registry = ZoneRegistry::new();
    /// let err = registry.get("Mars/Olympus_Mons").unwrap_err();
    /// assert!(err.is_not_found());
    /// ```
    pub fn is_not_found(&self) -> bool {
        use self::ErrorKind::*;
        use self::tz::db::Error as DbError;

        self.chain().any(|err| {
            matches!(*err.kind(), TzDb(DbError::NotFound { .. }))
        })
    }
}

impl Error {
    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is out
    /// of range. (e.g., "day")
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError::new(what, given, min, max)))
    }

    /// Contextualizes this error with the given consequent.
    ///
    /// The resulting error displays the consequent first, followed by this
    /// error as its cause.
    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let inner = match Arc::try_unwrap(consequent.inner) {
            Ok(inner) => inner,
            // Somebody else holds a clone of the consequent, so we can't
            // steal its kind. Wrap it as an opaque message instead.
            Err(shared) => {
                let message = AdhocError::from_display(&shared.kind);
                ErrorInner { kind: ErrorKind::Adhoc(message), cause: None }
            }
        };
        let ErrorInner { kind, cause } = inner;
        assert!(cause.is_none(), "cause of consequence must be `None`");
        Error { inner: Arc::new(ErrorInner { kind, cause: Some(self) }) }
    }

    /// Returns a chain of error values.
    ///
    /// This starts with the most recent error added to the chain. That is,
    /// the highest level context. The last error in the chain is always the
    /// "root" cause. That is, the error closest to the point where something
    /// has gone wrong.
    ///
    /// The iterator returned is guaranteed to yield at least one error.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Civil(self::civil::Error),
    Fmt(self::fmt::Error),
    FmtIso8601(self::fmt::iso8601::Error),
    FmtStrtime(self::fmt::strtime::Error),
    Range(RangeError),
    TzDb(self::tz::db::Error),
    TzOffset(self::tz::offset::Error),
    TzRule(self::tz::rule::Error),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => msg.fmt(f),
            Civil(ref err) => err.fmt(f),
            Fmt(ref err) => err.fmt(f),
            FmtIso8601(ref err) => err.fmt(f),
            FmtStrtime(ref err) => err.fmt(f),
            Range(ref err) => err.fmt(f),
            TzDb(ref err) => err.fmt(f),
            TzOffset(ref err) => err.fmt(f),
            TzRule(ref err) => err.fmt(f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}

/// A generic error message.
///
/// This supports the `Error::from_args` public API, which permits users of
/// this crate to manifest their own `Error` values from an arbitrary
/// message.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args<'a>(message: core::fmt::Arguments<'a>) -> AdhocError {
        use alloc::string::ToString;

        let message = message.to_string().into_boxed_str();
        AdhocError { message }
    }

    fn from_display(value: &dyn core::fmt::Display) -> AdhocError {
        AdhocError::from_args(format_args!("{value}"))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// An error that occurs when an input value is out of bounds.
///
/// The error message produced by this type will include a name describing
/// which input was out of bounds, the value given and its minimum and maximum
/// allowed values. When the allowed range depends on other fields (like the
/// number of days in February), the range reported is the one computed for
/// those fields.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i128,
    min: i128,
    max: i128,
}

impl RangeError {
    fn new(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> RangeError {
        RangeError {
            what,
            given: given.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RangeError {}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "Expected {what} between {min} and {max} inclusive, \
             found {given}",
        )
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This trait basically exists to make `Error::context` work without needing
/// to rely on public `From` impls.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// A trait for contextualizing error values.
///
/// This makes it easy to contextualize either `Error` or `Result<T, Error>`.
/// Specifically, in the latter case, it absolves one of the need to call
/// `map_err` everywhere one wants to add context to an error.
///
/// This trick was borrowed from `anyhow`.
pub(crate) trait ErrorContext<T> {
    /// Contextualize the given consequent error with this (`self`) error as
    /// the cause.
    ///
    /// This is equivalent to saying that "consequent is caused by self."
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but hides error construction within a closure.
    ///
    /// This is useful if the creation of the consequent error is not otherwise
    /// guarded and when error construction is potentially "costly" (i.e., it
    /// allocates). The closure avoids paying the cost of contextual error
    /// creation in the happy path.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: IntoError,
{
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent))
    }

    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent()))
    }
}
