use tempora::{
    civil::{self, Month, Weekday},
    tz::{TimeZone, UtcOffset},
    PointInTime,
};

use crate::Result;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

#[test]
fn epoch_zero() -> Result {
    let _ = crate::Logger::init();

    let pt = PointInTime::from_epoch_millis(0)?;
    assert_eq!((pt.year(), pt.month(), pt.day()), (1970, Month::January, 1));
    assert_eq!(
        (pt.hour(), pt.minute(), pt.second(), pt.millisecond()),
        (0, 0, 0, 0),
    );
    assert_eq!(pt.weekday(), Weekday::Thursday);
    assert_eq!(pt.day_of_year(), 1);
    assert_eq!(pt.time_zone().name(), "UTC");
    assert_eq!(pt, PointInTime::new(1970, Month::January, 1, 0, 0, 0, 0)?);

    Ok(())
}

#[test]
fn leap_day_2000() -> Result {
    let pt = PointInTime::from_epoch_seconds(951_826_154)?;
    assert_eq!((pt.year(), pt.month(), pt.day()), (2000, Month::February, 29));
    assert_eq!((pt.hour(), pt.minute(), pt.second()), (12, 9, 14));
    assert_eq!(pt.weekday(), Weekday::Tuesday);
    assert_eq!(pt.day_of_year(), 60);
    assert_eq!(pt.epoch_millis(), 951_826_154_000);

    let built = PointInTime::new(2000, Month::February, 29, 12, 9, 14, 0)?;
    assert_eq!(built.epoch_seconds(), 951_826_154);
    assert_eq!(built, pt);

    Ok(())
}

#[test]
fn leap_years() {
    assert!(!civil::is_leap_year(1900));
    assert!(civil::is_leap_year(2000));
    assert!(civil::is_leap_year(0));
    assert!(civil::is_leap_year(-4));
    assert_eq!(civil::days_in_month(1900, Month::February), 28);
    assert_eq!(civil::days_in_month(2000, Month::February), 29);
    assert_eq!(civil::days_in_month(2023, Month::September), 30);
    assert_eq!(civil::days_in_year(1900), 365);
    assert_eq!(civil::days_in_year(2000), 366);

    let err =
        PointInTime::new(1900, Month::February, 29, 0, 0, 0, 0).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.to_string(),
        "Expected day between 1 and 28 inclusive, found 29",
    );
    assert!(PointInTime::new(2000, Month::February, 29, 0, 0, 0, 0).is_ok());
}

#[test]
fn weekday_cycles() {
    assert_eq!(Weekday::Sunday.distance_to(Weekday::Wednesday), 3);
    assert_eq!(Weekday::Wednesday.distance_to(Weekday::Sunday), 4);
    assert_eq!(Weekday::Sunday.distance_from(Weekday::Wednesday), 4);
    assert_eq!(Weekday::Friday.distance_to(Weekday::Friday), 0);

    for wd in WEEKDAYS {
        for n in 0..30 {
            assert_eq!(wd.advance(n).back(n), wd);
            assert_eq!(wd.advance(7 * n), wd);
        }
        assert_eq!(wd.next().previous(), wd);
    }
    assert_eq!(Weekday::Sunday.advance(1), Weekday::Monday);
    assert_eq!(Weekday::Monday.back(1), Weekday::Sunday);
}

#[test]
fn month_cycles() -> Result {
    for number in 1..=12 {
        let month = Month::from_number(number)?;
        assert_eq!(month.to_number(), number);
        for n in 0..30 {
            assert_eq!(month.advance(n).back(n), month);
            assert_eq!(month.advance(12 * n), month);
        }
    }
    assert_eq!(Month::December.advance(1), Month::January);
    assert_eq!(Month::January.back(1), Month::December);
    assert_eq!(Month::March.advance(10), Month::January);
    assert!(Month::from_number(13).unwrap_err().is_invalid_argument());

    Ok(())
}

#[test]
fn weekday_agrees_with_fields() -> Result {
    let cases = [
        (2024, Month::July, 4, Weekday::Thursday),
        (2000, Month::January, 1, Weekday::Saturday),
        (1900, Month::January, 1, Weekday::Monday),
        (1969, Month::December, 31, Weekday::Wednesday),
        (2100, Month::March, 1, Weekday::Monday),
    ];
    for (year, month, day, expected) in cases {
        assert_eq!(civil::weekday(year, month, day), expected);
        let pt = PointInTime::new(year, month, day, 23, 59, 59, 999)?;
        assert_eq!(pt.weekday(), expected, "{pt}");
    }

    Ok(())
}

#[test]
fn month_end_clamping() -> Result {
    let jan31 = PointInTime::new(2024, Month::January, 31, 10, 0, 0, 0)?;
    let feb = jan31.add_months(1)?;
    assert_eq!((feb.month(), feb.day(), feb.hour()), (Month::February, 29, 10));
    let feb = jan31.add_months(13)?;
    assert_eq!((feb.year(), feb.month(), feb.day()), (2025, Month::February, 28));
    let nov = jan31.sub_months(2)?;
    assert_eq!((nov.year(), nov.month(), nov.day()), (2023, Month::November, 30));

    let jan31 = PointInTime::new(2023, Month::January, 31, 10, 0, 0, 0)?;
    assert_eq!(jan31.add_months(1)?.day(), 28);

    let leap = PointInTime::new(2024, Month::February, 29, 0, 0, 0, 0)?;
    let next = leap.add_years(1)?;
    assert_eq!((next.year(), next.month(), next.day()), (2025, Month::February, 28));
    let later = leap.add_years(4)?;
    assert_eq!((later.year(), later.month(), later.day()), (2028, Month::February, 29));

    Ok(())
}

#[test]
fn day_arithmetic_rolls_over() -> Result {
    let pt = PointInTime::new(1999, Month::December, 31, 23, 59, 59, 999)?;
    let next = pt.add_milliseconds(1)?;
    assert_eq!(next, PointInTime::new(2000, Month::January, 1, 0, 0, 0, 0)?);
    assert_eq!(pt.add_days(60)?.to_string(), "2000-02-29T23:59:59.999+00:00[UTC]");
    assert_eq!(pt.add_days(366)?.to_string(), "2000-12-31T23:59:59.999+00:00[UTC]");
    assert_eq!(next.sub_days(1)?.to_string(), "1999-12-31T00:00:00.000+00:00[UTC]");
    assert_eq!(next.sub_minutes(90)?.to_string(), "1999-12-31T22:30:00.000+00:00[UTC]");
    assert_eq!(pt.add_seconds(-59)?.second(), 0);

    let dur = std::time::Duration::from_millis(1_500);
    assert_eq!(pt.checked_add(dur)?.to_string(), "2000-01-01T00:00:01.499+00:00[UTC]");
    assert_eq!((next.clone() - dur).to_string(), "1999-12-31T23:59:58.500+00:00[UTC]");

    Ok(())
}

#[test]
fn range_edges() -> Result {
    let min = PointInTime::from_epoch_millis(PointInTime::MIN_EPOCH_MILLIS)?;
    assert_eq!(min.to_string(), "-009999-01-01T00:00:00.000+00:00[UTC]");
    let max = PointInTime::from_epoch_millis(PointInTime::MAX_EPOCH_MILLIS)?;
    assert_eq!(max.to_string(), "9999-12-31T23:59:59.999+00:00[UTC]");

    assert!(max.add_milliseconds(1).unwrap_err().is_invalid_argument());
    assert!(min.sub_milliseconds(1).unwrap_err().is_invalid_argument());
    assert!(max.add_years(1).is_err());
    assert!(min.sub_days(1).is_err());
    assert!(PointInTime::new(10000, Month::January, 1, 0, 0, 0, 0).is_err());
    assert!(PointInTime::from_epoch_millis(i64::MIN).is_err());
    assert!(PointInTime::from_epoch_seconds(i64::MAX).is_err());

    Ok(())
}

#[test]
fn before_epoch() -> Result {
    let pt = PointInTime::from_epoch_millis(-1)?;
    assert_eq!(pt.to_string(), "1969-12-31T23:59:59.999+00:00[UTC]");
    assert_eq!(pt.epoch_seconds(), -1);
    assert_eq!(pt.weekday(), Weekday::Wednesday);

    let ides = PointInTime::new(-44, Month::March, 15, 12, 0, 0, 0)?;
    assert_eq!(ides.to_string(), "-000044-03-15T12:00:00.000+00:00[UTC]");
    let again = PointInTime::from_epoch_millis(ides.epoch_millis())?;
    assert_eq!(again, ides);
    assert_eq!(
        (again.year(), again.month(), again.day(), again.hour()),
        (-44, Month::March, 15, 12),
    );

    Ok(())
}

#[test]
fn field_updates() -> Result {
    let pt = PointInTime::new(2024, Month::July, 4, 12, 30, 15, 250)?;
    assert_eq!(pt.with_year(2023)?.to_string(), "2023-07-04T12:30:15.250+00:00[UTC]");
    assert_eq!(pt.with_month(Month::February)?.day(), 4);
    assert_eq!(pt.with_day(31)?.to_string(), "2024-07-31T12:30:15.250+00:00[UTC]");
    assert_eq!(pt.with_hour(0)?.hour(), 0);
    assert_eq!(pt.with_minute(59)?.minute(), 59);
    assert_eq!(pt.with_second(0)?.second(), 0);
    assert_eq!(pt.with_millisecond(999)?.millisecond(), 999);

    assert!(pt.with_hour(24).unwrap_err().is_invalid_argument());
    assert!(pt.with_month(Month::June)?.with_day(31).is_err());
    // The original is untouched.
    assert_eq!(pt.to_string(), "2024-07-04T12:30:15.250+00:00[UTC]");

    Ok(())
}

#[test]
fn comparisons() -> Result {
    let a = PointInTime::new(2024, Month::July, 4, 12, 0, 0, 0)?;
    let b = a.add_milliseconds(1)?;
    assert!(a.is_before(&b));
    assert!(b.is_after(&a));
    assert!(!a.is_equal_to(&b));
    assert!(a.is_in_same_second_as(&b));

    let kolkata = a.with_time_zone(TimeZone::fixed(UtcOffset::new(5, 30)?));
    assert!(a.is_equal_to(&kolkata));
    assert_eq!(a, kolkata);
    assert_eq!(kolkata.hour(), 17);
    assert!(!a.is_in_same_hour_as(&kolkata));

    let c = a.with_hour(23)?;
    assert!(a.is_in_same_day_as(&c));
    assert!(!a.is_in_same_hour_as(&c));
    let d = a.add_months(1)?;
    assert!(a.is_in_same_year_as(&d));
    assert!(!a.is_in_same_month_as(&d));

    let mut points = vec![d.clone(), b.clone(), a.clone(), c.clone()];
    points.sort();
    assert_eq!(points, vec![a, b, c, d]);

    Ok(())
}
