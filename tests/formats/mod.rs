use tempora::{
    civil::Month,
    fmt::{iso8601, strtime, strtime::Strtime, Formatter},
    tz::{TimeZone, UtcOffset},
    PointInTime,
};

use crate::Result;

/// Formats and parses through any `Formatter`, the way a caller generic over
/// the formatting engine would.
fn reformat(
    fmt: &dyn Formatter,
    text: &str,
    from: &str,
    to: &str,
) -> std::result::Result<String, tempora::Error> {
    let pt = fmt.parse(text, from)?;
    fmt.format(&pt, to)
}

#[test]
fn formatter_contract() -> Result {
    let fmt = Strtime::new();
    let pt = PointInTime::from_epoch_seconds(951_826_154)?;
    assert_eq!(fmt.format(&pt, "%Y-%m-%d %H:%M:%S")?, "2000-02-29 12:09:14");
    assert_eq!(fmt.parse("2000-02-29 12:09:14", "%Y-%m-%d %H:%M:%S")?, pt);

    assert_eq!(
        reformat(&fmt, "29/02/2000 07:09 -0500", "%d/%m/%Y %H:%M %z", "%FT%T%:z")?,
        "2000-02-29T07:09:00-05:00",
    );
    assert!(reformat(&fmt, "31/02/2000 07:09", "%d/%m/%Y %H:%M", "%F").is_err());

    Ok(())
}

#[test]
fn strtime_names() -> Result {
    let tz = TimeZone::fixed(UtcOffset::new(-5, -30)?);
    let pt = PointInTime::new_in(tz, 2024, Month::July, 4, 9, 5, 3, 7)?;
    assert_eq!(
        strtime::format("%A %a %B %b %h %e|%j|%f|%Z|%z|%%", &pt)?,
        "Thursday Thu July Jul Jul  4|186|007|-05:30|-0530|%",
    );

    let parsed = strtime::parse("%a, %d %b %Y %T %z", "thu, 04 JUL 2024 09:05:03 -0530")?;
    assert_eq!(parsed.epoch_millis(), pt.epoch_millis() - 7);
    assert_eq!(parsed.offset(), UtcOffset::new(-5, -30)?);

    let err = strtime::parse("%Y-%m-%d", "2024-07-04 extra").unwrap_err();
    assert!(err.is_invalid_format());

    Ok(())
}

#[test]
fn iso8601_forms() -> Result {
    let pt = PointInTime::from_epoch_seconds(951_826_154)?;
    assert_eq!(pt.to_string(), "2000-02-29T12:09:14.000+00:00[UTC]");
    assert_eq!(iso8601::format(&pt), pt.to_string());
    assert_eq!(format!("{pt:?}"), "PointInTime(2000-02-29T12:09:14.000+00:00[UTC])");

    for text in [
        "2000-02-29T12:09:14Z",
        "2000-02-29t12:09:14.000z",
        "2000-02-29 13:09:14+01:00",
        "2000-02-29T07:09:14.000-0500",
        "2000-02-29T12:09:14.000+00:00[UTC]",
    ] {
        let got: PointInTime = text.parse()?;
        assert_eq!(got, pt, "{text}");
    }

    let offset: PointInTime = "2000-02-29T17:39:14+05:30".parse()?;
    assert_eq!(offset.to_string(), "2000-02-29T17:39:14.000+05:30[+05:30]");
    let again: PointInTime = offset.to_string().parse()?;
    assert_eq!(again.time_zone(), offset.time_zone());

    let err = "2000-02-29T12:09:14".parse::<PointInTime>().unwrap_err();
    assert!(err.is_invalid_format());
    let err = "2000-02-29T12:09:14Z[Europe/Berlin]"
        .parse::<PointInTime>()
        .unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_json() -> anyhow::Result<()> {
    #[derive(Debug, serde::Deserialize, serde::Serialize)]
    struct Event {
        at: PointInTime,
        #[serde(with = "tempora::fmt::serde::epoch_millis::required")]
        logged: PointInTime,
        offset: UtcOffset,
    }

    let tz = TimeZone::fixed(UtcOffset::new(-5, -30)?);
    let at = PointInTime::from_epoch_seconds(951_826_154)?.with_time_zone(tz);
    let event = Event {
        at: at.clone(),
        logged: at.add_seconds(1)?,
        offset: UtcOffset::new(-5, -30)?,
    };
    let json = serde_json::to_string(&event)?;
    assert_eq!(
        json,
        r#"{"at":"2000-02-29T06:39:14.000-05:30[-05:30]","logged":951826155000,"offset":"-05:30"}"#,
    );

    let got: Event = serde_json::from_str(&json)?;
    assert_eq!(got.at, at);
    assert_eq!(got.at.time_zone().name(), "-05:30");
    assert_eq!(got.logged.time_zone(), &TimeZone::utc());
    assert_eq!(got.offset, event.offset);

    Ok(())
}
