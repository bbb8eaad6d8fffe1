use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Timelike};
use lazy_regex::regex;

use crate::schema::{Codec, SchemaError, SchemaResult};

macro_rules! try_opt {
    ($e:expr, $r:expr) => (
        match $e {
            Some(e) => e,
            None => return Err(malformed($r)),
        }
    )
}

macro_rules! parse_field {
    ($caps:expr, $field:expr, $r:expr) => (
        try_opt!($caps.name($field).and_then(|m| FromStr::from_str(m.as_str()).ok()), $r)
    )
}

fn malformed(r: &str) -> SchemaError {
    SchemaError::MalformedValue { what: "RFC 3339 date time", value: r.to_owned() }
}

/// The date-time format of Atom (RFC 3339 section 5.6).
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc3339;

impl Codec<DateTime<FixedOffset>> for Rfc3339 {
    fn encode(&self, value: &DateTime<FixedOffset>, w: &mut dyn fmt::Write) -> SchemaResult<()> {
        write!(w, "{}", value.format("%Y-%m-%dT%H:%M:%S"))?;
        // a leap second carries its extra second in the nanoseconds
        let nsec = value.nanosecond() % 1_000_000_000;
        if nsec != 0 {
            let nsec = format!("{:09}", nsec);
            write!(w, ".{}", nsec.trim_end_matches('0'))?;
        }
        let off = value.offset().local_minus_utc();
        if off == 0 {
            write!(w, "Z")?;
        } else {
            let sign = if off < 0 { '-' } else { '+' };
            let min = off.abs() / 60;
            write!(w, "{}{:02}:{:02}", sign, min / 60, min % 60)?;
        }
        Ok(())
    }

    fn decode(&self, r: &str) -> SchemaResult<DateTime<FixedOffset>> {
        let pattern = regex!(r#"(?x)
            ^\s*
            (?P<year>\d{4})-(?P<month>0[1-9]|1[012])-(?P<day>0[1-9]|[12]\d|3[01])
            [Tt]
            (?P<hour>[01]\d|2[0-3]):(?P<minute>[0-5]\d)
            :(?P<second>[0-5]\d|60)(?:\.(?P<fraction>\d+))?
            (?P<tz>[Zz]|(?P<tz_offset_sign>[+-])(?P<tz_offset_hour>[01]\d|2[0-3])
                        :(?P<tz_offset_minute>[0-5]\d))
            \s*$
        "#);
        let caps = try_opt!(pattern.captures(r), r);
        let offset = if caps.name("tz_offset_sign").is_some() {
            let tz_hour: i32 = parse_field!(caps, "tz_offset_hour", r);
            let tz_minute: i32 = parse_field!(caps, "tz_offset_minute", r);
            let tz_sign = if &caps["tz_offset_sign"] == "+" { 1 } else { -1 };
            try_opt!(FixedOffset::east_opt(tz_sign * (tz_hour * 60 + tz_minute) * 60), r)
        } else {
            try_opt!(FixedOffset::east_opt(0), r)
        };
        // nanosecond precision at most; further digits are dropped
        let mut fraction: String = caps.name("fraction")
            .map_or("", |m| m.as_str())
            .chars().take(9).collect();
        while fraction.len() < 9 {
            fraction.push('0');
        }
        let mut nanosecond: u32 = try_opt!(fraction.parse().ok(), r);
        let mut second: u32 = parse_field!(caps, "second", r);
        if second == 60 {
            second = 59;
            nanosecond += 1_000_000_000;
        }
        let date = try_opt!(NaiveDate::from_ymd_opt(parse_field!(caps, "year", r),
                                                    parse_field!(caps, "month", r),
                                                    parse_field!(caps, "day", r)), r);
        let naive = try_opt!(date.and_hms_nano_opt(parse_field!(caps, "hour", r),
                                                   parse_field!(caps, "minute", r),
                                                   second, nanosecond), r);
        Ok(try_opt!(offset.from_local_datetime(&naive).single(), r))
    }
}

impl Rfc3339 {
    pub fn to_text(&self, value: &DateTime<FixedOffset>) -> String {
        let mut buf = String::new();
        // writing into a String cannot fail
        let _ = self.encode(value, &mut buf);
        buf
    }
}
