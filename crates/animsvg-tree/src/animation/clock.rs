// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::Duration;
use crate::Error;

impl std::str::FromStr for Duration {
    type Err = Error;

    /// Parses a SMIL clock value.
    ///
    /// Supports full and partial clock values (`01:02:30.5`, `02:30`),
    /// timecounts with an optional metric (`5s`, `300ms`, `1.5min`, `2h`, `12`)
    /// and `indefinite`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let s = text.trim();
        if s == "indefinite" {
            return Ok(Duration::INDEFINITE);
        }

        let err = || Error::InvalidClockValue(text.to_string());

        let millis = if s.contains(':') {
            parse_clock(s).ok_or_else(err)?
        } else {
            parse_timecount(s).ok_or_else(err)?
        };

        if !millis.is_finite() {
            return Err(err());
        }

        Ok(Duration::from_millis(millis.round() as i64))
    }
}

fn parse_clock(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => ("0", *m, *sec),
        [h, m, sec] => (*h, *m, *sec),
        _ => return None,
    };

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    Some((f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds) * 1000.0)
}

fn parse_timecount(s: &str) -> Option<f64> {
    // `ms` must be checked before `s`.
    let (number, factor) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix("min") {
        (n, 60_000.0)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3_600_000.0)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000.0)
    } else {
        (s, 1000.0)
    };

    let n: f64 = number.trim_end().parse().ok()?;
    Some(n * factor)
}

/// Parses a `;`-separated list of clock values, e.g. a `begin` attribute.
pub fn parse_clock_list(text: &str) -> Result<Vec<Duration>, Error> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $millis:expr) => {
            #[test]
            fn $name() {
                let d: Duration = $text.parse().unwrap();
                assert_eq!(d.as_millis(), $millis);
            }
        };
    }

    test!(seconds,       "5s",         5000);
    test!(fraction,      "0.5s",       500);
    test!(millis,        "300ms",      300);
    test!(minutes,       "1.5min",     90_000);
    test!(hours,         "2h",         7_200_000);
    test!(bare_number,   "12",         12_000);
    test!(negative,      "-1s",        -1000);
    test!(partial_clock, "02:30",      150_000);
    test!(full_clock,    "01:02:30.5", 3_750_500);
    test!(spaces,        "  250ms ",   250);

    macro_rules! test_err {
        ($name:ident, $text:expr) => {
            #[test]
            fn $name() {
                assert_eq!(
                    $text.parse::<Duration>().unwrap_err(),
                    Error::InvalidClockValue($text.to_string())
                );
            }
        };
    }

    test_err!(err_empty,   "");
    test_err!(err_unit,    "5px");
    test_err!(err_event,   "click");
    test_err!(err_minutes, "00:75:00");

    #[test]
    fn indefinite() {
        assert!("indefinite".parse::<Duration>().unwrap().is_indefinite());
    }

    #[test]
    fn clock_list() {
        let list = parse_clock_list("0s; 2s;500ms").unwrap();
        assert_eq!(list, vec![
            Duration::from_millis(0),
            Duration::from_millis(2000),
            Duration::from_millis(500),
        ]);
    }

    #[test]
    fn clock_list_with_event() {
        assert!(parse_clock_list("0s;foo.click").is_err());
    }
}
