//! Go-style duration strings ("24h0m0s", "1.5s", "500ms") used by the
//! northbound API for `token_ttl` fields.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid duration string")]
pub struct InvalidDuration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Render a nanosecond count the way Go's `time.Duration` prints itself.
pub fn format_go_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    let negative = nanos < 0;
    let n = nanos.unsigned_abs() as u128;

    let body = if n < NANOS_PER_SEC {
        if n < 1_000 {
            format!("{n}ns")
        } else if n < 1_000_000 {
            format!("{}µs", with_fraction(n, 1_000))
        } else {
            format!("{}ms", with_fraction(n, 1_000_000))
        }
    } else {
        let total_secs = n / NANOS_PER_SEC;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let sec_nanos = (total_secs % 60) * NANOS_PER_SEC + n % NANOS_PER_SEC;
        let seconds = format!("{}s", with_fraction(sec_nanos, NANOS_PER_SEC));

        if hours > 0 {
            format!("{hours}h{minutes}m{seconds}")
        } else if minutes > 0 {
            format!("{minutes}m{seconds}")
        } else {
            seconds
        }
    };

    if negative {
        format!("-{body}")
    } else {
        body
    }
}

fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let mut digits = format!("{:0width$}", frac, width = unit.ilog10() as usize);
    while digits.ends_with('0') {
        digits.pop();
    }
    format!("{whole}.{digits}")
}

/// Parse a Go-style duration into nanoseconds. Accepts the units Go
/// accepts: ns, us/µs, ms, s, m, h; "0" is valid without a unit.
pub fn parse_go_duration(input: &str) -> Result<i64, InvalidDuration> {
    let (negative, mut rest) = match input.strip_prefix('-') {
        Some(tail) => (true, tail),
        None => (false, input),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(InvalidDuration);
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or(InvalidDuration)?;
        if number_len == 0 {
            return Err(InvalidDuration);
        }
        let (number, tail) = rest.split_at(number_len);

        let (unit_nanos, unit_len): (u128, usize) = if tail.starts_with("ns") {
            (1, 2)
        } else if tail.starts_with("us") {
            (1_000, 2)
        } else if tail.starts_with("µs") {
            (1_000, "µs".len())
        } else if tail.starts_with("ms") {
            (1_000_000, 2)
        } else if tail.starts_with('s') {
            (NANOS_PER_SEC, 1)
        } else if tail.starts_with('m') {
            (60 * NANOS_PER_SEC, 1)
        } else if tail.starts_with('h') {
            (3600 * NANOS_PER_SEC, 1)
        } else {
            return Err(InvalidDuration);
        };

        total = total
            .checked_add(decimal_nanos(number, unit_nanos)?)
            .ok_or(InvalidDuration)?;
        rest = &tail[unit_len..];
    }

    let signed = if negative { -total } else { total };
    i64::try_from(signed).map_err(|_| InvalidDuration)
}

fn decimal_nanos(number: &str, unit_nanos: u128) -> Result<i128, InvalidDuration> {
    let mut parts = number.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();

    if whole.is_empty() && frac.map_or(true, str::is_empty) {
        return Err(InvalidDuration);
    }

    let mut nanos: u128 = 0;
    if !whole.is_empty() {
        let value: u128 = whole.parse().map_err(|_| InvalidDuration)?;
        nanos = value.checked_mul(unit_nanos).ok_or(InvalidDuration)?;
    }

    if let Some(frac) = frac {
        if frac.is_empty() || frac.contains('.') || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDuration);
        }
        let mut scale = unit_nanos;
        let mut frac_nanos: u128 = 0;
        for digit in frac.bytes() {
            scale /= 10;
            frac_nanos += u128::from(digit - b'0') * scale;
        }
        nanos = nanos.checked_add(frac_nanos).ok_or(InvalidDuration)?;
    }

    i128::try_from(nanos).map_err(|_| InvalidDuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: i64 = 1_000_000_000;

    #[test]
    fn formats_like_go() {
        assert_eq!(format_go_duration(0), "0s");
        assert_eq!(format_go_duration(500_000_000), "500ms");
        assert_eq!(format_go_duration(1_500_000_000), "1.5s");
        assert_eq!(format_go_duration(45 * SEC), "45s");
        assert_eq!(format_go_duration(90 * SEC), "1m30s");
        assert_eq!(format_go_duration(30 * 60 * SEC), "30m0s");
        assert_eq!(format_go_duration(24 * 3600 * SEC), "24h0m0s");
        assert_eq!(format_go_duration(26 * 3600 * SEC + 3 * 60 * SEC + 4 * SEC), "26h3m4s");
        assert_eq!(format_go_duration(1_500), "1.5µs");
        assert_eq!(format_go_duration(999), "999ns");
    }

    #[test]
    fn parses_like_go() {
        assert_eq!(parse_go_duration("0").unwrap(), 0);
        assert_eq!(parse_go_duration("24h0m0s").unwrap(), 24 * 3600 * SEC);
        assert_eq!(parse_go_duration("1h30m").unwrap(), 5400 * SEC);
        assert_eq!(parse_go_duration("1.5s").unwrap(), 1_500_000_000);
        assert_eq!(parse_go_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(parse_go_duration("100us").unwrap(), 100_000);
        assert_eq!(parse_go_duration("100µs").unwrap(), 100_000);
        assert_eq!(parse_go_duration("250ns").unwrap(), 250);
        assert_eq!(parse_go_duration("-15m").unwrap(), -900 * SEC);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "h", "1", "1d", "s1", "1.s", "1..2s", "1m-30s", "abc"] {
            assert!(parse_go_duration(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn format_parse_roundtrip() {
        for nanos in [
            1i64,
            999,
            1_500,
            500_000_000,
            SEC,
            90 * SEC,
            3600 * SEC,
            24 * 3600 * SEC,
            (365 * 24 * 3600) * SEC,
        ] {
            let rendered = format_go_duration(nanos);
            assert_eq!(
                parse_go_duration(&rendered).unwrap(),
                nanos,
                "roundtrip broke for {rendered}"
            );
        }
    }
}
