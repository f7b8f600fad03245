//! Compact JSON text for single values.
//!
//! Strings are escaped more aggressively than JSON strictly requires: `<`,
//! `>`, `&`, DEL, U+2028 and U+2029 are written as `\u` escapes so a record
//! can be embedded in HTML or evaluated as JavaScript, and a log line can
//! never be split by a line separator hidden in user data.
//!
//! Floats follow the ECMAScript number-to-string rules used by most JSON
//! generators: shortest round-trip digits, fixed notation for magnitudes in
//! `[1e-6, 1e21)` and exponential notation (`1e+21`, `1e-7`) outside it.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use std::io::Write;

use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::value::Value;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `value` to `out` as a JSON fragment.
///
/// `flags` only matters for [`Value::Time`], which is laid out like the
/// record's own `time` field.
pub fn render_value(out: &mut Vec<u8>, value: &Value, flags: Flags) -> Result<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(v) => render_bool(out, *v),
        Value::I64(v) => render_i64(out, *v),
        Value::U64(v) => render_u64(out, *v),
        Value::F32(v) => render_f32(out, *v)?,
        Value::F64(v) => render_f64(out, *v)?,
        Value::Str(v) => render_str(out, v),
        Value::Time(v) => {
            let flags = if flags.has_timestamp() {
                flags
            } else {
                flags | Flags::DATE | Flags::MICROSECONDS
            };
            out.push(b'"');
            render_time(out, *v, flags);
            out.push(b'"');
        }
        Value::Any(v) => v.to_json(out)?,
    }
    Ok(())
}

/// Append `s` as a quoted JSON string.
pub fn render_str(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    render_raw_str(out, s);
    out.push(b'"');
}

/// Append the escaped contents of `s` without the surrounding quotes.
pub fn render_raw_str(out: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    // Start of the pending run of bytes that need no escaping.
    let mut start = 0;

    for (i, c) in s.char_indices() {
        let escape: &[u8] = match c {
            '\\' => b"\\\\",
            '"' => b"\\\"",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            '<' => b"\\u003c",
            '>' => b"\\u003e",
            '&' => b"\\u0026",
            '\u{7f}' => b"\\u007f",
            '\u{2028}' => b"\\u2028",
            '\u{2029}' => b"\\u2029",
            c if (c as u32) < 0x20 => {
                let b = c as usize;
                out.extend_from_slice(&bytes[start..i]);
                out.extend_from_slice(b"\\u00");
                out.push(HEX[b >> 4]);
                out.push(HEX[b & 0xf]);
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        out.extend_from_slice(&bytes[start..i]);
        out.extend_from_slice(escape);
        start = i + c.len_utf8();
    }
    out.extend_from_slice(&bytes[start..]);
}

pub fn render_bool(out: &mut Vec<u8>, v: bool) {
    out.extend_from_slice(if v { b"true" } else { b"false" });
}

pub fn render_i64(out: &mut Vec<u8>, v: i64) {
    let mut scratch = [0u8; 20];
    let digits = format_u64(&mut scratch, v.unsigned_abs());
    if v < 0 {
        out.push(b'-');
    }
    out.extend_from_slice(digits);
}

pub fn render_u64(out: &mut Vec<u8>, v: u64) {
    let mut scratch = [0u8; 20];
    out.extend_from_slice(format_u64(&mut scratch, v));
}

/// Write the decimal digits of `v` into the tail of `scratch`.
fn format_u64(scratch: &mut [u8; 20], mut v: u64) -> &[u8] {
    let mut i = scratch.len();
    loop {
        i -= 1;
        scratch[i] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    &scratch[i..]
}

pub fn render_f64(out: &mut Vec<u8>, v: f64) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::UnsupportedValue(v.to_string()));
    }
    let abs = v.abs();
    if abs != 0.0 && !(1e-6..1e21).contains(&abs) {
        let start = out.len();
        write!(out, "{v:e}")?;
        fix_exponent(out, start);
    } else {
        write!(out, "{v}")?;
    }
    Ok(())
}

pub fn render_f32(out: &mut Vec<u8>, v: f32) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::UnsupportedValue(v.to_string()));
    }
    let abs = v.abs();
    if abs != 0.0 && !(1e-6f32..1e21f32).contains(&abs) {
        let start = out.len();
        write!(out, "{v:e}")?;
        fix_exponent(out, start);
    } else {
        write!(out, "{v}")?;
    }
    Ok(())
}

/// Turn `1e21` into `1e+21`. Negative exponents already carry their sign,
/// and exponents are written without leading zeros.
fn fix_exponent(out: &mut Vec<u8>, start: usize) {
    if let Some(e) = out[start..].iter().rposition(|&b| b == b'e') {
        let sign = start + e + 1;
        if out.get(sign) != Some(&b'-') {
            out.insert(sign, b'+');
        }
    }
}

/// Append `t` laid out by `flags`, without quotes.
///
/// Digits are placed directly: `YYYY-MM-DD`, `T`, `HH:MM:SS`, `.uuuuuu`
/// and `Z` as requested. Microseconds are truncated, never rounded.
pub fn render_time(out: &mut Vec<u8>, t: DateTime<Utc>, flags: Flags) {
    if flags.contains(Flags::UTC) {
        layout_time(out, &t, flags);
    } else {
        layout_time(out, &t.with_timezone(&Local), flags);
    }
}

fn layout_time<T: Datelike + Timelike>(out: &mut Vec<u8>, t: &T, flags: Flags) {
    let mut b = [0u8; 32];
    let mut i = 0;

    if flags.contains(Flags::DATE) {
        let year = t.year().clamp(0, 9999) as u32;
        let (month, day) = (t.month(), t.day());
        b[i] = b'0' + (year / 1000) as u8;
        b[i + 1] = b'0' + (year / 100 % 10) as u8;
        b[i + 2] = b'0' + (year / 10 % 10) as u8;
        b[i + 3] = b'0' + (year % 10) as u8;
        b[i + 4] = b'-';
        b[i + 5] = b'0' + (month / 10) as u8;
        b[i + 6] = b'0' + (month % 10) as u8;
        b[i + 7] = b'-';
        b[i + 8] = b'0' + (day / 10) as u8;
        b[i + 9] = b'0' + (day % 10) as u8;
        i += 10;
    }
    if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
        if flags.contains(Flags::DATE) {
            b[i] = b'T';
            i += 1;
        }
        let (hour, min, sec) = (t.hour(), t.minute(), t.second());
        b[i] = b'0' + (hour / 10) as u8;
        b[i + 1] = b'0' + (hour % 10) as u8;
        b[i + 2] = b':';
        b[i + 3] = b'0' + (min / 10) as u8;
        b[i + 4] = b'0' + (min % 10) as u8;
        b[i + 5] = b':';
        b[i + 6] = b'0' + (sec / 10) as u8;
        b[i + 7] = b'0' + (sec % 10) as u8;
        i += 8;
        if flags.contains(Flags::MICROSECONDS) {
            // Leap seconds are reported as nanosecond >= 1_000_000_000.
            let micro = t.nanosecond() % 1_000_000_000 / 1000;
            b[i] = b'.';
            b[i + 1] = b'0' + (micro / 100_000) as u8;
            b[i + 2] = b'0' + (micro / 10_000 % 10) as u8;
            b[i + 3] = b'0' + (micro / 1000 % 10) as u8;
            b[i + 4] = b'0' + (micro / 100 % 10) as u8;
            b[i + 5] = b'0' + (micro / 10 % 10) as u8;
            b[i + 6] = b'0' + (micro % 10) as u8;
            i += 7;
        }
    }
    if flags.contains(Flags::UTC) {
        b[i] = b'Z';
        i += 1;
    }
    out.extend_from_slice(&b[..i]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn string(s: &str) -> String {
        let mut out = Vec::new();
        render_str(&mut out, s);
        String::from_utf8(out).unwrap()
    }

    fn float(v: f64) -> String {
        let mut out = Vec::new();
        render_f64(&mut out, v).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn float32(v: f32) -> String {
        let mut out = Vec::new();
        render_f32(&mut out, v).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn time(flags: Flags) -> String {
        let t = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let mut out = Vec::new();
        render_time(&mut out, t, flags);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(string("abcdefghijklmnopqrstuvwxyz"), r#""abcdefghijklmnopqrstuvwxyz""#);
        assert_eq!(string("ABCDEFGHIJKLMNOPQRSTUVWXYZ"), r#""ABCDEFGHIJKLMNOPQRSTUVWXYZ""#);
        assert_eq!(string("こんにちは世界"), "\"こんにちは世界\"");
        assert_eq!(string("😎"), "\"😎\"");
        assert_eq!(string(""), "\"\"");
    }

    #[test]
    fn html_sensitive_characters_are_escaped() {
        assert_eq!(string("<script>"), "\"\\u003cscript\\u003e\"");
        assert_eq!(string("a&b"), "\"a\\u0026b\"");
    }

    #[test]
    fn short_escapes() {
        assert_eq!(string("\\\"\n\r\t"), r#""\\\"\n\r\t""#);
    }

    #[test]
    fn control_and_separator_characters() {
        assert_eq!(
            string("\u{0}\u{1}\u{1a}\u{7f}\u{2028}\u{2029}"),
            "\"\\u0000\\u0001\\u001a\\u007f\\u2028\\u2029\""
        );
        assert_eq!(string("\u{8}\u{c}\u{1f}"), r#""\u0008\u000c\u001f""#);
    }

    #[test]
    fn escapes_between_multibyte_text() {
        assert_eq!(string("é<ü>"), "\"é\\u003cü\\u003e\"");
    }

    #[test]
    fn integers_cover_full_range() {
        let mut out = Vec::new();
        render_i64(&mut out, i64::MIN);
        out.push(b' ');
        render_i64(&mut out, 0);
        out.push(b' ');
        render_i64(&mut out, -7);
        out.push(b' ');
        render_u64(&mut out, u64::MAX);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "-9223372036854775808 0 -7 18446744073709551615"
        );
    }

    #[test]
    fn floats_use_fixed_notation_in_range() {
        assert_eq!(float(0.0), "0");
        assert_eq!(float(-0.0), "-0");
        assert_eq!(float(1.0), "1");
        assert_eq!(float(-1.5), "-1.5");
        assert_eq!(float(0.1), "0.1");
        assert_eq!(float(0.000001), "0.000001");
        assert_eq!(float(1e20), "100000000000000000000");
        assert_eq!(float(123456789.125), "123456789.125");
    }

    #[test]
    fn floats_use_exponent_out_of_range() {
        assert_eq!(float(1e21), "1e+21");
        assert_eq!(float(-1.5e300), "-1.5e+300");
        assert_eq!(float(1e-7), "1e-7");
        assert_eq!(float(f64::from_bits(0.000001f64.to_bits() - 1)), "9.999999999999997e-7");
        assert_eq!(float(5e-324), "5e-324");
        assert_eq!(float(f64::MAX), "1.7976931348623157e+308");
    }

    #[test]
    fn float32_uses_its_own_precision() {
        assert_eq!(float32(0.1), "0.1");
        assert_eq!(float32(1e21), "1e+21");
        assert_eq!(float32(1e-7), "1e-7");
        assert_eq!(float32(16777216.0), "16777216");
    }

    #[test]
    fn non_finite_floats_fail() {
        let mut out = Vec::new();
        assert!(matches!(render_f64(&mut out, f64::NAN), Err(Error::UnsupportedValue(_))));
        assert!(matches!(render_f64(&mut out, f64::INFINITY), Err(Error::UnsupportedValue(_))));
        assert!(matches!(render_f32(&mut out, f32::NEG_INFINITY), Err(Error::UnsupportedValue(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn time_layouts() {
        assert_eq!(time(Flags::DATE | Flags::UTC), "2001-02-03Z");
        assert_eq!(time(Flags::DATE | Flags::TIME | Flags::UTC), "2001-02-03T04:05:06Z");
        assert_eq!(
            time(Flags::DATE | Flags::MICROSECONDS | Flags::UTC),
            "2001-02-03T04:05:06.123456Z"
        );
        assert_eq!(time(Flags::TIME | Flags::UTC), "04:05:06Z");
        assert_eq!(time(Flags::MICROSECONDS | Flags::UTC), "04:05:06.123456Z");
    }

    #[test]
    fn microseconds_truncate() {
        let t = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::nanoseconds(999_999_999);
        let mut out = Vec::new();
        render_time(&mut out, t, Flags::DATE | Flags::MICROSECONDS | Flags::UTC);
        assert_eq!(out, b"1999-12-31T23:59:59.999999Z");
    }

    #[test]
    fn time_values_default_to_full_precision() {
        let t = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let mut out = Vec::new();
        render_value(&mut out, &Value::Time(t), Flags::UTC).unwrap();
        assert_eq!(out, b"\"2020-01-02T03:04:05.000000Z\"");
    }

    #[test]
    fn structured_values_use_serde() {
        let mut out = Vec::new();
        render_value(&mut out, &Value::from(serde_json::json!({"k": [1, "x"]})), Flags::empty())
            .unwrap();
        assert_eq!(out, br#"{"k":[1,"x"]}"#);
    }

    #[test]
    fn structured_value_errors_surface() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], 1);
        let mut out = Vec::new();
        let err = render_value(&mut out, &Value::any(map), Flags::empty()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
