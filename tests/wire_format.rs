use chrono::{DateTime, TimeZone, Utc};
use ctxlog::{fields, Ctx, Fields, Flags, Level, Logger, Value};
use std::sync::{Arc, Mutex};

fn fixed() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap() + chrono::Duration::nanoseconds(123_456_789)
}

fn logger(flags: Flags) -> (Logger, Arc<Mutex<Vec<u8>>>) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let logger = Logger::new(buf.clone(), "", flags).with_clock(fixed);
    (logger, buf)
}

fn take(buf: &Mutex<Vec<u8>>) -> String {
    let mut guard = buf.lock().unwrap();
    let out = String::from_utf8(guard.clone()).unwrap();
    guard.clear();
    out
}

#[test]
fn hello_with_date_time_utc() {
    let (logger, buf) = logger(Flags::DATE | Flags::TIME | Flags::UTC);
    logger.info(&Ctx::background(), "hello", &Fields::new()).unwrap();
    assert_eq!(
        take(&buf),
        "{\"time\":\"2001-02-03T04:05:06Z\",\"level\":\"info\",\"message\":\"hello\"}\n"
    );
}

#[test]
fn hello_with_microseconds() {
    let (logger, buf) = logger(Flags::DATE | Flags::TIME | Flags::MICROSECONDS | Flags::UTC);
    logger.info(&Ctx::background(), "hello", &Fields::new()).unwrap();
    assert_eq!(
        take(&buf),
        "{\"time\":\"2001-02-03T04:05:06.123456Z\",\"level\":\"info\",\"message\":\"hello\"}\n"
    );
}

#[test]
fn local_field_shadows_parent_scope() {
    let (logger, buf) = logger(Flags::empty());
    let ctx = Ctx::background().with(fields! { "a" => 2, "b" => 3 });
    logger.info(&ctx, "m", &fields! { "a" => 1 }).unwrap();
    assert_eq!(take(&buf), "{\"level\":\"info\",\"message\":\"m\",\"a\":1,\"b\":3}\n");
}

#[test]
fn float_formatting_boundaries() {
    let (logger, buf) = logger(Flags::empty());
    let fields = fields! {
        "big" => 1e21,
        "micro" => 0.000001,
        "tiny" => f64::from_bits(0.000001f64.to_bits() - 1),
    };
    logger.info(&Ctx::background(), "f", &fields).unwrap();
    assert_eq!(
        take(&buf),
        "{\"level\":\"info\",\"message\":\"f\",\"big\":1e+21,\"micro\":0.000001,\"tiny\":9.999999999999997e-7}\n"
    );
}

#[test]
fn reserved_names_from_every_depth_are_renamed() {
    let (logger, buf) = logger(Flags::DATE | Flags::UTC | Flags::SHORT_FILE);
    let ctx = Ctx::background()
        .with(fields! { "file" => "scope.rs", "line" => 1 })
        .with(fields! { "time" => "later" });
    logger
        .info(&ctx, "m", &fields! { "level" => "x", "message" => "y" })
        .unwrap();

    let out = take(&buf);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["time"], "2001-02-03Z");
    assert_eq!(v["level"], "info");
    assert_eq!(v["message"], "m");
    assert_eq!(v["file"], "wire_format.rs");
    assert!(v["line"].is_u64());
    assert_eq!(v["field.file"], "scope.rs");
    assert_eq!(v["field.line"], 1);
    assert_eq!(v["field.time"], "later");
    assert_eq!(v["field.level"], "x");
    assert_eq!(v["field.message"], "y");
    assert_eq!(v.as_object().unwrap().len(), 10);
}

#[test]
fn renamed_field_does_not_duplicate_literal_key() {
    let (logger, buf) = logger(Flags::empty());
    let ctx = Ctx::background().with(fields! { "field.time" => "from-scope" });
    logger.info(&ctx, "m", &fields! { "time" => "from-call" }).unwrap();

    let out = take(&buf);
    assert_eq!(out.matches("\"field.time\"").count(), 1);
    assert_eq!(
        out,
        "{\"level\":\"info\",\"message\":\"m\",\"field.time\":\"from-call\"}\n"
    );
}

#[test]
fn same_inputs_encode_identically() {
    let (logger, buf) = logger(Flags::STD | Flags::UTC);
    let ctx = Ctx::background().with(fields! { "svc" => "auth", "n" => 1 });
    let fields = fields! { "user" => "ann", "ok" => true, "ratio" => 0.5 };

    logger.warn(&ctx, "same", &fields).unwrap();
    let first = take(&buf);
    logger.warn(&ctx, "same", &fields).unwrap();
    assert_eq!(first, take(&buf));
}

#[test]
fn every_value_kind_renders() {
    let (logger, buf) = logger(Flags::UTC);
    let when = Utc.with_ymd_and_hms(2020, 5, 6, 7, 8, 9).unwrap();
    let fields = fields! {
        "bool" => false,
        "i8" => -8i8,
        "i64" => i64::MIN,
        "u64" => u64::MAX,
        "f32" => 1.5f32,
        "null" => None::<i32>,
        "text" => "a\u{2028}b",
        "when" => when,
        "json" => serde_json::json!({"k": [1, 2]}),
    };
    logger.debug(&Ctx::background(), "kinds", &fields).unwrap();
    assert_eq!(
        take(&buf),
        concat!(
            "{\"level\":\"debug\",\"message\":\"kinds\",",
            "\"bool\":false,\"f32\":1.5,\"i64\":-9223372036854775808,\"i8\":-8,",
            "\"json\":{\"k\":[1,2]},\"null\":null,\"text\":\"a\\u2028b\",",
            "\"u64\":18446744073709551615,\"when\":\"2020-05-06T07:08:09.000000Z\"}\n"
        )
    );
}

#[test]
fn structured_values_nest() {
    #[derive(serde::Serialize, Debug)]
    struct User {
        id: u32,
        roles: Vec<&'static str>,
    }

    let (logger, buf) = logger(Flags::empty());
    let mut fields = Fields::new();
    fields.insert(
        "user".to_string(),
        Value::any(User {
            id: 7,
            roles: vec!["admin", "ops"],
        }),
    );
    logger.error(&Ctx::background(), "denied", &fields).unwrap();
    assert_eq!(
        take(&buf),
        "{\"level\":\"error\",\"message\":\"denied\",\"user\":{\"id\":7,\"roles\":[\"admin\",\"ops\"]}}\n"
    );
}

#[test]
fn custom_levels_gate_and_print_numerically() {
    let (logger, buf) = logger(Flags::empty());
    logger.set_level(Level::custom(-5));
    logger
        .log(&Ctx::background(), Level::custom(-4), "deep", &Fields::new())
        .unwrap();
    logger
        .log(&Ctx::background(), Level::custom(-6), "deeper", &Fields::new())
        .unwrap();
    assert_eq!(take(&buf), "{\"level\":\"-4\",\"message\":\"deep\"}\n");
}

#[test]
fn every_line_is_valid_json() {
    let (logger, buf) = logger(Flags::STD | Flags::LONG_FILE);
    let nasty = "\"\\\n\r\t\u{0}\u{1f}<>&\u{7f}\u{2028}\u{2029}é😎";
    let ctx = Ctx::background().with(fields! { nasty => nasty });
    logger.info(&ctx, nasty, &fields! { "k" => nasty }).unwrap();

    let out = take(&buf);
    assert!(out.ends_with('\n'));
    assert_eq!(out.matches('\n').count(), 1);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["message"], nasty);
    assert_eq!(v[nasty], nasty);
    assert_eq!(v["k"], nasty);
}
