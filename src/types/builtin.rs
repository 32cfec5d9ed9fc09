use std::num::ParseFloatError;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::{ConvertError, Converter, Identity, Registry, Value};

const INT: &str = r"[+-]?[0-9]+";
const FLOAT: &str = r"[+-]?(?:[0-9]*[.])?[0-9]+";
const UUID: &str = r"[a-f0-9]{8}-?[a-f0-9]{4}-?[a-f0-9]{4}-?[a-f0-9]{4}-?[a-f0-9]{12}";
const DATE: &str = r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}";
const DATETIME: &str = concat!(
    r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}",
    r"[T ][0-9]{1,2}:[0-9]{1,2}",
    r"(?::[0-9]{1,2}(?:[.,][0-9]{1,12})?)?",
    r"(?:Z|[+-][0-9]{2}(?::?[0-9]{2})?)?",
);

const LETTERS: &str = r"[^\d_\W]+";
const IDENTIFIER: &str = r"\w+";
const OPEN: &str = r"\[\[|\(|\{";
const CLOSE: &str = r"\]\]|\)|\}";

const EMAIL: &str = r"[\w.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+";
const URL: &str = concat!(
    r"https?://(?:www\.)?[-\w@:%.+~#=]+\.[\w()]{1,6}\b",
    r"[-\w()!@:%+.~#?&/=]*",
);
// Visa, MasterCard, American Express, Diners Club, Discover, JCB
const CREDITCARD: &str = concat!(
    r"4[0-9]{12}(?:[0-9]{3})?",
    r"|(?:5[1-5][0-9]{2}|222[1-9]|22[3-9][0-9]|2[3-6][0-9]{2}|27[01][0-9]|2720)[0-9]{12}",
    r"|3[47][0-9]{13}",
    r"|3(?:0[0-5]|[68][0-9])[0-9]{11}",
    r"|6(?:011|5[0-9]{2})[0-9]{12}",
    r"|(?:2131|1800|35[0-9]{3})[0-9]{11}",
);
const IPV4: &str = concat!(
    r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)",
    r"(\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)){3}",
);
const IPV6: &str = concat!(
    r"(([0-9a-fA-F]{1,4}:){7,7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA",
    r"-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){",
    r"1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3",
    r"}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0",
    r"-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|:((:[0-9a-fA-F]{1,4}){1,7}|:)|fe80:",
    r"(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}|::(ffff(:0{1,4}){0,1}:){0,1}((25[0-5",
    r"]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0",
    r"-9])|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,",
    r"3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9]))",
);

pub(super) fn install(registry: &mut Registry) {
    let identity: Arc<dyn Converter> = Arc::new(Identity);
    let table: [(&str, &str, Arc<dyn Converter>); 15] = [
        ("int", INT, Arc::new(int)),
        ("float", FLOAT, Arc::new(float)),
        ("decimal", FLOAT, Arc::new(decimal)),
        ("uuid", UUID, Arc::new(uuid)),
        ("date", DATE, Arc::new(date)),
        ("datetime", DATETIME, Arc::new(datetime)),
        ("letters", LETTERS, identity.clone()),
        ("identifier", IDENTIFIER, identity.clone()),
        ("open", OPEN, identity.clone()),
        ("close", CLOSE, identity.clone()),
        ("email", EMAIL, identity.clone()),
        ("url", URL, identity.clone()),
        ("creditcard", CREDITCARD, identity.clone()),
        ("ipv4", IPV4, identity.clone()),
        ("ipv6", IPV6, identity),
    ];

    for (name, fragment, converter) in table {
        registry
            .register_arc(name, fragment, converter)
            .expect("built-in fragments are valid");
    }
}

/// `i64` when it fits, then `Decimal`, then `f64` for anything longer.
fn int(raw: &str) -> Result<Value, ParseFloatError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    decimal(raw)
}

fn float(raw: &str) -> Result<f64, ParseFloatError> {
    raw.parse()
}

/// Falls back to `f64` past the 28 significant digits `Decimal` holds.
fn decimal(raw: &str) -> Result<Value, ParseFloatError> {
    match parse_decimal(raw) {
        Ok(d) => Ok(Value::Decimal(d)),
        Err(_) => float(raw).map(Value::Float),
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let (sign, digits) = match raw.as_bytes().first() {
        Some(b'-') => ("-", &raw[1..]),
        Some(b'+') => ("", &raw[1..]),
        _ => ("", raw),
    };
    if digits.starts_with('.') {
        format!("{sign}0{digits}").parse()
    } else {
        format!("{sign}{digits}").parse()
    }
}

/// Lowercase, hyphenated form so both spellings compare equal.
fn uuid(raw: &str) -> Result<String, &'static str> {
    let hex: String = raw
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("expected 32 hexadecimal digits");
    }

    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..]
    ))
}

fn date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
}

fn datetime(raw: &str) -> Result<Value, ConvertError> {
    let (date_part, rest) = raw
        .split_once(|c: char| matches!(c, 'T' | 't' | ' '))
        .ok_or("missing time")?;
    let day = date(date_part)?;

    let (time_part, offset) = split_offset(rest)?;
    let time_part = time_part.replace(',', ".");
    let format = if time_part.matches(':').count() == 2 {
        "%H:%M:%S%.f"
    } else {
        "%H:%M"
    };
    let naive = day.and_time(NaiveTime::parse_from_str(&time_part, format)?);

    match offset {
        None => Ok(naive.into()),
        Some(offset) => naive
            .and_local_timezone(offset)
            .single()
            .map(Value::from)
            .ok_or_else(|| "ambiguous local time".into()),
    }
}

fn split_offset(rest: &str) -> Result<(&str, Option<FixedOffset>), ConvertError> {
    if let Some(time) = rest.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return Ok((time, FixedOffset::east_opt(0)));
    }
    let Some(at) = rest.find(|c: char| c == '+' || c == '-') else {
        return Ok((rest, None));
    };

    let sign = if rest[at..].starts_with('-') { -1 } else { 1 };
    let digits = rest[at + 1..].replace(':', "");
    let hours: i32 = digits.get(..2).ok_or("offset needs hours")?.parse()?;
    let minutes: i32 = match digits.get(2..) {
        Some(m) if !m.is_empty() => m.parse()?,
        _ => 0,
    };
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or("offset out of range")?;

    Ok((&rest[..at], Some(offset)))
}
