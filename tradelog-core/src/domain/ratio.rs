//! Guarded ratios shared by the monthly, yearly and portfolio statistics.
//!
//! Every division in the statistics resolves degenerate denominators to a
//! defined sentinel (`0.0` or `+∞`) instead of producing NaN.

/// Gross profit / gross loss.
///
/// Zero loss gives `+∞` when there is profit and `0.0` when there is none.
/// The loss may be passed signed; only its magnitude is used.
pub fn profit_factor(gross_profit: f64, gross_loss: f64) -> f64 {
    let loss = gross_loss.abs();
    if loss > 0.0 {
        gross_profit / loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// `part / whole * 100`, or `0.0` when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Two-decimal rendering with `∞` for unbounded ratios.
pub fn format_ratio(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "∞".into() } else { "-∞".into() }
    } else {
        format!("{value:.2}")
    }
}

/// Serde adapter for ratios that may be infinite.
///
/// JSON has no infinity literal, so `±∞` is written as the strings `"inf"` /
/// `"-inf"`; finite values stay plain numbers.
pub mod unbounded {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
                "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid ratio '{other}'"))),
            },
        }
    }
}
