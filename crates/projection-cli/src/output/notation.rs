use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;

const CRORE: Decimal = dec!(10_000_000);
const LAKH: Decimal = dec!(100_000);
const THOUSAND: Decimal = dec!(1_000);

/// Abbreviate an amount in the Indian system: Cr (1e7), L (1e5), K (1e3).
pub fn compact_indian(amount: Decimal) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let abs = amount.abs();
    if abs >= CRORE {
        format!("{}{:.2} Cr", sign, round(abs / CRORE, 2))
    } else if abs >= LAKH {
        format!("{}{:.2} L", sign, round(abs / LAKH, 2))
    } else if abs >= THOUSAND {
        format!("{}{:.1} K", sign, round(abs / THOUSAND, 1))
    } else {
        format!("{}{}", sign, round(abs, 2))
    }
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Field names that carry rates or durations rather than money.
fn is_non_monetary(key: &str) -> bool {
    key.ends_with("_pct") || key == "years_lasted" || key == "monthly_rate"
}

/// Render a scalar JSON value, abbreviating monetary strings when `compact`.
pub fn render(key: &str, value: &Value, compact: bool) -> String {
    match value {
        Value::String(s) => {
            if compact && !is_non_monetary(key) {
                if let Ok(amount) = Decimal::from_str(s) {
                    return compact_indian(amount);
                }
            }
            s.clone()
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| render(key, v, compact)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
