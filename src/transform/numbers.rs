// src/transform/numbers.rs
use serde_json::Value;

/// Extract the drawn numbers from a raw ball list.
///
/// Elements may arrive as strings (`"02"`) or bare numbers; every non-digit
/// character is stripped and whatever digits remain become the value.
/// Elements with no digits at all are dropped without consuming a position,
/// so positions are assigned densely over the survivors.
pub fn clean_numbers(values: &[Value]) -> Vec<i64> {
    values
        .iter()
        .filter_map(|v| {
            let digits: String = match v {
                Value::String(s) => s.chars().filter(char::is_ascii_digit).collect(),
                Value::Number(n) => n.to_string().chars().filter(char::is_ascii_digit).collect(),
                _ => return None,
            };
            if digits.is_empty() {
                None
            } else {
                digits.parse::<i64>().ok()
            }
        })
        .collect()
}
