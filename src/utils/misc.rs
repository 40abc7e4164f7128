//! Small helpers that do not deserve a module of their own

use chrono::NaiveTime;
use serde_json::Value;
use std::collections::HashMap;
use std::hash::Hash;

/// Clamp `n` into `[min, max]`.
///
/// Unlike [`Ord::clamp`] this never panics: when `min > max`, `min` wins.
pub fn restrict_number<T: PartialOrd>(n: T, min: T, max: T) -> T {
    let upper = if n > max { max } else { n };
    if upper < min { min } else { upper }
}

/// Whether `time` lies inside `[start, end]`, inclusive.
///
/// A window whose end comes before its start wraps across midnight, so
/// `("21:30", "04:30")` contains `01:15`.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use toolbelt::utils::misc::time_is_between;
///
/// let t = |s| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
/// assert!(time_is_between(t("11:00"), (t("09:00"), t("16:00"))));
/// assert!(!time_is_between(t("17:00"), (t("09:00"), t("16:00"))));
/// assert!(time_is_between(t("01:15"), (t("21:30"), t("04:30"))));
/// ```
pub fn time_is_between(time: NaiveTime, (start, end): (NaiveTime, NaiveTime)) -> bool {
    if end < start {
        return time >= start || time <= end;
    }
    start <= time && time <= end
}

/// Swap keys and values. Later duplicates of a value overwrite earlier ones.
pub fn reverse_map<K, V>(map: &HashMap<K, V>) -> HashMap<V, K>
where
    K: Clone,
    V: Clone + Eq + Hash,
{
    map.iter()
        .map(|(key, value)| (value.clone(), key.clone()))
        .collect()
}

/// First key mapped to `needle`, if any.
pub fn key_for_value<'a, K, V: PartialEq>(map: &'a HashMap<K, V>, needle: &V) -> Option<&'a K> {
    map.iter()
        .find(|(_, value)| *value == needle)
        .map(|(key, _)| key)
}

/// Recursively merge `update` into `original`.
///
/// Objects are merged key by key; any other value in `update` replaces the
/// one in `original`.
pub fn deep_merge(original: Value, update: Value) -> Value {
    match (original, update) {
        (Value::Object(mut base), Value::Object(changes)) => {
            for (key, change) in changes {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, change),
                    None => change,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, update) => update,
    }
}
