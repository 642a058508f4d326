//! Effect parameter trees and resolution.
//!
//! The engine never loads or migrates configuration itself; an external
//! service hands it plain parameter trees. This module holds the tree
//! representation, the pure `defaults ⊕ stored ⊕ overrides` merge, and the
//! clamping accessors that keep non-finite numbers out of drawing code.

use fnv::FnvHashMap;
use thiserror::Error;

/// A plain, JSON-shaped parameter tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Number(f64),
    Bool(bool),
    Str(String),
    List(Vec<ConfigValue>),
    Map(FnvHashMap<String, ConfigValue>),
}

/// Errors surfaced when validating caller-supplied override trees.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("non-finite number for `{key}`")]
    NonFinite { key: String },
    #[error("overrides for `{name}` must be an object")]
    NotAnObject { name: String },
}

impl ConfigValue {
    pub fn num(n: f64) -> Self {
        ConfigValue::Number(n)
    }

    pub fn text(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }

    /// Build a map value from key/value pairs.
    pub fn obj(entries: Vec<(&str, ConfigValue)>) -> Self {
        let mut map = FnvHashMap::default();
        for (k, v) in entries {
            map.insert(k.to_string(), v);
        }
        ConfigValue::Map(map)
    }

    pub fn empty() -> Self {
        ConfigValue::Map(FnvHashMap::default())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// Numeric field, `default` when absent, non-numeric or non-finite.
    pub fn number(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(ConfigValue::Number(n)) if n.is_finite() => *n,
            _ => default,
        }
    }

    /// Numeric field clamped into `[min, max]`. Non-finite values fall back
    /// to `default` before clamping, so NaN can never escape.
    pub fn number_clamped(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        self.number(key, default).clamp(min, max)
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(ConfigValue::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(ConfigValue::Str(s)) => s.as_str(),
            _ => default,
        }
    }

    /// Walk the tree and reject non-finite numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn walk(v: &ConfigValue, path: &str) -> Result<(), ConfigError> {
            match v {
                ConfigValue::Number(n) if !n.is_finite() => Err(ConfigError::NonFinite {
                    key: path.to_string(),
                }),
                ConfigValue::List(items) => {
                    for item in items {
                        walk(item, path)?;
                    }
                    Ok(())
                }
                ConfigValue::Map(m) => {
                    for (k, item) in m {
                        let child = if path.is_empty() {
                            k.clone()
                        } else {
                            format!("{path}.{k}")
                        };
                        walk(item, &child)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        }
        walk(self, "")
    }
}

/// Pure deep merge of per-effect configuration layers.
///
/// Maps merge key-wise; lists and scalars replace. Later layers win.
pub fn resolve_effect_config(
    defaults: &ConfigValue,
    stored: Option<&ConfigValue>,
    overrides: Option<&ConfigValue>,
) -> ConfigValue {
    let mut out = defaults.clone();
    if let Some(s) = stored {
        out = merge(&out, s);
    }
    if let Some(o) = overrides {
        out = merge(&out, o);
    }
    out
}

fn merge(base: &ConfigValue, over: &ConfigValue) -> ConfigValue {
    match (base, over) {
        (ConfigValue::Map(b), ConfigValue::Map(o)) => {
            let mut out = b.clone();
            for (k, v) in o {
                let merged = match out.get(k) {
                    Some(existing) => merge(existing, v),
                    None => v.clone(),
                };
                out.insert(k.clone(), merged);
            }
            ConfigValue::Map(out)
        }
        _ => over.clone(),
    }
}

/// Reduced-motion scaling policy.
///
/// Factors are the ones the product shipped with: 0.4× particle counts
/// (never below one) and 0.6× durations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Motion {
    pub reduced: bool,
}

impl Motion {
    pub const COUNT_FACTOR: f64 = 0.4;
    pub const DURATION_FACTOR: f64 = 0.6;

    pub fn scale_count(&self, count: usize) -> usize {
        if !self.reduced || count == 0 {
            return count;
        }
        ((count as f64 * Self::COUNT_FACTOR).ceil() as usize).max(1)
    }

    pub fn scale_duration_ms(&self, ms: f64) -> f64 {
        if self.reduced {
            ms * Self::DURATION_FACTOR
        } else {
            ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_merge_keywise_scalars_replace() {
        let defaults = ConfigValue::obj(vec![
            ("count", ConfigValue::num(100.0)),
            ("durationMs", ConfigValue::num(3000.0)),
            (
                "wind",
                ConfigValue::obj(vec![
                    ("strength", ConfigValue::num(1.0)),
                    ("dir", ConfigValue::num(-1.0)),
                ]),
            ),
        ]);
        let overrides = ConfigValue::obj(vec![
            ("count", ConfigValue::num(10.0)),
            ("wind", ConfigValue::obj(vec![("strength", ConfigValue::num(2.0))])),
        ]);
        let merged = resolve_effect_config(&defaults, None, Some(&overrides));
        assert_eq!(merged.number("count", 0.0), 10.0);
        assert_eq!(merged.number("durationMs", 0.0), 3000.0);
        let wind = merged.get("wind").unwrap();
        assert_eq!(wind.number("strength", 0.0), 2.0);
        assert_eq!(wind.number("dir", 0.0), -1.0);
    }

    #[test]
    fn lists_replace_wholesale() {
        let a = ConfigValue::obj(vec![(
            "colors",
            ConfigValue::List(vec![ConfigValue::text("#fff"), ConfigValue::text("#000")]),
        )]);
        let b = ConfigValue::obj(vec![(
            "colors",
            ConfigValue::List(vec![ConfigValue::text("#f00")]),
        )]);
        let merged = resolve_effect_config(&a, Some(&b), None);
        match merged.get("colors") {
            Some(ConfigValue::List(items)) => assert_eq!(items.len(), 1),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_numbers_never_escape_accessors() {
        let cfg = ConfigValue::obj(vec![("count", ConfigValue::num(f64::NAN))]);
        assert_eq!(cfg.number("count", 25.0), 25.0);
        assert_eq!(cfg.number_clamped("count", 25.0, 1.0, 10.0), 10.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn reduced_motion_scaling() {
        let m = Motion { reduced: true };
        assert_eq!(m.scale_count(100), 40);
        assert_eq!(m.scale_count(1), 1);
        assert_eq!(m.scale_count(2), 1);
        assert!((m.scale_duration_ms(1000.0) - 600.0).abs() < 1e-9);
        let full = Motion { reduced: false };
        assert_eq!(full.scale_count(100), 100);
        assert_eq!(full.scale_duration_ms(1000.0), 1000.0);
    }
}
