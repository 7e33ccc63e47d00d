//! Condition sets and the condition-matching predicate.
//!
//! Every relation and expression link carries an open set of named
//! contextual attributes (domain, language, usage frequency, ...).
//! Context-sensitivity enters every query through exactly one predicate,
//! [`ConditionSet::satisfies`]; query code never reimplements it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition key holding a language tag.
pub const LANG_KEY: &str = "lang";

/// Condition key holding a usage frequency.
pub const FREQ_KEY: &str = "freq";

/// Condition key holding domain tags.
pub const DOMAIN_KEY: &str = "domain";

/// An open, ordered map of contextual attributes.
///
/// Values are JSON scalars or arrays; arrays carry finite-set semantics
/// during matching. The set is immutable once its owning record is
/// loaded into an [`Engine`](crate::Engine).
///
/// # Examples
///
/// ```
/// use imi::ConditionSet;
/// use serde_json::json;
///
/// let available = ConditionSet::new().with("domain", json!(["cooking", "craft"]));
/// let wanted = ConditionSet::new().with("domain", json!(["cooking"]));
/// assert!(available.satisfies(&wanted));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(BTreeMap<String, Value>);

impl ConditionSet {
    /// Creates an empty condition set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition, replacing any previous value for the key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Returns the value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if no conditions are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of condition keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The language tag, if this set carries one as a string.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.0.get(LANG_KEY).and_then(Value::as_str)
    }

    /// The usage frequency, defaulting to 1.0 when absent or non-numeric.
    #[must_use]
    pub fn freq(&self) -> f64 {
        self.0
            .get(FREQ_KEY)
            .and_then(Value::as_f64)
            .unwrap_or(1.0)
    }

    /// Decides whether this (available) set satisfies a requested filter.
    ///
    /// For every key in `wanted`: a `null` value always matches; a key
    /// absent from `self` fails; otherwise values compare with
    /// set-membership semantics in both directions — array/array matches
    /// on any shared member, array/scalar and scalar/array on membership,
    /// scalar/scalar on equality. All requested keys must match; keys
    /// present only in `self` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use imi::ConditionSet;
    /// use serde_json::json;
    ///
    /// let available = ConditionSet::new().with("lang", json!("ja"));
    /// assert!(available.satisfies(&ConditionSet::new()));
    /// assert!(available.satisfies(&ConditionSet::new().with("lang", json!(null))));
    /// assert!(!available.satisfies(&ConditionSet::new().with("lang", json!("en"))));
    /// ```
    #[must_use]
    pub fn satisfies(&self, wanted: &Self) -> bool {
        for (key, want) in &wanted.0 {
            if want.is_null() {
                continue;
            }
            let Some(have) = self.0.get(key) else {
                return false;
            };
            if !value_matches(have, want) {
                return false;
            }
        }
        true
    }

    /// Iterates over conditions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Compares one available value against one wanted value with
/// finite-set membership semantics in both directions.
fn value_matches(have: &Value, want: &Value) -> bool {
    match (have, want) {
        (Value::Array(have_set), Value::Array(want_set)) => {
            want_set.iter().any(|w| have_set.contains(w))
        }
        (Value::Array(have_set), scalar) => have_set.contains(scalar),
        (scalar, Value::Array(want_set)) => want_set.contains(scalar),
        (a, b) => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conds(pairs: &[(&str, Value)]) -> ConditionSet {
        let mut c = ConditionSet::new();
        for (k, v) in pairs {
            c = c.with(*k, v.clone());
        }
        c
    }

    #[test]
    fn test_empty_filter_always_matches() {
        let available = conds(&[("domain", json!(["cooking"])), ("lang", json!("ja"))]);
        assert!(available.satisfies(&ConditionSet::new()));
        assert!(ConditionSet::new().satisfies(&ConditionSet::new()));
    }

    #[test]
    fn test_null_requested_value_is_dont_care() {
        let available = conds(&[("lang", json!("ja"))]);
        let wanted = conds(&[("lang", json!(null)), ("anything", json!(null))]);
        assert!(available.satisfies(&wanted));
        assert!(ConditionSet::new().satisfies(&wanted));
    }

    #[test]
    fn test_missing_key_fails() {
        let available = conds(&[("lang", json!("ja"))]);
        let wanted = conds(&[("domain", json!("cooking"))]);
        assert!(!available.satisfies(&wanted));
    }

    #[test]
    fn test_array_vs_array_matches_on_any_member() {
        let available = conds(&[("domain", json!(["cooking", "craft"]))]);
        assert!(available.satisfies(&conds(&[("domain", json!(["cooking"]))])));
        assert!(available.satisfies(&conds(&[("domain", json!(["farming", "craft"]))])));
        assert!(!available.satisfies(&conds(&[("domain", json!(["farming"]))])));
    }

    #[test]
    fn test_array_available_scalar_wanted_is_membership() {
        let available = conds(&[("domain", json!(["cooking", "craft"]))]);
        assert!(available.satisfies(&conds(&[("domain", json!("craft"))])));
        assert!(!available.satisfies(&conds(&[("domain", json!("farming"))])));
    }

    #[test]
    fn test_scalar_available_array_wanted_is_membership() {
        let available = conds(&[("lang", json!("ja"))]);
        assert!(available.satisfies(&conds(&[("lang", json!(["ja", "en"]))])));
        assert!(!available.satisfies(&conds(&[("lang", json!(["en"]))])));
    }

    #[test]
    fn test_scalars_require_exact_equality() {
        let available = conds(&[("lang", json!("ja")), ("freq", json!(2))]);
        assert!(available.satisfies(&conds(&[("lang", json!("ja"))])));
        assert!(!available.satisfies(&conds(&[("lang", json!("JA"))])));
        assert!(available.satisfies(&conds(&[("freq", json!(2))])));
    }

    #[test]
    fn test_all_requested_keys_must_match() {
        let available = conds(&[("lang", json!("ja")), ("domain", json!(["cooking"]))]);
        let both = conds(&[("lang", json!("ja")), ("domain", json!("cooking"))]);
        assert!(available.satisfies(&both));

        let one_wrong = conds(&[("lang", json!("en")), ("domain", json!("cooking"))]);
        assert!(!available.satisfies(&one_wrong));
    }

    #[test]
    fn test_extra_available_keys_are_ignored() {
        let available = conds(&[
            ("lang", json!("ja")),
            ("register", json!("formal")),
            ("freq", json!(0.4)),
        ]);
        assert!(available.satisfies(&conds(&[("lang", json!("ja"))])));
    }

    #[test]
    fn test_freq_accessor_defaults_to_one() {
        assert!((ConditionSet::new().freq() - 1.0).abs() < f64::EPSILON);
        let c = conds(&[("freq", json!(2.5))]);
        assert!((c.freq() - 2.5).abs() < f64::EPSILON);
        let odd = conds(&[("freq", json!("often"))]);
        assert!((odd.freq() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lang_accessor_reads_string_tags_only() {
        assert_eq!(conds(&[("lang", json!("ja"))]).lang(), Some("ja"));
        assert_eq!(conds(&[("lang", json!(7))]).lang(), None);
        assert_eq!(ConditionSet::new().lang(), None);
    }

    #[test]
    fn test_condition_set_serde_is_a_plain_map() {
        let c = conds(&[("domain", json!(["cooking"])), ("lang", json!("ja"))]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, json!({"domain": ["cooking"], "lang": "ja"}));
        let back: ConditionSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
