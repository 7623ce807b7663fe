//! Named activation conditions.
//!
//! Listeners carry an `if`/`unless` pair of condition names. What a name means
//! is up to the surrounding build system, which answers through
//! [`ConditionEvaluator`].

use std::collections::BTreeMap;

/// Answers whether a named condition is satisfied.
pub trait ConditionEvaluator {
    /// Whether the condition called `name` is satisfied.
    fn evaluate(&self, name: &str) -> bool;

    /// Whether an `if` condition lets a listener through.
    ///
    /// A missing or empty name always holds.
    fn if_condition_holds(&self, name: Option<&str>) -> bool {
        name.filter(|n| !n.is_empty())
            .is_none_or(|n| self.evaluate(n))
    }

    /// Whether an `unless` condition blocks a listener.
    ///
    /// A missing or empty name never holds.
    fn unless_condition_holds(&self, name: Option<&str>) -> bool {
        name.filter(|n| !n.is_empty())
            .is_some_and(|n| self.evaluate(n))
    }
}

impl<F> ConditionEvaluator for F
where
    F: Fn(&str) -> bool,
{
    fn evaluate(&self, name: &str) -> bool {
        self(name)
    }
}

/// Conditions backed by a set of build properties.
///
/// The literals `true`, `on` and `yes` always hold and `false`, `off` and `no`
/// never do (case-insensitively). Any other name holds when a property of that
/// name is defined, whatever its value.
///
/// # Examples
///
/// ```
/// use junitfork_lib::{ConditionEvaluator, PropertyConditions};
///
/// let props = PropertyConditions::from_iter([("ci", "")]);
/// assert!(props.evaluate("ci"));
/// assert!(!props.evaluate("release"));
/// assert!(props.evaluate("Yes"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyConditions {
    properties: BTreeMap<String, String>,
}

impl PropertyConditions {
    #[must_use]
    pub fn new(properties: BTreeMap<String, String>) -> Self {
        Self { properties }
    }

    /// Define or replace a property.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyConditions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn literal_bool(name: &str) -> Option<bool> {
    const TRUTHY: [&str; 3] = ["true", "on", "yes"];
    const FALSY: [&str; 3] = ["false", "off", "no"];
    if TRUTHY.iter().any(|t| name.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|f| name.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

impl ConditionEvaluator for PropertyConditions {
    fn evaluate(&self, name: &str) -> bool {
        literal_bool(name).unwrap_or_else(|| self.properties.contains_key(name))
    }
}
