//! Derived signal values that may be unavailable.
//!
//! A missing target or an empty history is not an error and must never be
//! confused with a computed zero, so every derived signal is a [`Derived`].

use serde::Serialize;

/// Why a derived signal could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientData {
    /// The indicator has no (active) measurements
    NoMeasurements,
    /// Only one measurement exists; comparisons need two
    SinglePoint,
    /// No target value configured
    NoTarget,
    /// Target is zero; a ratio against it is undefined
    ZeroTarget,
    /// Target is negative; ratios against it are not defined by this engine
    NegativeTarget,
    /// The policy has nothing configured for this signal
    NotConfigured,
    /// No contributor to a roll-up had a usable value
    NoContributors,
    /// Every contributor to a roll-up carries zero weight
    ZeroWeight,
}

impl InsufficientData {
    pub fn describe(self) -> &'static str {
        match self {
            InsufficientData::NoMeasurements => "no measurements recorded",
            InsufficientData::SinglePoint => "only one measurement recorded",
            InsufficientData::NoTarget => "no target configured",
            InsufficientData::ZeroTarget => "target is zero",
            InsufficientData::NegativeTarget => "target is negative",
            InsufficientData::NotConfigured => "not configured",
            InsufficientData::NoContributors => "no linked indicator has data",
            InsufficientData::ZeroWeight => "all link weights are zero",
        }
    }
}

/// A derived signal: either a computed value or an explicit reason it is
/// not available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Derived<T> {
    Available(T),
    Insufficient(InsufficientData),
}

impl<T> Derived<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Derived::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Derived::Available(v) => Some(v),
            Derived::Insufficient(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Derived::Available(v) => Some(v),
            Derived::Insufficient(_) => None,
        }
    }

    pub fn reason(&self) -> Option<InsufficientData> {
        match self {
            Derived::Available(_) => None,
            Derived::Insufficient(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Derived<U> {
        match self {
            Derived::Available(v) => Derived::Available(f(v)),
            Derived::Insufficient(reason) => Derived::Insufficient(reason),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Derived<U>) -> Derived<U> {
        match self {
            Derived::Available(v) => f(v),
            Derived::Insufficient(reason) => Derived::Insufficient(reason),
        }
    }
}

impl<T: Copy> Derived<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_is_not_zero() {
        let zero: Derived<f64> = Derived::Available(0.0);
        let missing: Derived<f64> = Derived::Insufficient(InsufficientData::NoTarget);
        assert_ne!(zero, missing);
        assert_eq!(zero.get(), Some(0.0));
        assert_eq!(missing.get(), None);
        assert_eq!(missing.reason(), Some(InsufficientData::NoTarget));
    }

    #[test]
    fn map_preserves_reason() {
        let missing: Derived<f64> = Derived::Insufficient(InsufficientData::ZeroTarget);
        assert_eq!(missing.map(|v| v * 2.0).reason(), Some(InsufficientData::ZeroTarget));
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_string(&Derived::Available(52.0)).unwrap();
        assert_eq!(json, r#"{"state":"available","value":52.0}"#);

        let json =
            serde_json::to_string(&Derived::<f64>::Insufficient(InsufficientData::NoTarget)).unwrap();
        assert_eq!(json, r#"{"state":"insufficient","value":"no_target"}"#);
    }
}
