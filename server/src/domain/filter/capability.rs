//! Filter capability descriptor
//!
//! Declares which comparison modes a single field supports. Equality is always
//! implied; the flags below opt a field into range/pattern comparisons,
//! list-of-values matching, and required-ness.

use std::fmt;

use serde::Serialize;

/// Comparison modes beyond direct equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
}

impl ComparisonMode {
    /// All modes in document order (also the order conjuncts are emitted in)
    pub const ALL: [ComparisonMode; 5] = [
        ComparisonMode::Lt,
        ComparisonMode::Gt,
        ComparisonMode::Lte,
        ComparisonMode::Gte,
        ComparisonMode::Like,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Lte => "lte",
            Self::Gte => "gte",
            Self::Like => "like",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter capability attached to one field of a record kind
///
/// Built once at schema construction with the consuming `with_*` methods and
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCapability {
    lt: bool,
    gt: bool,
    lte: bool,
    gte: bool,
    like: bool,
    list: bool,
    required: bool,
}

impl FilterCapability {
    /// Equality-only capability
    pub const fn new() -> Self {
        Self {
            lt: false,
            gt: false,
            lte: false,
            gte: false,
            like: false,
            list: false,
            required: false,
        }
    }

    pub const fn with_lt(self) -> Self {
        Self { lt: true, ..self }
    }

    pub const fn with_gt(self) -> Self {
        Self { gt: true, ..self }
    }

    pub const fn with_lte(self) -> Self {
        Self { lte: true, ..self }
    }

    pub const fn with_gte(self) -> Self {
        Self { gte: true, ..self }
    }

    /// Case-insensitive substring match
    pub const fn with_like(self) -> Self {
        Self { like: true, ..self }
    }

    /// Accept a list of values (matched with `IN`)
    pub const fn with_list(self) -> Self {
        Self { list: true, ..self }
    }

    /// Caller must always supply a value
    pub const fn with_required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Enable `lt`, `gt`, `lte` and `gte` at once
    pub const fn with_range(self) -> Self {
        Self {
            lt: true,
            gt: true,
            lte: true,
            gte: true,
            ..self
        }
    }

    pub const fn allows(&self, mode: ComparisonMode) -> bool {
        match mode {
            ComparisonMode::Lt => self.lt,
            ComparisonMode::Gt => self.gt,
            ComparisonMode::Lte => self.lte,
            ComparisonMode::Gte => self.gte,
            ComparisonMode::Like => self.like,
        }
    }

    pub const fn is_list(&self) -> bool {
        self.list
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// True iff any of `lt`, `gt`, `lte`, `gte`, `like` is enabled
    pub const fn needs_comparison_input(&self) -> bool {
        self.lt || self.gt || self.lte || self.gte || self.like
    }

    /// Enabled comparison modes in document order
    pub fn comparison_modes(&self) -> impl Iterator<Item = ComparisonMode> + '_ {
        ComparisonMode::ALL
            .into_iter()
            .filter(move |mode| self.allows(*mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_equality_only() {
        let cap = FilterCapability::new();
        assert!(!cap.needs_comparison_input());
        assert!(!cap.is_list());
        assert!(!cap.is_required());
        assert_eq!(cap.comparison_modes().count(), 0);
        assert_eq!(cap, FilterCapability::default());
    }

    #[test]
    fn test_list_and_required_do_not_need_comparison() {
        let cap = FilterCapability::new().with_list().with_required();
        assert!(cap.is_list());
        assert!(cap.is_required());
        assert!(!cap.needs_comparison_input());
    }

    #[test]
    fn test_each_mode_needs_comparison() {
        for mode in ComparisonMode::ALL {
            let cap = match mode {
                ComparisonMode::Lt => FilterCapability::new().with_lt(),
                ComparisonMode::Gt => FilterCapability::new().with_gt(),
                ComparisonMode::Lte => FilterCapability::new().with_lte(),
                ComparisonMode::Gte => FilterCapability::new().with_gte(),
                ComparisonMode::Like => FilterCapability::new().with_like(),
            };
            assert!(cap.needs_comparison_input(), "{mode} should need comparison");
            assert_eq!(cap.comparison_modes().collect::<Vec<_>>(), vec![mode]);
        }
    }

    #[test]
    fn test_comparison_modes_document_order() {
        let cap = FilterCapability::new().with_like().with_gte().with_lt();
        let modes: Vec<_> = cap.comparison_modes().collect();
        assert_eq!(
            modes,
            vec![ComparisonMode::Lt, ComparisonMode::Gte, ComparisonMode::Like]
        );
    }

    #[test]
    fn test_with_range() {
        let cap = FilterCapability::new().with_range();
        assert_eq!(cap.comparison_modes().count(), 4);
        assert!(!cap.allows(ComparisonMode::Like));
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        for mode in ComparisonMode::ALL {
            assert_eq!(ComparisonMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ComparisonMode::parse("eq"), None);
        assert_eq!(ComparisonMode::parse("LT"), None);
    }
}
