//! Per-cycle retry budget.

/// Remaining retries for one assignment attempt sequence.
///
/// Built from the signed `--retries` value: `N >= 0` allows `N` retries
/// (`N + 1` attempts), a negative value retries until success. The budget
/// lives for one cycle only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: Option<u64>,
}

impl RetryBudget {
    /// Create a budget from the configured retry count
    #[must_use]
    pub fn new(retries: i64) -> Self {
        Self {
            remaining: u64::try_from(retries).ok(),
        }
    }

    /// Whether this budget never runs out
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.remaining.is_none()
    }

    /// Retries left, `None` when unlimited
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Take one retry from the budget.
    ///
    /// Returns `false` when the budget is exhausted and no further attempt
    /// may be made.
    pub fn try_consume(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_budget() {
        let mut budget = RetryBudget::new(2);
        assert!(!budget.is_unlimited());
        assert!(budget.try_consume());
        assert!(budget.try_consume());
        assert_eq!(budget.remaining(), Some(0));
        assert!(!budget.try_consume());
        assert!(!budget.try_consume());
    }

    #[test]
    fn test_zero_budget_allows_no_retry() {
        let mut budget = RetryBudget::new(0);
        assert!(!budget.try_consume());
    }

    #[test]
    fn test_negative_budget_is_unlimited() {
        let mut budget = RetryBudget::new(-1);
        assert!(budget.is_unlimited());
        for _ in 0..10_000 {
            assert!(budget.try_consume());
        }
        assert_eq!(budget.remaining(), None);
    }
}
