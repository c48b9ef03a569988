//! Row-level location predicate.
//!
//! A row belongs to a location when the lower-cased row text contains every
//! filter token as a plain substring. There is no column binding: a token
//! that happens to appear in an unrelated field (a business named "Texas
//! Roadhouse", say) is counted as a match. Callers must treat the counts
//! as candidates, not verified locations.

/// Predicate that decides whether a raw CSV line belongs to a requested
/// state and/or city
#[derive(Debug, Clone)]
pub struct LocationFilter {
    tokens: Vec<String>,
}

impl LocationFilter {
    /// Build a filter from optional state and city names. Returns `None`
    /// when neither is given, so callers can skip filtering entirely.
    pub fn new(state: Option<&str>, city: Option<&str>) -> Option<Self> {
        let tokens: Vec<String> = [state, city]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// The lower-cased tokens a row must contain
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Check a lower-cased row against all tokens
    pub fn matches(&self, line_lower: &str) -> bool {
        self.tokens.iter().all(|token| line_lower.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tokens_means_no_filter() {
        assert!(LocationFilter::new(None, None).is_none());
        assert!(LocationFilter::new(Some("  "), Some("")).is_none());
    }

    #[test]
    fn test_single_token() {
        let filter = LocationFilter::new(Some("California"), None).unwrap();
        assert!(filter.matches("joe's diner, 12 main st, california, 90210"));
        assert!(!filter.matches("joe's diner, 12 main st, texas, 75001"));
    }

    #[test]
    fn test_all_tokens_required() {
        let filter = LocationFilter::new(Some("Texas"), Some("Austin")).unwrap();
        assert!(filter.matches("gym one, 4 elm st, austin, texas"));
        assert!(!filter.matches("gym two, 9 oak st, dallas, texas"));
    }

    #[test]
    fn test_substring_false_positive_is_preserved() {
        // A business name containing the state token counts as a match
        let filter = LocationFilter::new(Some("Texas"), None).unwrap();
        assert!(filter.matches("texas roadhouse, 3 pine st, oklahoma city"));
    }
}
