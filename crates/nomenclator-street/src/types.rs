//! Recognized street-type tokens.

/// Street-type abbreviations recognized by default.
pub const DEFAULT_STREET_TYPES: [&str; 10] = [
    "УЛ.",
    "ПРОСП.",
    "ПР.",
    "ПЕР.",
    "Ш.",
    "НАБ.",
    "Б-Р",
    "БУЛЬВАР",
    "ПЛ.",
    "ПЛОЩАДЬ",
];

/// The set of tokens treated as a street type (street, avenue, lane, ...).
///
/// Matching is exact and case-sensitive: `"УЛ."` is a type, `"ул."` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetTypes {
    tokens: Vec<String>,
}

impl Default for StreetTypes {
    fn default() -> Self {
        Self::new(DEFAULT_STREET_TYPES)
    }
}

impl StreetTypes {
    /// Builds a set from the given tokens, ignoring blanks and repeats.
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Vec::new();
        for token in tokens {
            let token: String = token.into();
            let token = token.trim();
            if !token.is_empty() && !set.iter().any(|t: &String| t == token) {
                set.push(token.to_owned());
            }
        }
        Self { tokens: set }
    }

    /// Returns `true` if `token` is a recognized street type.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Returns the tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token is recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let types = StreetTypes::default();
        assert_eq!(types.len(), DEFAULT_STREET_TYPES.len());
        assert!(types.contains("УЛ."));
        assert!(types.contains("Б-Р"));
        assert!(!types.contains("ул."));
        assert!(!types.contains("УЛ"));
    }

    #[test]
    fn test_new_skips_blanks_and_repeats() {
        let types = StreetTypes::new(["ST.", " ", "AVE.", "ST.", " RD. "]);
        assert_eq!(types.iter().collect::<Vec<_>>(), ["ST.", "AVE.", "RD."]);
        assert!(StreetTypes::new(Vec::<String>::new()).is_empty());
    }
}
