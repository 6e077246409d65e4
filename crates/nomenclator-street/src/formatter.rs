use std::sync::LazyLock;

use regex::Regex;

use crate::StreetTypes;

/// An ordinal like `2-й` or `12-Й`, ending the token or followed by a non-word character.
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+-й\b").expect("ordinal pattern is valid"));

/// Canonicalizes raw street names into index display form.
///
/// A leading street type moves to the end, after a comma, so that the
/// index sorts by the proper name: `"УЛ. Якуба Коласа"` becomes
/// `"Якуба коласа, ул."`. Ordinal prefixes (`"2-й"`) travel with the type.
///
/// # Examples
///
/// ```
/// use nomenclator_street::StreetFormatter;
///
/// let formatter = StreetFormatter::default();
/// assert_eq!(formatter.format("УЛ. Якуба Коласа"), "Якуба коласа, ул.");
/// assert_eq!(formatter.format("2-й ПЕР. Ленина"), "Ленина, 2-й пер.");
/// assert_eq!(formatter.format("проспект мира"), "Проспект мира");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetFormatter {
    types: StreetTypes,
}

impl StreetFormatter {
    /// Creates a formatter recognizing the given street types.
    #[must_use]
    pub fn new(types: StreetTypes) -> Self {
        Self { types }
    }

    /// Returns the recognized street types.
    #[must_use]
    pub fn street_types(&self) -> &StreetTypes {
        &self.types
    }

    /// Formats a raw street name. Never fails.
    ///
    /// Names of fewer than two words are returned trimmed and otherwise
    /// untouched. Longer names are rearranged as follows:
    ///
    /// 1. `TYPE name...` becomes `Name..., type`.
    /// 2. `N-й TYPE name...` becomes `Name..., n-й type`.
    /// 3. `N-й name... TYPE` becomes `Name..., n-й type`.
    /// 4. Anything else is capitalized as given, spacing included.
    #[must_use]
    pub fn format(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let [first, second, ..] = parts[..] else {
            return trimmed.to_owned();
        };
        let last = parts[parts.len() - 1];

        if self.types.contains(first) {
            let name = capitalize(&parts[1..].join(" "));
            return format!("{name}, {}", first.to_lowercase());
        }

        if is_ordinal(first) {
            if self.types.contains(second) {
                let name = capitalize(&parts[2..].join(" "));
                let prefix = parts[..2].join(" ").to_lowercase();
                return format!("{name}, {prefix}");
            }
            if self.types.contains(last) {
                let name = capitalize(&parts[1..parts.len() - 1].join(" "));
                let prefix = format!("{} {}", first.to_lowercase(), last.to_lowercase());
                return format!("{name}, {prefix}");
            }
        }

        capitalize(raw)
    }
}

/// Returns `true` if `token` starts with an ordinal number marker.
#[must_use]
pub fn is_ordinal(token: &str) -> bool {
    ORDINAL_RE.is_match(token)
}

/// Upper-cases the first character of the whole phrase and lower-cases the rest.
#[must_use]
pub fn capitalize(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}
