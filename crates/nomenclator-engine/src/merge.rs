//! Compaction of a street's index labels into one display string.

/// Merges a street's distinct index labels into one compact label.
///
/// `sorted` must be in ascending string order. Note that this is plain
/// string order, so `"А-10"` sorts before `"А-2"`.
///
/// - Labels sharing the letter prefix of the first label collapse onto it:
///   `["А-1", "А-2"]` gives `"А-1, 2"`.
/// - Otherwise, if the labels carry at least two distinct numbers, they are
///   grouped by number in order of first appearance, with letters listed
///   before each number: `["А-1", "Б-1", "Б-2"]` gives `"А, Б-1; Б-2"`.
///
/// Returns `None` when nothing can be merged, including labels that differ
/// only in their letters such as `["А-1", "Б-1"]`. Callers then fall back to
/// the row's own label.
///
/// # Examples
///
/// ```
/// use nomenclator_engine::merge_indices;
///
/// assert_eq!(merge_indices(&["А-3"]).as_deref(), Some("А-3"));
/// assert_eq!(merge_indices(&["А-1", "А-2", "А-3"]).as_deref(), Some("А-1, 2, 3"));
/// assert_eq!(merge_indices(&["А-3", "Б-4"]).as_deref(), Some("А-3; Б-4"));
/// assert_eq!(merge_indices(&["А-1", "Б-1"]), None);
/// assert_eq!(merge_indices::<&str>(&[]), None);
/// ```
#[must_use]
pub fn merge_indices<S: AsRef<str>>(sorted: &[S]) -> Option<String> {
    let first = sorted.first()?.as_ref();
    let prefix = &first[..digit_start(first).unwrap_or(0)];

    if sorted.iter().all(|index| index.as_ref().starts_with(prefix)) {
        let numbers: Vec<&str> = sorted
            .iter()
            .map(|index| &index.as_ref()[prefix.len()..])
            .collect();
        return Some(format!("{prefix}{}", numbers.join(", ")));
    }

    let mut numbers: Vec<&str> = sorted
        .iter()
        .map(|index| number_part(index.as_ref()))
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    if numbers.len() < 2 {
        return None;
    }

    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for index in sorted {
        let index = index.as_ref();
        let number = number_part(index);
        let letters = letter_part(index);
        match groups.iter_mut().find(|(n, _)| *n == number) {
            Some((_, letter_list)) => letter_list.push(letters),
            None => groups.push((number, vec![letters])),
        }
    }

    let labels: Vec<String> = groups
        .iter()
        .map(|(number, letters)| format!("{}-{number}", letters.join(", ")))
        .collect();
    Some(labels.join("; "))
}

/// Byte offset of the first digit.
fn digit_start(index: &str) -> Option<usize> {
    index.find(|c: char| c.is_ascii_digit())
}

/// The label from its first digit on, or the whole label if it has no digit.
fn number_part(index: &str) -> &str {
    digit_start(index).map_or(index, |start| &index[start..])
}

/// Everything before the first digit, with dashes removed.
fn letter_part(index: &str) -> String {
    index
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .filter(|c| *c != '-')
        .collect()
}
