/// Strip all whitespace and fold case, the form every comparison runs on
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized edit-distance similarity between two strings
///
/// Both inputs are normalized with [`normalize`], then compared with the
/// Levenshtein distance (unit cost insert/delete/substitute). The result is
/// `1 - distance / max(len(a), len(b), 1)`, so two empty strings score 1.0.
///
/// The score is symmetric and lies in `[0.0, 1.0]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    let distance = strsim::levenshtein(&a, &b);
    let longest = a.chars().count().max(b.chars().count()).max(1);

    #[allow(clippy::cast_precision_loss)] // transcript-sized strings
    let (distance, longest) = (distance as f64, longest as f64);
    1.0 - distance / longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert!((similarity("main.py", "main.py") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_both_empty() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_whitespace_and_case_ignored() {
        assert!((similarity("Main . Py", "main.py") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("  READ ME ", "readme") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("mainpy", "main.py"),
            ("utils", "README.md"),
            ("", "abc"),
            ("kitten", "sitting"),
        ];
        for (a, b) in pairs {
            assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_completely_different() {
        assert!(similarity("abc", "xyz").abs() < f64::EPSILON);
        assert!(similarity("", "abc").abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_match() {
        // kitten -> sitting is the classic distance-3 pair over 7 chars
        let score = similarity("kitten", "sitting");
        assert!((score - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Main\t.PY \n"), "main.py");
        assert_eq!(normalize(""), "");
    }
}
