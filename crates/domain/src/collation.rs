//! Display-name collation.
//!
//! Names compare on three levels: base letters ignoring accents and case,
//! then accents, then case with lowercase first. Names equal on all three
//! levels compare equal so stable sorts keep retrieval order.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compares two display names in dictionary order.
#[must_use]
pub fn compare_names(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(base_letters(right))
        .then_with(|| accented_letters(left).cmp(accented_letters(right)))
        .then_with(|| case_ranks(left).cmp(case_ranks(right)))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|character| !is_combining_mark(*character))
        .flat_map(char::to_lowercase)
}

fn accented_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

fn case_ranks(name: &str) -> impl Iterator<Item = bool> + '_ {
    name.nfd().map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::compare_names;

    fn sorted(names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        names.sort_by(|left, right| compare_names(left, right));
        names
    }

    #[test]
    fn case_does_not_split_the_alphabet() {
        assert_eq!(
            sorted(&["bravo", "Charlie", "alpha", "Zed"]),
            vec!["alpha", "bravo", "Charlie", "Zed"]
        );
    }

    #[test]
    fn lowercase_sorts_before_uppercase_on_ties() {
        assert_eq!(sorted(&["Alpha", "alpha", "ALPHA"]), vec!["alpha", "Alpha", "ALPHA"]);
    }

    #[test]
    fn accents_are_secondary() {
        assert_eq!(
            sorted(&["resumes", "résumé", "resume", "Rose"]),
            vec!["resume", "résumé", "resumes", "Rose"]
        );
    }

    #[test]
    fn composed_and_decomposed_forms_are_equal() {
        assert_eq!(compare_names("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
    }

    #[test]
    fn identical_names_are_equal() {
        assert_eq!(compare_names("Ada", "Ada"), Ordering::Equal);
    }
}
