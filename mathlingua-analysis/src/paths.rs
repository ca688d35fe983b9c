//! Natural path ordering
//!
//! Content directories number their entries (`1_sets`, `2_functions`, `10_limits`) so the
//! table of contents reads in order. Paths are compared component by component:
//!
//!     - a component with a numeric `<n>_` prefix sorts before one without
//!     - two prefixed components compare by number, then by the rest of the name
//!     - anything else compares lexicographically

use std::cmp::Ordering;

fn numeric_prefix(component: &str) -> Option<(u64, &str)> {
    let (digits, rest) = component.split_once('_')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (n, rest))
}

fn compare_components(a: &str, b: &str) -> Ordering {
    match (numeric_prefix(a), numeric_prefix(b)) {
        (Some((n, a_rest)), Some((m, b_rest))) => n.cmp(&m).then_with(|| a_rest.cmp(b_rest)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Compare two `/`-separated paths in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.split('/');
    let mut right = b.split('/');
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => match compare_components(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

pub fn sort_paths<S: AsRef<str>>(paths: &mut [S]) {
    paths.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2_b", "10_a", Ordering::Less)]
    #[case("1_a", "intro", Ordering::Less)]
    #[case("intro", "1_a", Ordering::Greater)]
    #[case("1_a", "1_b", Ordering::Less)]
    #[case("alpha", "beta", Ordering::Less)]
    #[case("x_y", "1_y", Ordering::Greater)]
    #[case("content/2_b/z", "content/10_a/a", Ordering::Less)]
    #[case("content/a", "content/a/b", Ordering::Less)]
    fn test_natural_cmp(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(natural_cmp(a, b), expected);
    }

    #[test]
    fn test_sort_paths() {
        let mut paths = vec!["c/10_x.math", "c/2_y.math", "c/notes.math", "c/1_z.math"];
        sort_paths(&mut paths);
        assert_eq!(
            paths,
            vec!["c/1_z.math", "c/2_y.math", "c/10_x.math", "c/notes.math"]
        );
    }
}
