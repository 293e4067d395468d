//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let rows = expected_lines.len().max(actual_lines.len());
    for i in 0..rows {
        let e = expected_lines.get(i);
        let a = actual_lines.get(i);
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        if let Some(e) = e {
            out.push_str(&format!("-{e:?}\n"));
        }
        if let Some(a) = a {
            out.push_str(&format!("+{a:?}\n"));
        }
    }
    if let Some(col) = first_difference(expected, actual) {
        out.push_str(&format!("first difference at char {col}\n"));
    }
    out
}

/// Char offset of the first differing character, if the texts differ.
#[must_use]
pub fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    let mut e = expected.chars();
    let mut a = actual.chars();
    let mut index = 0;
    loop {
        match (e.next(), a.next()) {
            (None, None) => return None,
            (x, y) if x == y => index += 1,
            _ => return Some(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical() {
        assert_eq!(render_diff("a\nb", "a\nb"), "[identical]");
        assert_eq!(first_difference("abc", "abc"), None);
    }

    #[test]
    fn whitespace_differences_are_visible() {
        let diff = render_diff("   3", "  3");
        assert!(diff.contains("-\"   3\""), "{diff}");
        assert!(diff.contains("+\"  3\""), "{diff}");
        assert!(diff.contains("first difference at char 2"), "{diff}");
    }

    #[test]
    fn extra_lines_are_reported() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2 @@"));
        assert!(diff.contains("+\"b\""));
    }

    #[test]
    fn prefix_difference() {
        assert_eq!(first_difference("ab", "abc"), Some(2));
        assert_eq!(first_difference("é1", "é2"), Some(1));
    }
}
