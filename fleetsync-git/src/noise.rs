//! Filtering of advisory chatter from git's diagnostic output.

/// Lines kept in a condensed diagnostic.
pub const MAX_DIAGNOSTIC_LINES: usize = 3;

/// Drop blank lines and lines starting (after leading whitespace) with any of
/// `prefixes`. Remaining lines keep their order.
pub fn filter_noise<S: AsRef<str>>(output: &str, prefixes: &[S]) -> String {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| {
            let trimmed = line.trim_start();
            !prefixes.iter().any(|p| trimmed.starts_with(p.as_ref()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse filtered output into a single short line for log output.
pub fn condense(filtered: &str) -> String {
    let lines: Vec<&str> = filtered.lines().map(str::trim).collect();
    let mut shown: Vec<String> = lines
        .iter()
        .take(MAX_DIAGNOSTIC_LINES)
        .map(|line| (*line).to_string())
        .collect();
    let hidden = lines.len().saturating_sub(shown.len());
    if hidden > 0 {
        shown.push(format!("(+{hidden} more)"));
    }
    shown.join(" | ")
}
