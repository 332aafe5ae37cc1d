//! Glob to regular-expression translation.
//!
//! Testbench code writes shell-style globs (`uvm_*`, `top.env.?gent`); the
//! matcher wants regular expressions. [`glob_to_re`] rewrites the former
//! into the latter, anchors the result with `^`/`$`, and wraps it in the
//! `/` delimiter so a second translation pass is a no-op.

/// Delimiter marking a pattern as "already a regular expression".
pub const RE_BRACKET_CHAR: char = '/';

/// Check whether a pattern is wrapped in the regex delimiter on both ends.
///
/// A lone `/` is not bracketed; the delimiters must be two distinct
/// characters.
#[must_use]
pub fn is_bracketed(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    bytes.len() > 1
        && bytes[0] == RE_BRACKET_CHAR as u8
        && bytes[bytes.len() - 1] == RE_BRACKET_CHAR as u8
}

/// Strip the regex delimiters if present, otherwise return the input as-is.
///
/// The delimiter is ASCII, so the byte-range slice stays on a char boundary.
pub(crate) fn strip_brackets(pattern: &str) -> &str {
    if is_bracketed(pattern) {
        &pattern[1..pattern.len() - 1]
    } else {
        pattern
    }
}

/// Translate a glob into an anchored, delimiter-wrapped regular expression.
///
/// Rewrite rules: `*` → `.*`, `+` → `.+`, `?` → `.`; the regex
/// metacharacters `.`, `[`, `]`, `(`, `)` are escaped; everything else is
/// copied verbatim. The result gains a leading `^` and trailing `$` unless
/// already present, then is wrapped in [`RE_BRACKET_CHAR`] on both ends.
///
/// Degenerate inputs (empty, or a single delimiter character) produce an
/// empty string. An input that is already delimiter-wrapped is returned
/// unchanged, which makes the translation idempotent:
///
/// ```
/// use uvm_re::glob_to_re;
///
/// let once = glob_to_re("file?.txt");
/// assert_eq!(once, r"/^file.\.txt$/");
/// assert_eq!(glob_to_re(&once), once);
/// ```
#[must_use]
pub fn glob_to_re(glob: &str) -> String {
    if glob.is_empty() || (glob.len() == 1 && glob.starts_with(RE_BRACKET_CHAR)) {
        return String::new();
    }

    // Already a regular expression; nothing to translate.
    if is_bracketed(glob) {
        return glob.to_string();
    }

    let mut re = String::with_capacity(glob.len() + 4);
    for ch in glob.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '+' => re.push_str(".+"),
            '?' => re.push('.'),
            '.' => re.push_str("\\."),
            '[' => re.push_str("\\["),
            ']' => re.push_str("\\]"),
            '(' => re.push_str("\\("),
            ')' => re.push_str("\\)"),
            other => re.push(other),
        }
    }

    // Anchor at both ends unless the glob already supplied the anchors.
    if !re.starts_with('^') {
        re.insert(0, '^');
    }
    if !re.ends_with('$') {
        re.push('$');
    }

    format!("{RE_BRACKET_CHAR}{re}{RE_BRACKET_CHAR}")
}
