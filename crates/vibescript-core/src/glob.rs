//! Path glob matching shared by ownership, guard and touch checks.

use globset::{GlobBuilder, GlobMatcher};

#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn compile(pattern: &str) -> Option<GlobMatcher> {
    match GlobBuilder::new(pattern).literal_separator(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(err) => {
            tracing::warn!(pattern, "skipping invalid glob: {err}");
            None
        }
    }
}

/// `*` stays inside one segment, `**` crosses segments, and a pattern without
/// `/` is also tried against the final path segment.
#[must_use]
pub fn matches(path: &str, pattern: &str) -> bool {
    let path = normalize_separators(path);
    let pattern = normalize_separators(pattern);
    let Some(matcher) = compile(&pattern) else {
        return false;
    };
    if matcher.is_match(&path) {
        return true;
    }
    if pattern.contains('/') {
        return false;
    }
    path.rsplit('/')
        .next()
        .is_some_and(|base| matcher.is_match(base))
}

#[must_use]
pub fn matches_any<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    find_first_match(path, patterns).is_some()
}

/// First pattern, in list order, that matches `path`.
#[must_use]
pub fn find_first_match<'a, S: AsRef<str>>(path: &str, patterns: &'a [S]) -> Option<&'a str> {
    patterns
        .iter()
        .map(|pattern| pattern.as_ref())
        .find(|pattern| matches(path, pattern))
}

#[must_use]
pub fn filter_by_globs<S: AsRef<str>>(files: &[String], patterns: &[S]) -> Vec<String> {
    files
        .iter()
        .filter(|file| matches_any(file, patterns))
        .cloned()
        .collect()
}

/// Comma-separated glob list; blanks are dropped.
#[must_use]
pub fn parse_glob_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|glob| !glob.is_empty())
        .map(str::to_string)
        .collect()
}
