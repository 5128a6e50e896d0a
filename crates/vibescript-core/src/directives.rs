// SPDX-License-Identifier: Apache-2.0
//! `@vibe:` directive extraction and validation.
//!
//! A directive is a line comment of the form `<prefix> @vibe:<key> <value>`
//! where the prefix comes from the file's language. Scanning is line-oriented;
//! values never span lines.

use regex::Regex;
use vibescript_model::{
    DirectiveSet, DirectiveValidation, DirectiveValue, ALLOW_HUMAN_EDITS, REQUIRED_DIRECTIVES,
};

use crate::language::comment_prefix_for;

const RISK_LEVELS: [&str; 3] = ["low", "medium", "high"];

fn directive_regex(prefix: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?m){}[ \t]*@vibe:(\w+)[ \t]+(.+?)[ \t\r]*$",
        regex::escape(prefix)
    ))
}

/// Parse every directive in `content`. Later duplicates overwrite earlier ones.
#[must_use]
pub fn parse_directives(content: &str, language_hint: Option<&str>) -> DirectiveSet {
    let prefix = comment_prefix_for(language_hint);
    let mut directives = DirectiveSet::new();
    let re = match directive_regex(prefix) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(prefix, "directive pattern rejected: {err}");
            return directives;
        }
    };

    for caps in re.captures_iter(content) {
        let key = &caps[1];
        let value = caps[2].trim();
        if key == ALLOW_HUMAN_EDITS {
            directives.insert(key, DirectiveValue::Flag(parse_flag(value)));
        } else {
            directives.insert(key, DirectiveValue::Text(value.to_string()));
        }
    }
    directives
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1" || value.eq_ignore_ascii_case("yes")
}

/// Required keys that are absent or blank, in required order.
#[must_use]
pub fn missing_directives(directives: &DirectiveSet) -> Vec<String> {
    REQUIRED_DIRECTIVES
        .iter()
        .filter(|key| !directives.get(key).is_some_and(DirectiveValue::is_present))
        .map(|key| (*key).to_string())
        .collect()
}

#[must_use]
pub fn validate_directives(directives: &DirectiveSet) -> DirectiveValidation {
    let missing = missing_directives(directives);
    let mut errors = Vec::new();

    if !missing.is_empty() {
        errors.push(format!("Missing required directives: {}", missing.join(", ")));
    }

    if let Some(risk) = directives.text("risk") {
        let level = risk.trim();
        if !level.is_empty() && !RISK_LEVELS.contains(&level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid risk level: {risk}. Must be low, medium, or high."
            ));
        }
    }

    if directives
        .text("touch")
        .is_some_and(|touch| touch.trim().is_empty())
    {
        errors.push("Touch directive cannot be empty".to_string());
    }

    DirectiveValidation {
        valid: errors.is_empty(),
        missing,
        errors,
    }
}

/// Comma-separated `touch` globs, trimmed, in declaration order.
#[must_use]
pub fn touch_globs(directives: &DirectiveSet) -> Vec<String> {
    directives
        .text("touch")
        .map(crate::glob::parse_glob_list)
        .unwrap_or_default()
}

#[must_use]
pub fn render_directive(prefix: &str, key: &str, value: &str) -> String {
    format!("{prefix} @vibe:{key} {value}")
}
