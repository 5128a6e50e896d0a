// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directives every task file must declare, in reporting order.
pub const REQUIRED_DIRECTIVES: [&str; 13] = [
    "goal",
    "touch",
    "inputs",
    "outputs",
    "constraints",
    "tests",
    "risk",
    "rollback",
    "security",
    "performance",
    "dependencies",
    "observability",
    "breaking",
];

/// The only directive parsed as a boolean.
pub const ALLOW_HUMAN_EDITS: &str = "allowHumanEdits";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingDirective,
    ParseError,
    UndeclaredTouch,
    BlockedFile,
    UnownedFile,
    HumanOwnedViolation,
    ContractNoTest,
    MissingManifest,
}

impl ViolationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingDirective => "MISSING_DIRECTIVE",
            Self::ParseError => "PARSE_ERROR",
            Self::UndeclaredTouch => "UNDECLARED_TOUCH",
            Self::BlockedFile => "BLOCKED_FILE",
            Self::UnownedFile => "UNOWNED_FILE",
            Self::HumanOwnedViolation => "HUMAN_OWNED_VIOLATION",
            Self::ContractNoTest => "CONTRACT_NO_TEST",
            Self::MissingManifest => "MISSING_MANIFEST",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Violation {
    pub fn new(file: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    #[serde(rename = "vibe-checker")]
    Checker,
    #[serde(rename = "vibe-guard")]
    Guard,
}

impl CheckKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checker => "vibe-checker",
            Self::Guard => "vibe-guard",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub check_kind: CheckKind,
    pub base_ref: String,
    pub changed_files: Vec<String>,
    pub violations: Vec<Violation>,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipCategory {
    Ai,
    Human,
    Contract,
    Blocked,
    Exempt,
    Unowned,
}

impl OwnershipCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Human => "human",
            Self::Contract => "contract",
            Self::Blocked => "blocked",
            Self::Exempt => "exempt",
            Self::Unowned => "unowned",
        }
    }
}

impl fmt::Display for OwnershipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    Flag(bool),
    Text(String),
}

impl DirectiveValue {
    /// Present means a boolean, or text that is not blank.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Flag(_) => true,
            Self::Text(text) => !text.trim().is_empty(),
        }
    }
}

impl fmt::Display for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Directives parsed from one file. Later inserts overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectiveSet(BTreeMap<String, DirectiveValue>);

impl DirectiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DirectiveValue) {
        self.0.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DirectiveValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(DirectiveValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(DirectiveValue::Flag(flag)) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub fn allows_human_edits(&self) -> bool {
        self.flag(ALLOW_HUMAN_EDITS).unwrap_or(false)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectiveValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveValidation {
    pub valid: bool,
    pub missing: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMetadata {
    pub slug: String,
    pub date: String,
    pub timestamp: String,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub check: String,
    pub status: DiagnosticStatus,
    pub message: String,
}

impl Diagnostic {
    pub fn new(check: impl Into<String>, status: DiagnosticStatus, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            status,
            message: message.into(),
        }
    }
}
