use serde::{Deserialize, Serialize};

/// Repository-relative folder that holds governance state.
pub const GOVERNANCE_DIR: &str = ".vibe";

/// Ownership rules read from `.vibe/ownership.json`.
///
/// On disk the lists carry a `_globs` suffix; the short names are accepted as
/// aliases. Unknown keys are ignored so that newer documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipConfig {
    #[serde(rename = "ai_owned_globs", alias = "ai_owned")]
    pub ai_owned: Vec<String>,
    #[serde(rename = "human_owned_globs", alias = "human_owned")]
    pub human_owned: Vec<String>,
    #[serde(rename = "contract_owned_globs", alias = "contract_owned")]
    pub contract_owned: Vec<String>,
    #[serde(rename = "blocked_globs", alias = "blocked")]
    pub blocked: Vec<String>,
    #[serde(rename = "require_manifest_for_globs", alias = "manifest_required")]
    pub manifest_required: Vec<String>,
    #[serde(default)]
    pub require_touch_enforcement: Option<bool>,
    #[serde(rename = "guard_exempt_globs", alias = "guard_exempt", default)]
    pub guard_exempt: Vec<String>,
    #[serde(rename = "touch_exempt_globs", alias = "touch_exempt", default)]
    pub touch_exempt: Vec<String>,
}

impl OwnershipConfig {
    #[must_use]
    pub fn touch_policy(&self) -> TouchPolicy {
        TouchPolicy {
            touch_exempt: self.touch_exempt.clone(),
            require_touch_enforcement: self.require_touch_enforcement,
        }
    }

    /// Every glob list with the key it was read from.
    #[must_use]
    pub fn glob_lists(&self) -> [(&'static str, &[String]); 7] {
        [
            ("ai_owned_globs", self.ai_owned.as_slice()),
            ("human_owned_globs", self.human_owned.as_slice()),
            ("contract_owned_globs", self.contract_owned.as_slice()),
            ("blocked_globs", self.blocked.as_slice()),
            ("require_manifest_for_globs", self.manifest_required.as_slice()),
            ("guard_exempt_globs", self.guard_exempt.as_slice()),
            ("touch_exempt_globs", self.touch_exempt.as_slice()),
        ]
    }
}

/// The subset of the ownership document the touch checker reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchPolicy {
    #[serde(rename = "touch_exempt_globs", alias = "touch_exempt", default)]
    pub touch_exempt: Vec<String>,
    #[serde(default)]
    pub require_touch_enforcement: Option<bool>,
}

impl TouchPolicy {
    /// Enforcement is on unless the document says `false`.
    #[must_use]
    pub fn enforcement_enabled(&self) -> bool {
        self.require_touch_enforcement != Some(false)
    }
}
