use vibescript_model::OwnershipCategory;
use vibescript_policies::OwnershipConfig;

use crate::glob::matches_any;

/// Category of `file`; the first matching rule wins in the order
/// exempt, blocked, ai, human, contract.
#[must_use]
pub fn classify(file: &str, config: &OwnershipConfig) -> OwnershipCategory {
    let rules: [(&[String], OwnershipCategory); 5] = [
        (config.guard_exempt.as_slice(), OwnershipCategory::Exempt),
        (config.blocked.as_slice(), OwnershipCategory::Blocked),
        (config.ai_owned.as_slice(), OwnershipCategory::Ai),
        (config.human_owned.as_slice(), OwnershipCategory::Human),
        (config.contract_owned.as_slice(), OwnershipCategory::Contract),
    ];
    rules
        .into_iter()
        .find(|rule| matches_any(file, rule.0))
        .map_or(OwnershipCategory::Unowned, |(_, category)| category)
}
