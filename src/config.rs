use core_mechanics::config::RuleConfig;

/// Settings shared by every game this host creates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    pub rules: RuleConfig,
    /// Seed for new deals. Each game draws a random one when unset.
    pub seed: Option<u64>,
}

impl HostConfig {
    pub fn new(rules: RuleConfig, seed: Option<u64>) -> Self {
        Self { rules, seed }
    }
}
