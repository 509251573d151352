use ferrous_bridge_domain::config::RulesConfig;
use ferrous_bridge_domain::{
    ConfigError, Query, RecordData, RecordType, ResolutionResult, ResourceRecord,
};
use rustc_hash::FxHashMap;
use tracing::info;

#[derive(Debug, Clone)]
struct StaticRecord {
    record_type: RecordType,
    ttl: u32,
    data: RecordData,
}

#[derive(Debug, Clone, Default)]
struct RuleSet {
    blocked: bool,
    records: Vec<StaticRecord>,
}

/// Local answers consulted before any upstream dispatch.
///
/// Exact names win over wildcards; among wildcards the longest suffix wins.
#[derive(Debug, Default)]
pub struct RuleTable {
    exact: FxHashMap<String, RuleSet>,
    wildcard: FxHashMap<String, RuleSet>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the table from inline rules plus the optional rule file.
    pub fn from_config(config: &RulesConfig) -> Result<Self, ConfigError> {
        let merged = config.merged()?;
        merged.validate()?;

        let mut table = Self::default();

        for pattern in &merged.blocked {
            table.rule_set_mut(pattern).blocked = true;
        }

        for rule in &merged.records {
            let (record_type, data) = rule.to_record_data()?;
            table.rule_set_mut(&rule.domain).records.push(StaticRecord {
                record_type,
                ttl: rule.ttl,
                data,
            });
        }

        info!(
            exact = table.exact.len(),
            wildcard = table.wildcard.len(),
            "Static rules loaded"
        );

        Ok(table)
    }

    fn rule_set_mut(&mut self, pattern: &str) -> &mut RuleSet {
        let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
        match pattern.strip_prefix("*.") {
            Some(suffix) => self.wildcard.entry(suffix.to_string()).or_default(),
            None => self.exact.entry(pattern).or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcard.is_empty()
    }

    fn find(&self, name: &str) -> Option<&RuleSet> {
        if let Some(rules) = self.exact.get(name) {
            return Some(rules);
        }
        if self.wildcard.is_empty() {
            return None;
        }

        // Suffixes strictly below the root, longest first.
        name.match_indices('.')
            .map(|(i, _)| &name[i + 1..])
            .find_map(|suffix| self.wildcard.get(suffix))
    }

    /// Local answer for `query`, or `None` when no rule covers the name.
    pub fn lookup(&self, query: &Query) -> Option<ResolutionResult> {
        let rules = self.find(query.name())?;

        if rules.blocked {
            return Some(ResolutionResult::nx_domain(query.clone()));
        }

        let wanted = query.record_type();
        let mut answers: Vec<ResourceRecord> = rules
            .records
            .iter()
            .filter(|r| wanted == RecordType::ANY || r.record_type == wanted)
            .map(|r| to_record(query, r))
            .collect();

        if answers.is_empty() {
            answers = rules
                .records
                .iter()
                .filter(|r| r.record_type == RecordType::CNAME)
                .map(|r| to_record(query, r))
                .collect();
        }

        Some(ResolutionResult::answered(query.clone(), answers))
    }
}

fn to_record(query: &Query, rule: &StaticRecord) -> ResourceRecord {
    ResourceRecord::new(query.name(), rule.record_type, rule.ttl, rule.data.clone())
}
