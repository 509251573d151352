use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::errors::ConfigError;
use crate::dns_record::{RecordData, RecordType};
use crate::validation::validate_domain_name;

/// Static rule table consulted before any upstream dispatch.
///
/// Domains are exact names or `*.suffix` wildcards that match any name
/// strictly below `suffix`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Optional TOML file with the same `blocked` / `records` layout, merged
    /// after the inline entries.
    #[serde(default)]
    pub file: Option<String>,

    /// Domains answered with NXDOMAIN for every type.
    #[serde(default)]
    pub blocked: Vec<String>,

    #[serde(default)]
    pub records: Vec<StaticRecordRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticRecordRule {
    pub domain: String,

    /// A, AAAA, CNAME, TXT or MX
    #[serde(rename = "type")]
    pub record_type: String,

    /// Address, target name, text, or `"<preference> <exchange>"` for MX.
    pub value: String,

    #[serde(default = "default_rule_ttl")]
    pub ttl: u32,
}

impl StaticRecordRule {
    pub fn to_record_data(&self) -> Result<(RecordType, RecordData), ConfigError> {
        let invalid = |what: &str| {
            ConfigError::Validation(format!(
                "Rule for '{}': invalid {} value '{}'",
                self.domain, what, self.value
            ))
        };

        let record_type: RecordType = self
            .record_type
            .parse()
            .map_err(ConfigError::Validation)?;

        let data = match record_type {
            RecordType::A => RecordData::A(
                self.value
                    .parse::<Ipv4Addr>()
                    .map_err(|_| invalid("A"))?,
            ),
            RecordType::AAAA => RecordData::AAAA(
                self.value
                    .parse::<Ipv6Addr>()
                    .map_err(|_| invalid("AAAA"))?,
            ),
            RecordType::CNAME => {
                validate_domain_name(&self.value).map_err(|_| invalid("CNAME"))?;
                RecordData::CNAME(trim_dot(&self.value))
            }
            RecordType::TXT => {
                let parts = self
                    .value
                    .as_bytes()
                    .chunks(255)
                    .map(|c| String::from_utf8_lossy(c).into_owned())
                    .collect();
                RecordData::TXT(parts)
            }
            RecordType::MX => {
                let (pref, exchange) = self
                    .value
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| invalid("MX"))?;
                let preference = pref.parse::<u16>().map_err(|_| invalid("MX"))?;
                let exchange = exchange.trim();
                validate_domain_name(exchange).map_err(|_| invalid("MX"))?;
                RecordData::MX {
                    preference,
                    exchange: trim_dot(exchange),
                }
            }
            other => {
                return Err(ConfigError::Validation(format!(
                    "Rule for '{}': record type {} is not supported in static rules",
                    self.domain, other
                )))
            }
        };

        Ok((record_type, data))
    }
}

impl RulesConfig {
    /// Inline rules plus the contents of `file`, if set.
    pub fn merged(&self) -> Result<RulesConfig, ConfigError> {
        let mut merged = RulesConfig {
            file: None,
            blocked: self.blocked.clone(),
            records: self.records.clone(),
        };

        if let Some(path) = &self.file {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;
            let from_file: RulesConfig =
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
            merged.blocked.extend(from_file.blocked);
            merged.records.extend(from_file.records);
        }

        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.blocked {
            validate_pattern(pattern)?;
        }
        for rule in &self.records {
            validate_pattern(&rule.domain)?;
            rule.to_record_data()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.blocked.is_empty() && self.records.is_empty()
    }
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    let name = pattern.strip_prefix("*.").unwrap_or(pattern);
    if name.is_empty() || name == "." {
        return Err(ConfigError::Validation(format!(
            "Invalid rule domain '{}'",
            pattern
        )));
    }
    validate_domain_name(name)
        .map_err(|_| ConfigError::Validation(format!("Invalid rule domain '{}'", pattern)))
}

fn trim_dot(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

fn default_rule_ttl() -> u32 {
    300
}
