use std::collections::BTreeMap;

use serde::Deserialize;

use crate::collection::NameMap;
use crate::error::{MatchError, Result};

/// What to do when an input-only constraint still carries more than one
/// candidate value at construction time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Refuse construction. An input-only attribute is supposed to
    /// collapse to exactly one value.
    #[default]
    Strict,
    /// Take the smallest value as the deterministic tie-break.
    SmallestValue,
}

/// Engine configuration: the input/output attribute name mapping and the
/// input-only ambiguity policy.
#[derive(Clone, Debug, Default)]
pub struct MatchConfig {
    pub name_map: NameMap,
    pub ambiguity: AmbiguityPolicy,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }
    /// Declares that the input attribute `input_key` and the output
    /// attribute `output_key` are the same dimension under two names.
    pub fn with_mapping<I, O>(mut self, input_key: I, output_key: O) -> Self
    where
        I: Into<String>,
        O: Into<String>,
    {
        self.name_map.insert(input_key.into(), output_key.into());
        self
    }
    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Parses a configuration from TOML, e.g.
    ///
    /// ```toml
    /// ambiguity = "smallest_value"
    ///
    /// [mapping]
    /// model = "obs_model"
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawConfig {
            #[serde(default)]
            mapping: BTreeMap<String, String>,
            #[serde(default)]
            ambiguity: AmbiguityPolicy,
        }
        let raw: RawConfig =
            toml::from_str(raw).map_err(|e| MatchError::Config(e.to_string()))?;
        let mut config = MatchConfig::new().with_ambiguity(raw.ambiguity);
        for (input_key, output_key) in raw.mapping {
            config.name_map.insert(input_key, output_key);
        }
        Ok(config)
    }
}
