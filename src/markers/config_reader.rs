use crate::markers::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(rename = "geometryFile")]
    pub geometry_file: String,
    #[serde(rename = "votesFile")]
    pub votes_file: String,
    #[serde(rename = "neighborsFile")]
    pub neighbors_file: String,
    /// The property of the vote records that holds the group. Defaults to `state`.
    #[serde(rename = "groupProperty")]
    pub group_property: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    /// The name of the property holding the votes of this candidate.
    pub name: String,
    /// A display name.
    pub label: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    #[serde(rename = "votesPerMarker")]
    _votes_per_marker: JSValue,
}

impl ConfigRules {
    pub fn votes_per_marker(&self) -> CliResult<u64> {
        read_js_int(&self._votes_per_marker)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub sources: SourceSettings,
    pub candidates: Vec<ConfigCandidate>,
    pub rules: ConfigRules,
}

pub fn read_config(path: &str) -> CliResult<MarkerConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: MarkerConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

// Numbers may be written as JSON numbers or as strings.
pub fn read_js_int(x: &JSValue) -> CliResult<u64> {
    match x {
        JSValue::Number(n) => n.as_u64().context(ParsingJsonNumberSnafu {
            content: n.to_string(),
        }),
        JSValue::String(s) => s.trim().parse::<u64>().ok().context(ParsingJsonNumberSnafu {
            content: s.clone(),
        }),
        _ => None.context(ParsingJsonNumberSnafu {
            content: x.to_string(),
        }),
    }
}
