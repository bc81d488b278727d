use rowgraph_core::{Error, Result};

use serde::{Deserialize, Serialize};

/// Engine-wide behavior switches.
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```
/// # use rowgraph::Settings;
/// let settings = Settings::from_json(r#"{ "auto_mapping": "full" }"#).unwrap();
/// assert!(!settings.call_setters_on_nulls);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which unmapped columns are matched to properties by name.
    pub auto_mapping: AutoMapping,

    /// Write null column values through setters instead of skipping them.
    pub call_setters_on_nulls: bool,

    /// Ignore underscores when matching column names to properties.
    pub map_underscore_to_camel_case: bool,

    /// How long the session cache keeps query results.
    pub local_cache_scope: LocalCacheScope,

    /// Default for mappings that do not set `lazy`.
    pub lazy_loading_enabled: bool,

    /// Reject row bounds on statements with nested result maps.
    pub safe_row_bounds_enabled: bool,

    /// Process result sets after the first one.
    pub multiple_result_sets_enabled: bool,

    /// Return an instance, rather than null, for rows with no mapped values.
    pub return_instance_for_empty_row: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoMapping {
    /// Only explicitly mapped columns are read.
    None,

    /// Unmapped columns are matched for result maps without nested result
    /// maps.
    #[default]
    Partial,

    /// Unmapped columns are matched everywhere, including nested result
    /// maps.
    Full,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalCacheScope {
    /// Results stay cached until a write, commit, rollback or explicit clear.
    #[default]
    Session,

    /// The cache is cleared after every outermost query.
    Statement,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        serde_json::from_str(json).map_err(|err| {
            Error::from(anyhow::Error::from(err)).context(Error::configuration("invalid settings"))
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_mapping: AutoMapping::default(),
            call_setters_on_nulls: false,
            map_underscore_to_camel_case: false,
            local_cache_scope: LocalCacheScope::default(),
            lazy_loading_enabled: false,
            safe_row_bounds_enabled: false,
            multiple_result_sets_enabled: true,
            return_instance_for_empty_row: false,
        }
    }
}
