//! Name-based sensor selection.
//!
//! A sensor is selected when its name contains the inclusion tag and none
//! of the exclusion keywords. All matching is case-insensitive substring
//! matching; exclusions are OR'd.

/// Inclusion tag plus exclusion keywords, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    tag: String,
    excluded: Vec<String>,
}

impl NameFilter {
    pub fn new(tag: &str, excluded: &[String]) -> Self {
        Self {
            tag: tag.to_lowercase(),
            excluded: excluded
                .iter()
                .filter(|k| !k.is_empty())
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Build the filter described by a [`MonitorConfig`](crate::config::MonitorConfig).
    pub fn from_config(config: &crate::config::MonitorConfig) -> Self {
        Self::new(&config.sensor_tag, &config.excluded_keywords)
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        name.contains(&self.tag) && !self.excluded.iter().any(|k| name.contains(k.as_str()))
    }
}
