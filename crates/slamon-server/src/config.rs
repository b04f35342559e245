use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub assessment: AssessmentSection,
    #[serde(default)]
    pub repository: RepositorySection,
    #[serde(default)]
    pub adapter: AdapterSection,
    #[serde(default)]
    pub notifier: NotifierSection,
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSection {
    /// Tick interval of the assessment driver.
    #[serde(default = "default_check_period")]
    pub check_period: Period,
    /// Minimum gap between successive violations of one guarantee.
    #[serde(default = "default_transient_time")]
    pub transient_time: Period,
}

impl Default for AssessmentSection {
    fn default() -> Self {
        Self {
            check_period: default_check_period(),
            transient_time: default_transient_time(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySection {
    #[serde(rename = "type", default = "default_repository_type")]
    pub kind: String,
    /// Optional JSON file with agreements loaded into the repository at
    /// startup.
    #[serde(default)]
    pub agreements_file: Option<String>,
}

impl Default for RepositorySection {
    fn default() -> Self {
        Self {
            kind: default_repository_type(),
            agreements_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdapterSection {
    #[serde(rename = "type", default = "default_adapter_type")]
    pub kind: String,
    /// Samples per variable produced by the dummy backend.
    #[serde(default = "default_dummy_size")]
    pub size: usize,
    /// Per-variable processing step: `identity` or `aggregate`.
    #[serde(default = "default_processing")]
    pub processing: String,
}

impl Default for AdapterSection {
    fn default() -> Self {
        Self {
            kind: default_adapter_type(),
            size: default_dummy_size(),
            processing: default_processing(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSection {
    /// `log`, `webhook`, or `none` to disable notification entirely.
    #[serde(rename = "type", default = "default_notifier_type")]
    pub kind: String,
    /// Backend-specific settings handed to the notifier plugin.
    #[serde(flatten)]
    pub settings: serde_json::Value,
}

impl Default for NotifierSection {
    fn default() -> Self {
        Self {
            kind: default_notifier_type(),
            settings: serde_json::json!({}),
        }
    }
}

fn default_check_period() -> Period {
    Period(Duration::from_secs(60))
}

fn default_transient_time() -> Period {
    Period(Duration::ZERO)
}

fn default_repository_type() -> String {
    "memory".to_string()
}

fn default_adapter_type() -> String {
    "dummy".to_string()
}

fn default_dummy_size() -> usize {
    3
}

fn default_processing() -> String {
    "identity".to_string()
}

fn default_notifier_type() -> String {
    "log".to_string()
}

/// A duration knob that accepts either a bare number (seconds, fractional
/// allowed) or a suffixed string: `"500ms"`, `"60s"`, `"5m"`, `"1h"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period(pub Duration);

impl Period {
    pub fn as_std(&self) -> Duration {
        self.0
    }

    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.0).unwrap_or(chrono::Duration::MAX)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) if secs >= 0.0 => Ok(Period(Duration::from_secs_f64(secs))),
            Raw::Seconds(secs) => Err(serde::de::Error::custom(format!(
                "duration must not be negative: {secs}"
            ))),
            Raw::Text(text) => parse_period(&text)
                .map(Period)
                .map_err(serde::de::Error::custom),
        }
    }
}

fn parse_period(raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    let boundary = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(boundary);
    let number: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{raw}'"))?;
    if number < 0.0 {
        return Err(format!("duration must not be negative: '{raw}'"));
    }

    let secs = match unit {
        "" | "s" => number,
        "ms" => number / 1000.0,
        "m" => number * 60.0,
        "h" => number * 3600.0,
        other => return Err(format!("unknown duration unit '{other}' in '{raw}'")),
    };
    Ok(Duration::from_secs_f64(secs))
}
