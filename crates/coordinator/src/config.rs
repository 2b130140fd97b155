//! Coordinator configuration.

use relief_reasoning::ReasoningConfig;
use relief_store::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Reasoning collaborator configuration
    #[serde(default)]
    pub reasoning: ReasoningConfig,

    /// Record store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Residents whose eligibility is checked each batch
    #[serde(default = "default_residents")]
    pub residents: Vec<String>,

    /// Questions answered at the end of each batch; overridable on the
    /// command line
    #[serde(default = "default_questions")]
    pub questions: Vec<String>,
}

fn default_residents() -> Vec<String> {
    vec![
        "John Doe".into(),
        "Jane Smith".into(),
        "Ryan Sessions".into(),
    ]
}

fn default_questions() -> Vec<String> {
    vec!["What areas are most affected according to the reports?".into()]
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            reasoning: ReasoningConfig::default(),
            store: StoreConfig::default(),
            residents: default_residents(),
            questions: default_questions(),
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        if config.reasoning.api_key.is_some() {
            warn!(
                "API key found in config file '{}'. For better security, \
                 use the GEMINI_API_KEY environment variable instead.",
                path.display()
            );
        }

        Ok(config)
    }
}
