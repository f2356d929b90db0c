//! rdfvec Configuration Management
//!
//! Handles configuration from config files, environment variables,
//! and command-line arguments with defaults matching the GO + HP run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ontology sources, processed in order
    pub sources: Vec<SourceConfig>,

    /// Output location
    pub output: OutputConfig,

    /// Walk and embedding hyperparameters
    pub training: TrainingConfig,

    /// Cross-source merge behavior
    pub merge: MergeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new("GO", "go-basic.owl", "GO_"),
                SourceConfig::new("HP", "hp.owl", "HP_"),
            ],
            output: OutputConfig::default(),
            training: TrainingConfig::default(),
            merge: MergeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Recognized keys: `GO_FILE`, `HP_FILE`, `OUT_DIR`, `VECTOR_SIZE`,
    /// `EPOCHS`, `WALK_DEPTH`, `WALK_COUNT`, `RDFVEC_SEED`, `LOG_LEVEL`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("GO_FILE") {
            self.source_or_insert("GO", "GO_").path = path.into();
        }
        if let Some(path) = lookup("HP_FILE") {
            self.source_or_insert("HP", "HP_").path = path.into();
        }
        if let Some(dir) = lookup("OUT_DIR") {
            self.output.dir = dir.into();
        }
        if let Some(value) = lookup("VECTOR_SIZE") {
            self.training.vector_size = parse_value("VECTOR_SIZE", value)?;
        }
        if let Some(value) = lookup("EPOCHS") {
            self.training.epochs = parse_value("EPOCHS", value)?;
        }
        if let Some(value) = lookup("WALK_DEPTH") {
            self.training.walk_depth = parse_value("WALK_DEPTH", value)?;
        }
        if let Some(value) = lookup("WALK_COUNT") {
            self.training.walk_count = parse_value("WALK_COUNT", value)?;
        }
        if let Some(value) = lookup("RDFVEC_SEED") {
            self.training.seed = Some(parse_value("RDFVEC_SEED", value)?);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Look up a source by label
    pub fn source(&self, label: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.label == label)
    }

    /// Mutable source by label, appended with defaults when absent
    pub fn source_or_insert(&mut self, label: &str, prefix: &str) -> &mut SourceConfig {
        let index = match self.sources.iter().position(|s| s.label == label) {
            Some(index) => index,
            None => {
                self.sources
                    .push(SourceConfig::new(label, PathBuf::new(), prefix));
                self.sources.len() - 1
            }
        };
        &mut self.sources[index]
    }

    /// Check values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::MissingRequired("sources".to_string()));
        }
        for source in &self.sources {
            if source.path.as_os_str().is_empty() {
                return Err(ConfigError::MissingRequired(format!(
                    "sources.{}.path",
                    source.label
                )));
            }
        }
        if self.output.file_name.is_empty() {
            return Err(ConfigError::MissingRequired("output.file_name".to_string()));
        }
        self.training.validate()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// One ontology file and the namespace filter applied to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short name used in log lines (e.g. "GO")
    pub label: String,

    /// RDF file path
    pub path: PathBuf,

    /// Substring an entity URI must contain (e.g. "GO_")
    pub prefix: String,
}

impl SourceConfig {
    pub fn new(
        label: impl Into<String>,
        path: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            prefix: prefix.into(),
        }
    }
}

/// Output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory, created if absent
    pub dir: PathBuf,

    /// File name inside `dir`
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("embeddings"),
            file_name: "rdf2vec.json".to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of the JSON document
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Walk and embedding hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Embedding dimensionality
    pub vector_size: usize,

    /// Passes over the walk corpus
    pub epochs: usize,

    /// Maximum hops per walk
    pub walk_depth: usize,

    /// Maximum distinct walks sampled per entity
    pub walk_count: usize,

    /// Skip-gram context window
    pub window: usize,

    /// Negative samples per positive pair
    pub negative: usize,

    /// Initial learning rate
    pub learning_rate: f32,

    /// Learning rate reached at the end of training
    pub min_learning_rate: f32,

    /// RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vector_size: 200,
            epochs: 100,
            walk_depth: 4,
            walk_count: 100,
            window: 5,
            negative: 5,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("training.vector_size", self.vector_size),
            ("training.epochs", self.epochs),
            ("training.walk_count", self.walk_count),
            ("training.window", self.window),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "training.learning_rate".to_string(),
                value: self.learning_rate.to_string(),
            });
        }
        Ok(())
    }
}

/// Cross-source merge behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub policy: ConflictPolicy,
}

/// What to do when an entity URI is produced by more than one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Later sources overwrite earlier ones
    #[default]
    LastWriteWins,
    /// Abort the run on the first duplicate
    Reject,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_write_wins" | "overwrite" => Ok(Self::LastWriteWins),
            "reject" => Ok(Self::Reject),
            _ => Err(ConfigError::InvalidValue {
                key: "merge.policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Append-only log file
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("output.log"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].label, "GO");
        assert_eq!(config.sources[1].prefix, "HP_");
        assert_eq!(config.training.vector_size, 200);
        assert_eq!(config.training.epochs, 100);
        assert_eq!(config.training.walk_depth, 4);
        assert_eq!(config.training.walk_count, 100);
        assert_eq!(config.logging.file, PathBuf::from("output.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GO_FILE", "/data/go.owl"),
            ("OUT_DIR", "/tmp/out"),
            ("VECTOR_SIZE", "16"),
            ("RDFVEC_SEED", "7"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.source("GO").unwrap().path, PathBuf::from("/data/go.owl"));
        assert_eq!(config.source("HP").unwrap().path, PathBuf::from("hp.owl"));
        assert_eq!(config.output.path(), PathBuf::from("/tmp/out/rdf2vec.json"));
        assert_eq!(config.training.vector_size, 16);
        assert_eq!(config.training.seed, Some(7));
    }

    #[test]
    fn test_invalid_override() {
        let result = AppConfig::default().with_overrides(|key| {
            (key == "EPOCHS").then(|| "many".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "EPOCHS"
        ));
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[sources]]
label = "DOID"
path = "doid.owl"
prefix = "DOID_"

[training]
vector_size = 32
epochs = 5

[merge]
policy = "reject"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].prefix, "DOID_");
        assert_eq!(config.training.vector_size, 32);
        assert_eq!(config.training.walk_depth, 4);
        assert_eq!(config.merge.policy, ConflictPolicy::Reject);
        assert_eq!(config.output.file_name, "rdf2vec.json");
    }

    #[test]
    fn test_validate_rejects_zero_vector_size() {
        let mut config = AppConfig::default();
        config.training.vector_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.sources.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_conflict_policy_parse() {
        assert_eq!(
            "last-write-wins".parse::<ConflictPolicy>().unwrap(),
            ConflictPolicy::LastWriteWins
        );
        assert_eq!("reject".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Reject);
        assert!("merge".parse::<ConflictPolicy>().is_err());
    }
}
