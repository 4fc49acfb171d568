use crate::adapters::RegistrantSource;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TeamError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub tournament: TournamentConfig,
    pub source: RegistrantSource,
    #[serde(default)]
    pub assigned: AssignedConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub description: Option<String>,
}

/// Golfers already on persisted teams.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignedConfig {
    pub path: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TeamError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TeamError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| TeamError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("tournament.name", &self.tournament.name)?;
        validation::validate_source(&self.source)?;

        if let Some(path) = &self.assigned.path {
            validation::validate_path("assigned.path", path)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            let filename =
                validation::validate_required_field("load.compression.filename", &compression.filename)?;
            if !filename.ends_with(".zip") {
                return Err(TeamError::InvalidConfigValueError {
                    field: "load.compression.filename".to_string(),
                    value: filename.clone(),
                    reason: "Archive name must end with .zip".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn verbose_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .map(|level| matches!(level, "debug" | "trace"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn tournament_name(&self) -> &str {
        &self.tournament.name
    }

    fn source(&self) -> Result<RegistrantSource> {
        Ok(self.source.clone())
    }

    fn assigned_file(&self) -> Option<&str> {
        self.assigned.path.as_deref()
    }

    fn assigned_ids(&self) -> &[String] {
        &self.assigned.ids
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn zip_output(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .and_then(|c| c.filename.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
