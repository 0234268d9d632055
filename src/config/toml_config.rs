use crate::config::TrackerSettings;
use crate::utils::error::{Result, TrackerError};
use regex::Regex;
use std::path::Path;

impl TrackerSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，沒寫的欄位用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${ASU_TOKEN})，找不到的保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} is not set", var_name);
            format!("${{{}}}", var_name)
        })
    });

    Ok(result.to_string())
}
