//! 設定ファイル（provmsg.toml）
//!
//! ```toml
//! [general]
//! message_table_dir = "messages.d"
//! lang = "ja"
//! fallback_lang = "ja"
//!
//! [log]
//! level = "info"
//! format = "text"
//!
//! [task]
//! codebase = 8200
//! ```
//!
//! 言語設定の優先順位:
//! 1. PROVMSG_LANG 環境変数
//! 2. 設定ファイルの general.lang
//! 3. LANG 環境変数（ja_JP.UTF-8 -> ja）
//! 4. デフォルト: ja

use crate::error::{ProvError, Result};
use crate::log::{self, LogFormat, LogLevel};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "provmsg.toml";
pub const LANG_ENV: &str = "PROVMSG_LANG";
pub const DEFAULT_LANG: &str = "ja";
pub const DEFAULT_FALLBACK_LANG: &str = "ja";
pub const DEFAULT_CODEBASE: u32 = 8200;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub task: TaskSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// 上書きメッセージファイルのディレクトリ（相対パスは設定ファイルの位置から）
    pub message_table_dir: Option<PathBuf>,
    pub lang: Option<String>,
    #[serde(default = "default_fallback_lang")]
    pub fallback_lang: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            message_table_dir: None,
            lang: None,
            fallback_lang: default_fallback_lang(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskSection {
    /// タスクイベントのオフセットに加算するコード
    #[serde(default = "default_codebase")]
    pub codebase: u32,
}

impl Default for TaskSection {
    fn default() -> Self {
        Self {
            codebase: default_codebase(),
        }
    }
}

fn default_fallback_lang() -> String {
    DEFAULT_FALLBACK_LANG.to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_codebase() -> u32 {
    DEFAULT_CODEBASE
}

impl Config {
    /// TOML文字列をパース（`path` は相対パス解決とエラーメッセージ用）
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| ProvError::config_parse(path, e))?;

        if let (Some(dir), Some(base)) = (&config.general.message_table_dir, path.parent()) {
            if dir.is_relative() {
                config.general.message_table_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// provmsg.tomlを読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ProvError::config_read(path, e))?;
        Self::parse(path, &content)
    }

    /// 明示されたパス、なければカレントディレクトリのprovmsg.tomlを読み込む
    ///
    /// どちらもなければデフォルト設定。
    pub fn find_and_load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let current = std::env::current_dir()
            .map_err(|e| ProvError::from(format!("カレントディレクトリの取得に失敗: {}", e)))?;
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// 使用する言語タグ
    pub fn lang(&self) -> String {
        lang_from_env(self.general.lang.as_deref())
    }

    /// ログ設定を反映
    pub fn apply_logging(&self) {
        log::set_level(self.log.level);
        log::set_format(self.log.format);
    }
}

/// 環境変数と設定値から言語タグを決める
pub fn lang_from_env(configured: Option<&str>) -> String {
    resolve_lang(
        std::env::var(LANG_ENV).ok().as_deref(),
        configured,
        std::env::var("LANG").ok().as_deref(),
    )
}

/// PROVMSG_LANG > 設定値 > LANG > デフォルト
fn resolve_lang(explicit: Option<&str>, configured: Option<&str>, system: Option<&str>) -> String {
    if let Some(lang) = explicit.filter(|s| !s.is_empty()) {
        return lang.to_string();
    }
    if let Some(lang) = configured.filter(|s| !s.is_empty()) {
        return lang.to_string();
    }
    // LANGから言語コードを取得（ja_JP.UTF-8 -> ja）
    if let Some(lang) = system {
        let code = lang.split(['_', '.']).next().unwrap_or("");
        if !code.is_empty() && code != "C" && code != "POSIX" {
            return code.to_string();
        }
    }
    DEFAULT_LANG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_resolve_lang_priority() {
        assert_eq!(resolve_lang(Some("en"), Some("ja"), Some("fr_FR.UTF-8")), "en");
        assert_eq!(resolve_lang(None, Some("en"), Some("fr_FR.UTF-8")), "en");
        assert_eq!(resolve_lang(None, None, Some("ja_JP.UTF-8")), "ja");
        assert_eq!(resolve_lang(None, None, Some("en.UTF-8")), "en");
        assert_eq!(resolve_lang(None, None, Some("C")), "ja");
        assert_eq!(resolve_lang(Some(""), None, None), "ja");
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            Path::new("/etc/provmsg/provmsg.toml"),
            r#"
[general]
message_table_dir = "messages.d"
lang = "en"
fallback_lang = "ja"

[log]
level = "debug"
format = "json"

[task]
codebase = 8300
"#,
        )
        .unwrap();

        assert_eq!(
            config.general.message_table_dir,
            Some(PathBuf::from("/etc/provmsg/messages.d"))
        );
        assert_eq!(config.general.lang.as_deref(), Some("en"));
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.task.codebase, 8300);
    }

    #[test]
    fn test_parse_defaults() {
        let config = Config::parse(Path::new("provmsg.toml"), "").unwrap();
        assert!(config.general.message_table_dir.is_none());
        assert_eq!(config.general.fallback_lang, "ja");
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.task.codebase, 8200);
    }

    #[test]
    fn test_absolute_dir_kept() {
        let config = Config::parse(
            Path::new("/etc/provmsg/provmsg.toml"),
            "[general]\nmessage_table_dir = \"/var/lib/messages\"\n",
        )
        .unwrap();
        assert_eq!(
            config.general.message_table_dir,
            Some(PathBuf::from("/var/lib/messages"))
        );
    }

    #[test]
    fn test_parse_error() {
        let err =
            Config::parse(Path::new("provmsg.toml"), "[log]\nlevel = \"loud\"\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0402);

        let err = Config::parse(Path::new("provmsg.toml"), "[unknown]\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0402);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/provmsg.toml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0401);
    }
}
