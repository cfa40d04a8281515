//! ログ出力
//!
//! 標準エラー出力へテキストまたはJSON Lines形式で出力する。
//! レベルとフォーマットはプロセス全体で共有される。

use chrono::Local;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::LazyLock;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    #[serde(alias = "warning")]
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// ログフォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[serde(alias = "plain")]
    Text,
    Json,
}

/// ログ設定
struct LogConfig {
    level: LogLevel,
    format: LogFormat,
}

static LOG_CONFIG: LazyLock<RwLock<LogConfig>> = LazyLock::new(|| {
    RwLock::new(LogConfig {
        level: LogLevel::Info,
        format: LogFormat::Text,
    })
});

pub fn set_level(level: LogLevel) {
    LOG_CONFIG.write().level = level;
}

pub fn set_format(format: LogFormat) {
    LOG_CONFIG.write().format = format;
}

pub fn enabled(level: LogLevel) -> bool {
    level >= LOG_CONFIG.read().level
}

/// ログ出力
///
/// `context` は `key=value` として行末（JSONではトップレベルのキー）に付与される。
pub fn log(level: LogLevel, message: &str, context: &[(&str, String)]) {
    let format = {
        let config = LOG_CONFIG.read();
        // レベルフィルタ
        if level < config.level {
            return;
        }
        config.format
    };

    let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string();
    eprintln!("{}", render_line(format, &timestamp, level, message, context));
}

/// 1行分のログを組み立てる
fn render_line(
    format: LogFormat,
    timestamp: &str,
    level: LogLevel,
    message: &str,
    context: &[(&str, String)],
) -> String {
    match format {
        LogFormat::Text => {
            let mut line = format!("[{}] {} {}", timestamp, level.as_str(), message);
            if !context.is_empty() {
                line.push_str(" |");
                for (k, v) in context {
                    line.push_str(&format!(" {}={}", k, v));
                }
            }
            line
        }
        LogFormat::Json => {
            let mut obj = serde_json::Map::new();
            obj.insert("timestamp".to_string(), timestamp.into());
            obj.insert("level".to_string(), level.as_str().into());
            obj.insert("message".to_string(), message.into());
            for (k, v) in context {
                obj.insert((*k).to_string(), v.as_str().into());
            }
            serde_json::Value::Object(obj).to_string()
        }
    }
}

/// `log_info!("message", key = value, ...)`
#[macro_export]
macro_rules! log_at {
    ($level:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        if $crate::log::enabled($level) {
            $crate::log::log(
                $level,
                &$msg,
                &[$((stringify!($key), ($value).to_string())),*],
            )
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Error, $($arg)*) };
}
