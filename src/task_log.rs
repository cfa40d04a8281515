//! プロビジョニングタスクのログレコード
//!
//! ansible-playbook のJSON結果から、メッセージコード付きのタスクログを組み立てる。
//! コードは `codebase + イベントのオフセット`（codebase の既定値は 8200）。
//! 送信は行わない。

use crate::catalog::Catalog;
use crate::config::DEFAULT_CODEBASE;
use crate::error::{ProvError, Result};
use crate::log::LogLevel;
use crate::template::{json_text, Context};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone, Timelike};
use serde_json::Value;

/// タスクイベント（値はcodebaseからのオフセット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TaskEvent {
    Start = 1,
    Error = 2,
    End = 3,
    EmptyProvisioning = 4,
    Summary = 5,
    PlayStart = 6,
    PlayEnd = 7,
    TaskStart = 8,
    TaskEnd = 9,
    ItemFailed = 10,
    ItemSkipped = 11,
    ItemChanged = 12,
    ItemOk = 13,
    HostFailed = 14,
    HostSkipped = 15,
    HostChanged = 16,
    HostOk = 17,
}

impl TaskEvent {
    pub fn offset(self) -> u32 {
        self as u32
    }

    pub fn level(self) -> LogLevel {
        match self {
            TaskEvent::Error | TaskEvent::ItemFailed | TaskEvent::HostFailed => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// 1件のタスクログ
#[derive(Debug, Clone, PartialEq)]
pub struct TaskLog {
    pub task_id: String,
    pub prov_setting_name: String,
    pub event: TaskEvent,
    pub code: String,
    pub level: LogLevel,
    /// 秒精度
    pub timestamp: DateTime<FixedOffset>,
    pub context: Context,
}

impl TaskLog {
    /// ID管理サーバーのタスクログ形式
    ///
    /// `context` はJSON文字列として格納される。
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "taskId": self.task_id,
            "provSettingName": self.prov_setting_name,
            "code": self.code,
            "level": self.level.as_str(),
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
            "context": self.context.to_json().to_string(),
        })
    }

    /// メッセージテーブルで本文を生成
    pub fn render(&self, catalog: &Catalog, lang: &str) -> Result<String> {
        catalog.format(lang, &self.code, &self.context)
    }
}

/// 1つのクラス・プレイブックに対するタスクログの組み立て
#[derive(Debug, Clone)]
pub struct TaskLogger {
    codebase: u32,
    task_id: String,
    prov_setting_name: String,
    /// 全レコードに付与する（イベント側の同名キーより優先）
    base_context: Context,
}

impl TaskLogger {
    pub fn new(
        task_id: impl Into<String>,
        prov_setting_name: impl Into<String>,
        class_name: impl Into<String>,
        playbook: impl Into<String>,
    ) -> Self {
        Self {
            codebase: DEFAULT_CODEBASE,
            task_id: task_id.into(),
            prov_setting_name: prov_setting_name.into(),
            base_context: Context::new()
                .with("class_name", class_name)
                .with("playbook", playbook),
        }
    }

    pub fn with_codebase(mut self, codebase: u32) -> Self {
        self.codebase = codebase;
        self
    }

    pub fn code_for(&self, event: TaskEvent) -> String {
        (self.codebase + event.offset()).to_string()
    }

    /// レコードを1件作る
    pub fn record(
        &self,
        timestamp: DateTime<FixedOffset>,
        event: TaskEvent,
        context: Context,
    ) -> TaskLog {
        let mut context = context;
        context.extend(&self.base_context);
        TaskLog {
            task_id: self.task_id.clone(),
            prov_setting_name: self.prov_setting_name.clone(),
            event,
            code: self.code_for(event),
            level: event.level(),
            timestamp: truncate_to_seconds(timestamp),
            context,
        }
    }

    pub fn start(&self) -> TaskLog {
        self.record(now(), TaskEvent::Start, Context::new())
    }

    pub fn error(&self, message: impl Into<String>) -> TaskLog {
        self.record(now(), TaskEvent::Error, Context::new().with("message", message))
    }

    pub fn end(&self) -> TaskLog {
        self.record(now(), TaskEvent::End, Context::new())
    }

    pub fn empty_provisioning(&self) -> TaskLog {
        self.record(now(), TaskEvent::EmptyProvisioning, Context::new())
    }

    /// ansible-playbook のJSON結果からログを組み立てる
    ///
    /// プレイ開始 → (タスク開始 → ホスト/要素ごとの結果 → タスク終了)* → プレイ終了 を
    /// プレイごとに並べ、最後にサマリを1件追加する。
    pub fn from_result(&self, result: &Value) -> Result<Vec<TaskLog>> {
        let root = result
            .as_object()
            .ok_or_else(|| ProvError::task_result("結果がJSONオブジェクトではありません"))?;
        let mut logs = Vec::new();

        for play in array_field(result, "plays")? {
            let play_summary = play.get("play").unwrap_or(&Value::Null);
            let play_duration = play_summary.get("duration").unwrap_or(&Value::Null);
            let play_ctx = Context::new().with("play_name", name_of(play_summary));

            logs.push(self.record(
                timestamp_of(play_duration, "start")?,
                TaskEvent::PlayStart,
                play_ctx.clone(),
            ));

            for task in array_field(play, "tasks")? {
                let task_summary = task.get("task").unwrap_or(&Value::Null);
                let task_duration = task_summary.get("duration").unwrap_or(&Value::Null);
                let task_name = name_of(task_summary);
                let task_ctx = Context::new().with("task_name", task_name.clone());
                let task_end = timestamp_of(task_duration, "end")?;

                logs.push(self.record(
                    timestamp_of(task_duration, "start")?,
                    TaskEvent::TaskStart,
                    task_ctx.clone(),
                ));

                let hosts = match task.get("hosts") {
                    None | Some(Value::Null) => None,
                    Some(Value::Object(hosts)) => Some(hosts),
                    Some(_) => {
                        return Err(ProvError::task_result(format!(
                            "タスク {} の hosts がオブジェクトではありません",
                            task_name
                        )))
                    }
                };

                for (host_name, host) in hosts.into_iter().flatten() {
                    let host_ctx = task_ctx.clone().with("host_name", host_name.clone());
                    match host.get("results").and_then(Value::as_array) {
                        Some(results) if !results.is_empty() => {
                            for item_result in results {
                                let (event, message) = classify(item_result, ItemOrHost::Item);
                                let mut ctx = host_ctx.clone().with(
                                    "item",
                                    item_result.get("item").unwrap_or(&Value::Null).to_string(),
                                );
                                if let Some(message) = message {
                                    ctx.insert("message", message);
                                }
                                logs.push(self.record(task_end, event, ctx));
                            }
                        }
                        _ => {
                            let (event, message) = classify(host, ItemOrHost::Host);
                            let mut ctx = host_ctx;
                            if let Some(message) = message {
                                ctx.insert("message", message);
                            }
                            logs.push(self.record(task_end, event, ctx));
                        }
                    }
                }

                logs.push(self.record(task_end, TaskEvent::TaskEnd, task_ctx));
            }

            logs.push(self.record(
                timestamp_of(play_duration, "end")?,
                TaskEvent::PlayEnd,
                play_ctx,
            ));
        }

        let stats = root.get("stats").unwrap_or(&Value::Null).to_string();
        logs.push(self.record(now(), TaskEvent::Summary, Context::new().with("stats", stats)));

        Ok(logs)
    }
}

#[derive(Clone, Copy)]
enum ItemOrHost {
    Item,
    Host,
}

/// failed > skipped > changed > ok の順で判定
///
/// 失敗時は `": " + メッセージ`（メッセージが空なら空文字）を返す。
fn classify(result: &Value, kind: ItemOrHost) -> (TaskEvent, Option<String>) {
    use ItemOrHost::*;
    use TaskEvent::*;

    if truthy(result.get("failed")) {
        let message = result
            .get("failed_when_result")
            .or_else(|| result.get("msg"))
            .filter(|v| truthy(Some(*v)))
            .map(|v| format!(": {}", display_value(v)))
            .unwrap_or_default();
        let event = match kind {
            Item => ItemFailed,
            Host => HostFailed,
        };
        return (event, Some(message));
    }

    let event = match (kind, truthy(result.get("skipped")), truthy(result.get("changed"))) {
        (Item, true, _) => ItemSkipped,
        (Item, false, true) => ItemChanged,
        (Item, false, false) => ItemOk,
        (Host, true, _) => HostSkipped,
        (Host, false, true) => HostChanged,
        (Host, false, false) => HostOk,
    };
    (event, None)
}

/// 空・ゼロ・false・null を偽とする
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// メッセージ埋め込み用の表示
fn display_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => json_text(other),
    }
}

fn name_of(summary: &Value) -> String {
    json_text(summary.get("name").unwrap_or(&Value::Null))
}

fn array_field<'a>(value: &'a Value, key: &str) -> Result<&'a [Value]> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ProvError::task_result(format!("{} が配列ではありません", key))),
    }
}

/// タイムゾーンなしの時刻として受け付ける書式（ローカル時刻として扱う）
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// duration.start / duration.end を読む（なければ現在時刻）
fn timestamp_of(duration: &Value, key: &str) -> Result<DateTime<FixedOffset>> {
    let Some(text) = duration.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return Ok(now());
    };
    DateTime::parse_from_rfc3339(text)
        .ok()
        .or_else(|| parse_naive_local(text))
        .ok_or_else(|| {
            ProvError::task_result(format!("duration.{} の時刻が不正です: {}", key, text))
        })
}

fn parse_naive_local(text: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

fn truncate_to_seconds(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.with_nanosecond(0).unwrap_or(ts)
}
