//! プロビジョニングタスク用メッセージテーブル
//!
//! - `table`: 組み込みメッセージテーブル（言語 → {code, format, template}、パターン）
//! - `overlay`: プロジェクト固有のメッセージファイルによる上書き
//! - `template`: `<%= name %>` の展開
//! - `catalog`: 言語フォールバック付きの検索と整形
//! - `integrity`: テーブルの整合性チェック
//! - `task_log`: ansible-playbook の結果からタスクログを組み立てる

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod integrity;
pub mod log;
pub mod overlay;
pub mod table;
pub mod task_log;
pub mod template;

pub use catalog::Catalog;
pub use error::{ErrorCode, ProvError, Result};
pub use table::{LanguageTable, MessageRecord, MessageTable, PatternRecord};
pub use template::Context;
