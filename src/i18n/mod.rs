//! provmsgコマンド自身の表示メッセージ
//!
//! メッセージテーブル（`table`）とは別に、CLIのヘルプやチェック結果の表示に使う。
//! 言語は `config::lang_from_env` と同じ規則で決まり、ja 以外は en になる。

mod en_messages;
mod ja_messages;
mod messages;
mod ui_msg;

pub use en_messages::EN_UI_MSGS;
pub use ja_messages::JA_UI_MSGS;
pub use messages::{fmt_ui_msg, init, messages, ui_msg, Lang, Messages};
pub use ui_msg::UiMsg;
