//! プロビジョニングメッセージテーブル
//!
//! 言語タグ → {code, format, template} の並び、およびformatをキーとする
//! パターンテーブルを保持する。テーブルはプロセス起動時に一度だけ構築され、
//! 以後変更されない。
//!
//! プロジェクト固有のメッセージコードは 8000～8999 の範囲を使う。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 1件のメッセージ定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub code: String,
    /// パターンテーブルの`format`を参照する
    pub format: String,
    pub template: String,
}

impl MessageRecord {
    pub fn new(
        code: impl Into<String>,
        format: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            format: format.into(),
            template: template.into(),
        }
    }
}

/// 1件のパターン定義（`message`プレースホルダーを含む）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub format: String,
    pub template: String,
}

impl PatternRecord {
    pub fn new(format: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            template: template.into(),
        }
    }
}

/// 1言語分のメッセージ（定義順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTable {
    #[serde(rename = "messageTable", default)]
    pub message_table: Vec<MessageRecord>,
}

/// メッセージテーブル全体
///
/// シリアライズ形式は `{"messageTable": {...}, "messagePattern": [...]}`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTable {
    #[serde(rename = "messageTable", default)]
    message_table: BTreeMap<String, LanguageTable>,
    #[serde(rename = "messagePattern", default)]
    message_pattern: Vec<PatternRecord>,
}

impl MessageTable {
    pub fn new(
        message_table: BTreeMap<String, LanguageTable>,
        message_pattern: Vec<PatternRecord>,
    ) -> Self {
        Self {
            message_table,
            message_pattern,
        }
    }

    /// 言語タグ → メッセージ一覧
    pub fn message_table(&self) -> &BTreeMap<String, LanguageTable> {
        &self.message_table
    }

    /// パターン一覧
    pub fn message_pattern(&self) -> &[PatternRecord] {
        &self.message_pattern
    }

    /// コードでメッセージを検索
    ///
    /// 同じコードが複数ある場合は後勝ち。言語タグは完全一致で比較する。
    pub fn lookup(&self, lang: &str, code: &str) -> Option<&MessageRecord> {
        self.records(lang).iter().rev().find(|r| r.code == code)
    }

    /// formatでパターンを検索（後勝ち）
    pub fn pattern(&self, format: &str) -> Option<&PatternRecord> {
        self.message_pattern.iter().rev().find(|p| p.format == format)
    }

    /// 登録されている言語タグ（ソート済み）
    pub fn languages(&self) -> Vec<&str> {
        self.message_table.keys().map(String::as_str).collect()
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.message_table.contains_key(lang)
    }

    /// 1言語分のメッセージを定義順で返す（未知の言語は空）
    pub fn records(&self, lang: &str) -> &[MessageRecord] {
        self.message_table
            .get(lang)
            .map(|t| t.message_table.as_slice())
            .unwrap_or(&[])
    }

    /// 全言語のコード（ソート・重複除去済み）
    pub fn all_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .message_table
            .values()
            .flat_map(|t| t.message_table.iter().map(|r| r.code.as_str()))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    pub(crate) fn language_mut(&mut self, lang: &str) -> &mut LanguageTable {
        self.message_table.entry(lang.to_string()).or_default()
    }

    pub(crate) fn patterns_mut(&mut self) -> &mut Vec<PatternRecord> {
        &mut self.message_pattern
    }
}

/// テナントプロビジョニング用メッセージ（ja）
///
/// (code, format, template)
const TENANT_PROVISIONING_JA: &[(&str, &str, &str)] = &[
    ("8200", "8200", "<%= message %>"),
    (
        "8201",
        "8200",
        "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行を開始しました。",
    ),
    (
        "8202",
        "8200",
        "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行がエラーになりました。： <%= message %>",
    ),
    (
        "8203",
        "8200",
        "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行を終了しました。",
    ),
    (
        "8204",
        "8200",
        "クラス '<%= class_name %>' には対象となるデータがありませんでしたので、タスクを実行しませんでした。",
    ),
    ("8205", "8200", "プレイブック '<%= playbook %>'のサマリ： <%= stats %>"),
    ("8206", "8200", "プレイ <%= play_name %> の実行を開始しました。"),
    ("8207", "8200", "プレイ <%= play_name %> の実行を終了しました。"),
    ("8208", "8200", "タスク <%= task_name %> の実行を開始しました。"),
    ("8209", "8200", "タスク <%= task_name %> の実行を終了しました。"),
    (
        "8210",
        "8200",
        "要素 <%= item %> について対象 '<%= host_name %>' に繰り返しタスク <%= task_name %> を実行しましたが失敗しました<%= message %>",
    ),
    (
        "8211",
        "8200",
        "要素 <%= item %> について対象 '<%= host_name %>' への繰り返しタスク <%= task_name %> をスキップしました",
    ),
    (
        "8212",
        "8200",
        "要素 <%= item %> について対象 '<%= host_name %>' への繰り返しタスク <%= task_name %> を実行しました",
    ),
    (
        "8213",
        "8200",
        "要素 <%= item %> について対象 '<%= host_name %>' への繰り返しタスク <%= task_name %> は処理済みでした",
    ),
    (
        "8214",
        "8200",
        "対象 '<%= host_name %>' にタスク <%= task_name %> を実行しましたが失敗しました<%= message %>",
    ),
    ("8215", "8200", "対象 '<%= host_name %>' にタスク <%= task_name %> をスキップしました"),
    ("8216", "8200", "対象 '<%= host_name %>' にタスク <%= task_name %> を実行しました"),
    ("8217", "8200", "対象 '<%= host_name %>' にタスク <%= task_name %> は処理済みでした"),
];

/// (format, template)
const TENANT_PROVISIONING_PATTERNS: &[(&str, &str)] = &[("8200", "<%= message %>")];

static BUILTIN: LazyLock<MessageTable> = LazyLock::new(|| {
    let ja = LanguageTable {
        message_table: TENANT_PROVISIONING_JA
            .iter()
            .map(|&(code, format, template)| MessageRecord::new(code, format, template))
            .collect(),
    };

    let mut message_table = BTreeMap::new();
    message_table.insert("ja".to_string(), ja);
    // en は枠のみ
    message_table.insert("en".to_string(), LanguageTable::default());

    let message_pattern = TENANT_PROVISIONING_PATTERNS
        .iter()
        .map(|&(format, template)| PatternRecord::new(format, template))
        .collect();

    MessageTable::new(message_table, message_pattern)
});

/// 組み込みメッセージテーブル
pub fn builtin() -> &'static MessageTable {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_literal() {
        let record = builtin().lookup("ja", "8201").unwrap();
        assert_eq!(record.format, "8200");
        assert_eq!(
            record.template,
            "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行を開始しました。"
        );
    }

    #[test]
    fn test_builtin_shape() {
        let table = builtin();
        assert_eq!(table.languages(), vec!["en", "ja"]);
        assert_eq!(table.records("ja").len(), 18);
        assert!(table.records("en").is_empty());
        assert_eq!(table.message_pattern().len(), 1);
        assert_eq!(table.pattern("8200").unwrap().template, "<%= message %>");
    }

    #[test]
    fn test_records_keep_order() {
        let codes: Vec<&str> = builtin().records("ja").iter().map(|r| r.code.as_str()).collect();
        let expected: Vec<String> = (8200..=8217).map(|c| c.to_string()).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_lang_tag_exact_match() {
        assert!(builtin().lookup("ja-JP", "8201").is_none());
        assert!(builtin().lookup("en", "8201").is_none());
        assert!(builtin().records("fr").is_empty());
    }

    #[test]
    fn test_lookup_last_wins() {
        let mut table = MessageTable::default();
        let ja = table.language_mut("ja");
        ja.message_table.push(MessageRecord::new("8300", "8200", "first"));
        ja.message_table.push(MessageRecord::new("8300", "8200", "second"));
        assert_eq!(table.lookup("ja", "8300").unwrap().template, "second");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(builtin()).unwrap();
        assert_eq!(json["messageTable"]["ja"]["messageTable"][0]["code"], "8200");
        assert_eq!(json["messagePattern"][0]["format"], "8200");

        // "en": {} のように messageTable を持たない言語も読める
        let parsed: MessageTable = serde_json::from_str(
            r#"{"messageTable": {"en": {}}, "messagePattern": []}"#,
        )
        .unwrap();
        assert!(parsed.has_language("en"));
        assert!(parsed.records("en").is_empty());
    }

    #[test]
    fn test_all_codes() {
        let codes = builtin().all_codes();
        assert_eq!(codes.first(), Some(&"8200"));
        assert_eq!(codes.last(), Some(&"8217"));
    }
}
