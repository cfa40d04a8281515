//! メッセージカタログ
//!
//! 読み込み済みの `MessageTable` に対する検索・整形の窓口。
//! 構築後は変更しないため、複数スレッドから同期なしで参照できる。
//!
//! | 状況 | 動作 |
//! |------|------|
//! | 指定言語にコードがない | フォールバック言語を検索 |
//! | どちらにもない | `E0102`（近いコードをサジェスト） |
//! | formatに対応するパターンがない | メッセージ本文をそのまま返す |
//! | プレースホルダーの値がない | `E0201` |

use crate::config::{self, Config};
use crate::error::{ProvError, Result};
use crate::table::{self, MessageRecord, MessageTable};
use crate::template::{self, Context};
use std::sync::OnceLock;

/// サジェストに使う編集距離の上限
const SUGGEST_MAX_DISTANCE: usize = 2;
const SUGGEST_MAX: usize = 3;

#[derive(Debug, Clone)]
pub struct Catalog {
    table: MessageTable,
    default_lang: String,
    fallback_lang: String,
}

impl Catalog {
    pub fn new(
        table: MessageTable,
        default_lang: impl Into<String>,
        fallback_lang: impl Into<String>,
    ) -> Self {
        Self {
            table,
            default_lang: default_lang.into(),
            fallback_lang: fallback_lang.into(),
        }
    }

    /// 組み込みテーブルのみのカタログ
    pub fn builtin(default_lang: impl Into<String>) -> Self {
        Self::new(
            table::builtin().clone(),
            default_lang,
            config::DEFAULT_FALLBACK_LANG,
        )
    }

    /// 設定に従って構築（上書きファイルの読み込みを含む）
    pub fn from_config(config: &Config) -> Result<Self> {
        let table = match &config.general.message_table_dir {
            Some(dir) => crate::overlay::load_dir(table::builtin(), dir)?,
            None => table::builtin().clone(),
        };
        Ok(Self::new(
            table,
            config.lang(),
            config.general.fallback_lang.clone(),
        ))
    }

    pub fn table(&self) -> &MessageTable {
        &self.table
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn fallback_lang(&self) -> &str {
        &self.fallback_lang
    }

    /// メッセージを取得（指定言語になければフォールバック言語）
    pub fn get(&self, lang: &str, code: &str) -> Option<&MessageRecord> {
        self.table
            .lookup(lang, code)
            .or_else(|| self.table.lookup(&self.fallback_lang, code))
    }

    /// `get` の失敗をサジェスト付きエラーにしたもの
    pub fn require(&self, lang: &str, code: &str) -> Result<&MessageRecord> {
        self.get(lang, code)
            .ok_or_else(|| ProvError::unknown_code(lang, code, &self.suggest(code)))
    }

    /// 近いコードを編集距離順に返す
    pub fn suggest(&self, code: &str) -> Vec<String> {
        let mut candidates: Vec<(usize, &str)> = self
            .table
            .all_codes()
            .into_iter()
            .map(|c| (strsim::levenshtein(code, c), c))
            .filter(|&(d, _)| d <= SUGGEST_MAX_DISTANCE)
            .collect();
        candidates.sort();
        candidates
            .into_iter()
            .take(SUGGEST_MAX)
            .map(|(_, c)| c.to_string())
            .collect()
    }

    /// メッセージを展開し、formatのパターンを適用する
    ///
    /// パターンには展開済みの本文が `message` として渡される。
    pub fn format(&self, lang: &str, code: &str, ctx: &Context) -> Result<String> {
        let record = self.require(lang, code)?;
        let body = template::render(&record.template, ctx)?;

        match self.table.pattern(&record.format) {
            Some(pattern) => {
                let mut pattern_ctx = ctx.clone();
                pattern_ctx.insert("message", body);
                template::render(&pattern.template, &pattern_ctx)
            }
            None => Ok(body),
        }
    }

    /// デフォルト言語で `format`
    pub fn format_default(&self, code: &str, ctx: &Context) -> Result<String> {
        self.format(&self.default_lang, code, ctx)
    }
}

// グローバルインスタンス
static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// グローバルカタログを設定（設定済みなら `false`）
pub fn init(catalog: Catalog) -> bool {
    CATALOG.set(catalog).is_ok()
}

/// グローバルカタログを取得
///
/// `init` されていなければ組み込みテーブルと環境変数の言語で初期化する。
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| Catalog::builtin(config::lang_from_env(None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::table::{LanguageTable, PatternRecord};
    use std::collections::BTreeMap;

    fn ja_catalog() -> Catalog {
        Catalog::builtin("ja")
    }

    #[test]
    fn test_format_start() {
        let ctx = Context::new()
            .with("class_name", "user")
            .with("playbook", "user.yml");
        assert_eq!(
            ja_catalog().format("ja", "8201", &ctx).unwrap(),
            "クラス 'user' を対象とした ansible プレイブック 'user.yml'の実行を開始しました。"
        );
    }

    #[test]
    fn test_fallback_lang() {
        let ctx = Context::new().with("play_name", "setup");
        // en は空なので ja にフォールバック
        assert_eq!(
            ja_catalog().format("en", "8206", &ctx).unwrap(),
            "プレイ setup の実行を開始しました。"
        );
        assert_eq!(
            ja_catalog().format("fr", "8206", &ctx).unwrap(),
            "プレイ setup の実行を開始しました。"
        );
    }

    #[test]
    fn test_unknown_code_suggests() {
        let err = ja_catalog().require("ja", "8281").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0102);
        assert_eq!(err.suggestions().len(), 3);
        assert!(err.suggestions()[0].contains("8201"));

        assert!(ja_catalog().suggest("abcdef").is_empty());
    }

    #[test]
    fn test_pattern_wraps_message() {
        let mut langs = BTreeMap::new();
        langs.insert(
            "en".to_string(),
            LanguageTable {
                message_table: vec![MessageRecord::new(
                    "8301",
                    "8300",
                    "Task <%= task_name %> done",
                )],
            },
        );
        let table = MessageTable::new(
            langs,
            vec![PatternRecord::new("8300", "[<%= playbook %>] <%= message %>")],
        );
        let catalog = Catalog::new(table, "en", "en");
        let ctx = Context::new().with("task_name", "mkdir").with("playbook", "site.yml");
        assert_eq!(
            catalog.format_default("8301", &ctx).unwrap(),
            "[site.yml] Task mkdir done"
        );
    }

    #[test]
    fn test_missing_pattern_returns_body() {
        let mut langs = BTreeMap::new();
        langs.insert(
            "ja".to_string(),
            LanguageTable {
                message_table: vec![MessageRecord::new("8400", "9999", "本文")],
            },
        );
        let catalog = Catalog::new(MessageTable::new(langs, Vec::new()), "ja", "ja");
        assert_eq!(catalog.format("ja", "8400", &Context::new()).unwrap(), "本文");
    }

    #[test]
    fn test_missing_placeholder() {
        let err = ja_catalog()
            .format("ja", "8205", &Context::new().with("playbook", "a.yml"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0201);
    }
}
