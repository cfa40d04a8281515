//! provmsgエラー処理
//!
//! 構造化されたエラー情報を提供し、以下をサポート：
//! - エラーコードによる分類
//! - 対象ファイルなどの補足情報（note）
//! - ヒントとサジェスト
//! - 複数の出力形式（人間向け/JSON）

use std::fmt;
use std::path::Path;

/// エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 1xxx: 検索エラー
    E0101, // 未知の言語
    E0102, // 未知のメッセージコード

    // 2xxx: テンプレートエラー
    E0201, // プレースホルダーの値がない

    // 3xxx: 上書きメッセージファイル
    E0301, // 読み込みエラー
    E0302, // パースエラー（致命的）

    // 4xxx: 設定ファイル
    E0401, // 読み込みエラー
    E0402, // パースエラー

    // 5xxx: タスク結果
    E0501, // 結果JSONの形式エラー

    // 9xxx: 汎用エラー
    E9999, // 分類されていないエラー
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 構造化されたエラー情報
#[derive(Debug, Clone)]
pub struct ProvError {
    /// エラーコード
    code: ErrorCode,
    /// メインメッセージ（1行）
    message: String,
    /// 詳細な説明（note）
    notes: Vec<String>,
    /// 解決のヒント（help）
    help: Vec<String>,
    /// サジェスト（もしかして〜？）
    suggestions: Vec<String>,
}

/// crate共通のResult
pub type Result<T> = std::result::Result<T, ProvError>;

impl ProvError {
    /// 新しいエラーを作成
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            notes: Vec::new(),
            help: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// noteを追加
    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    /// helpを追加
    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help.push(help.into());
        self
    }

    /// suggestionを追加
    pub fn with_suggestion<S: Into<String>>(mut self, suggestion: S) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// シンプルなメッセージのみ取得
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// エラーコード + メッセージ（ログ用）
    pub fn short(&self) -> String {
        format!("error[{}]: {}", self.code, self.message)
    }

    /// 完全な詳細情報（CLI用）
    pub fn full(&self) -> String {
        let mut output = format!("error[{}]: {}\n", self.code, self.message);

        for note in &self.notes {
            output.push_str(&format!("  = note: {}\n", note));
        }
        for help_text in &self.help {
            output.push_str(&format!("  = help: {}\n", help_text));
        }
        for suggestion in &self.suggestions {
            output.push_str(&format!("  = suggestion: {}\n", suggestion));
        }

        output
    }

    /// JSON形式で出力（ログ集約用）
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code.to_string(),
            "message": self.message,
            "notes": self.notes,
            "help": self.help,
            "suggestions": self.suggestions,
        })
    }
}

impl fmt::Display for ProvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}

impl From<String> for ProvError {
    fn from(msg: String) -> ProvError {
        ProvError::new(ErrorCode::E9999, msg)
    }
}

impl From<&str> for ProvError {
    fn from(msg: &str) -> ProvError {
        ProvError::new(ErrorCode::E9999, msg.to_string())
    }
}

impl std::error::Error for ProvError {}

// ========================================
// エラー構築ヘルパー関数
// ========================================

impl ProvError {
    /// 未知の言語
    pub fn unknown_lang(lang: &str) -> Self {
        ProvError::new(ErrorCode::E0101, format!("未知の言語: {}", lang))
    }

    /// 未知のメッセージコード（サジェスト付き）
    pub fn unknown_code(lang: &str, code: &str, candidates: &[String]) -> Self {
        let err = ProvError::new(
            ErrorCode::E0102,
            format!("メッセージコード {} は言語 {} に定義されていません", code, lang),
        );
        candidates
            .iter()
            .fold(err, |err, c| err.with_suggestion(format!("もしかして: {}", c)))
    }

    /// プレースホルダーの値がない
    pub fn missing_placeholder(name: &str) -> Self {
        ProvError::new(
            ErrorCode::E0201,
            format!("プレースホルダー '{}' の値が指定されていません", name),
        )
        .with_help(format!("{}=... を指定してください", name))
    }

    /// 上書きメッセージファイルの読み込みエラー
    pub fn overlay_read(path: &Path, err: impl fmt::Display) -> Self {
        ProvError::new(ErrorCode::E0301, format!("メッセージファイルの読み込みに失敗: {}", err))
            .with_note(format!("file: {}", path.display()))
    }

    /// 上書きメッセージファイルのパースエラー
    pub fn overlay_parse(path: &Path, err: impl fmt::Display) -> Self {
        ProvError::new(ErrorCode::E0302, format!("メッセージファイルのパースに失敗: {}", err))
            .with_note(format!("file: {}", path.display()))
            .with_help("ファイルを修正するか、メッセージテーブルディレクトリから取り除いてください")
    }

    /// 設定ファイルの読み込みエラー
    pub fn config_read(path: &Path, err: impl fmt::Display) -> Self {
        ProvError::new(ErrorCode::E0401, format!("設定ファイルの読み込みに失敗: {}", err))
            .with_note(format!("file: {}", path.display()))
    }

    /// 設定ファイルのパースエラー
    pub fn config_parse(path: &Path, err: impl fmt::Display) -> Self {
        ProvError::new(ErrorCode::E0402, format!("設定ファイルのパースに失敗: {}", err))
            .with_note(format!("file: {}", path.display()))
    }

    /// タスク結果の形式エラー
    pub fn task_result(message: impl Into<String>) -> Self {
        ProvError::new(ErrorCode::E0501, format!("タスク結果の形式が不正です: {}", message.into()))
    }
}
