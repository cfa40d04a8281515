//! プロジェクト固有のメッセージテーブル（上書きファイル）の読み込み
//!
//! - `message_table_dir` 直下の拡張子 `.json` のファイルが対象。サブディレクトリは読み込まない
//! - JSONとして不正なファイルは致命的エラーとして読み込みを中断する
//! - `messageTable` も `messagePattern` も持たないファイルは無視する
//! - 組み込みテーブルと重複した場合は上書きする
//!   - `messageTable` の lang と code が同じ場合
//!   - `messagePattern` の format が同じ場合
//! - 上書きファイル同士で重複した場合はファイル名順で後のファイルが勝つ（警告を出す）

use crate::error::{ProvError, Result};
use crate::table::{LanguageTable, MessageTable, PatternRecord};
use crate::{log_debug, log_info, log_warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// プロジェクト固有のメッセージコード範囲
pub const USER_CODE_RANGE: RangeInclusive<u32> = 8000..=8999;

const OVERLAY_EXTENSION: &str = "json";

/// 1ファイル分の上書き定義
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overlay {
    #[serde(rename = "messageTable")]
    pub message_table: Option<BTreeMap<String, LanguageTable>>,
    #[serde(rename = "messagePattern")]
    pub message_pattern: Option<Vec<PatternRecord>>,
}

/// マージ結果の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub replaced: usize,
    pub added: usize,
}

impl Overlay {
    /// JSON文字列をパース（`path` はエラーメッセージ用）
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProvError::overlay_parse(path, e))
    }

    /// ファイルを読み込んでパース
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ProvError::overlay_read(path, e))?;
        Self::parse(path, &text)
    }

    /// 何もexportしていないか
    pub fn is_empty(&self) -> bool {
        self.message_table.is_none() && self.message_pattern.is_none()
    }

    /// テーブルにマージする
    ///
    /// 既存と同じキーはその位置で置き換え、新しいものは末尾に追加する。
    pub fn apply_to(&self, table: &mut MessageTable) -> MergeStats {
        let mut stats = MergeStats::default();

        for (lang, overlay_lang) in self.message_table.iter().flatten() {
            let records = &mut table.language_mut(lang).message_table;
            for record in &overlay_lang.message_table {
                match records.iter_mut().rev().find(|r| r.code == record.code) {
                    Some(existing) => {
                        *existing = record.clone();
                        stats.replaced += 1;
                    }
                    None => {
                        records.push(record.clone());
                        stats.added += 1;
                    }
                }
            }
        }

        let patterns = table.patterns_mut();
        for pattern in self.message_pattern.iter().flatten() {
            match patterns.iter_mut().rev().find(|p| p.format == pattern.format) {
                Some(existing) => {
                    *existing = pattern.clone();
                    stats.replaced += 1;
                }
                None => {
                    patterns.push(pattern.clone());
                    stats.added += 1;
                }
            }
        }

        stats
    }
}

/// ディレクトリ直下の上書き対象ファイル（ファイル名順）
pub fn overlay_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ProvError::overlay_read(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ProvError::overlay_read(dir, e))?.path();
        let is_overlay = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == OVERLAY_EXTENSION);
        if is_overlay {
            files.push(path);
        } else {
            log_debug!("メッセージファイルではないためスキップ", path = path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `base` をコピーし、`dir` の上書きファイルをすべて適用したテーブルを返す
///
/// 1つでも不正なファイルがあればエラー（呼び出し側でプロセスを終了する）。
pub fn load_dir(base: &MessageTable, dir: &Path) -> Result<MessageTable> {
    let mut table = base.clone();
    // 上書きファイル間の重複検出用
    let mut code_owner: HashMap<(String, String), PathBuf> = HashMap::new();
    let mut format_owner: HashMap<String, PathBuf> = HashMap::new();

    for path in overlay_files(dir)? {
        let overlay = Overlay::load(&path)?;
        if overlay.is_empty() {
            log_debug!(
                "messageTable/messagePatternが定義されていないため無視",
                file = path.display()
            );
            continue;
        }

        for (lang, lang_table) in overlay.message_table.iter().flatten() {
            for record in &lang_table.message_table {
                check_code_range(&path, &record.code);
                let key = (lang.clone(), record.code.clone());
                if let Some(previous) = code_owner.insert(key, path.clone()) {
                    if previous != path {
                        log_warn!(
                            "上書きファイル間でメッセージコードが重複しています",
                            lang = lang,
                            code = record.code,
                            previous = previous.display(),
                            file = path.display()
                        );
                    }
                }
            }
        }
        for pattern in overlay.message_pattern.iter().flatten() {
            if let Some(previous) = format_owner.insert(pattern.format.clone(), path.clone()) {
                if previous != path {
                    log_warn!(
                        "上書きファイル間でformatが重複しています",
                        format = pattern.format,
                        previous = previous.display(),
                        file = path.display()
                    );
                }
            }
        }

        let stats = overlay.apply_to(&mut table);
        log_info!(
            "メッセージファイルを読み込みました",
            file = path.display(),
            replaced = stats.replaced,
            added = stats.added
        );
    }

    Ok(table)
}

fn check_code_range(path: &Path, code: &str) {
    let in_range = code
        .parse::<u32>()
        .map(|n| USER_CODE_RANGE.contains(&n))
        .unwrap_or(false);
    if !in_range {
        log_warn!(
            "プロジェクト固有のメッセージコードは8000～8999を使用してください",
            code = code,
            file = path.display()
        );
    }
}
