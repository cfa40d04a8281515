//! メッセージテーブルの整合性チェック
//!
//! テーブル自体は整合性を強制しない。必要な利用側だけがこのチェックを呼ぶ。

use crate::table::MessageTable;
use crate::template;
use std::collections::{BTreeSet, HashMap};

/// 描画側が値を渡すプレースホルダー名
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "message",
    "class_name",
    "playbook",
    "host_name",
    "task_name",
    "item",
    "stats",
    "play_name",
];

/// 検出された問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// formatに対応するパターンがない
    UnresolvedFormat {
        lang: String,
        code: String,
        format: String,
    },
    /// 同一言語内でコードが重複
    DuplicateCode { lang: String, code: String, count: usize },
    /// パターンのformatが重複
    DuplicateFormat { format: String, count: usize },
    /// 語彙にないプレースホルダー
    UnknownPlaceholder {
        lang: String,
        code: String,
        name: String,
    },
    /// パターンに `message` がない
    PatternWithoutMessage { format: String },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::UnresolvedFormat { lang, code, format } => {
                write!(f, "{}/{}: format '{}' has no pattern", lang, code, format)
            }
            Issue::DuplicateCode { lang, code, count } => {
                write!(f, "{}/{}: code defined {} times", lang, code, count)
            }
            Issue::DuplicateFormat { format, count } => {
                write!(f, "pattern '{}' defined {} times", format, count)
            }
            Issue::UnknownPlaceholder { lang, code, name } => {
                write!(f, "{}/{}: unknown placeholder '{}'", lang, code, name)
            }
            Issue::PatternWithoutMessage { format } => {
                write!(f, "pattern '{}' has no message placeholder", format)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub issues: Vec<Issue>,
    /// チェックしたメッセージ数（全言語）
    pub checked_records: usize,
    pub checked_patterns: usize,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// 整合性チェック
pub struct Checker<'a> {
    vocabulary: BTreeSet<&'a str>,
}

impl Default for Checker<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY)
    }
}

impl<'a> Checker<'a> {
    pub fn new(vocabulary: &[&'a str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().copied().collect(),
        }
    }

    /// 語彙を追加
    pub fn allow(mut self, name: &'a str) -> Self {
        self.vocabulary.insert(name);
        self
    }

    pub fn check(&self, table: &MessageTable) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        for lang in table.languages() {
            let records = table.records(lang);
            report.checked_records += records.len();

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for record in records {
                *counts.entry(record.code.as_str()).or_default() += 1;

                if table.pattern(&record.format).is_none() {
                    report.issues.push(Issue::UnresolvedFormat {
                        lang: lang.to_string(),
                        code: record.code.clone(),
                        format: record.format.clone(),
                    });
                }

                for name in template::placeholders(&record.template) {
                    if !self.vocabulary.contains(name) {
                        report.issues.push(Issue::UnknownPlaceholder {
                            lang: lang.to_string(),
                            code: record.code.clone(),
                            name: name.to_string(),
                        });
                    }
                }
            }

            // 定義順で報告
            let mut reported = BTreeSet::new();
            for record in records {
                let count = counts[record.code.as_str()];
                if count > 1 && reported.insert(record.code.as_str()) {
                    report.issues.push(Issue::DuplicateCode {
                        lang: lang.to_string(),
                        code: record.code.clone(),
                        count,
                    });
                }
            }
        }

        let patterns = table.message_pattern();
        report.checked_patterns = patterns.len();
        let mut format_counts: HashMap<&str, usize> = HashMap::new();
        for pattern in patterns {
            *format_counts.entry(pattern.format.as_str()).or_default() += 1;
            if !template::placeholders(&pattern.template).contains(&"message") {
                report.issues.push(Issue::PatternWithoutMessage {
                    format: pattern.format.clone(),
                });
            }
        }
        let mut reported = BTreeSet::new();
        for pattern in patterns {
            let count = format_counts[pattern.format.as_str()];
            if count > 1 && reported.insert(pattern.format.as_str()) {
                report.issues.push(Issue::DuplicateFormat {
                    format: pattern.format.clone(),
                    count,
                });
            }
        }

        report
    }
}

/// デフォルト語彙でチェック
pub fn check(table: &MessageTable) -> IntegrityReport {
    Checker::default().check(table)
}
