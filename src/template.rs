//! `<%= name %>` 形式のテンプレート
//!
//! - 置換は1回の走査のみで、置換結果を再度展開することはない
//! - 値のないプレースホルダーはエラー
//! - 形式に合わない `<%` などはそのまま出力する

use crate::error::{ProvError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<%=\s*([A-Za-z_][A-Za-z0-9_]*)\s*%>").expect("valid regex")
});

/// プレースホルダーに渡す値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// ビルダー形式で値を追加
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `other` の値で上書きしながらマージ
    pub fn extend(&mut self, other: &Context) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    /// JSONオブジェクトから作成
    ///
    /// 文字列はそのまま、`null` は空文字、その他はJSON表記で格納する。
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ProvError::from(format!(
                "コンテキストはJSONオブジェクトである必要があります: {}",
                value
            ))
        })?;
        Ok(obj
            .iter()
            .map(|(k, v)| (k.clone(), json_text(v)))
            .collect())
    }

    /// JSONオブジェクトとして出力
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

/// JSON値をテンプレートに埋め込む文字列へ変換
pub fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// テンプレート中のプレースホルダー名（出現順、重複なし）
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        if let Some(m) = caps.get(1) {
            if !names.contains(&m.as_str()) {
                names.push(m.as_str());
            }
        }
    }
    names
}

/// テンプレートを展開
pub fn render(template: &str, ctx: &Context) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = ctx
            .get(name.as_str())
            .ok_or_else(|| ProvError::missing_placeholder(name.as_str()))?;
        result.push_str(&template[last..whole.start()]);
        result.push_str(value);
        last = whole.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_placeholders_in_order() {
        let names = placeholders(
            "要素 <%= item %> について対象 '<%= host_name %>' に繰り返しタスク <%= task_name %> を実行しましたが失敗しました<%= message %>",
        );
        assert_eq!(names, vec!["item", "host_name", "task_name", "message"]);
    }

    #[test]
    fn test_placeholders_dedup_and_spacing() {
        assert_eq!(placeholders("<%=a%> <%=  a  %> <%= b %>"), vec!["a", "b"]);
        assert!(placeholders("no placeholders").is_empty());
        assert!(placeholders("<% code %> <%= 1abc %>").is_empty());
    }

    #[test]
    fn test_render_substitutes() {
        let ctx = Context::new()
            .with("class_name", "user")
            .with("playbook", "user.yml");
        let text = render(
            "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行を開始しました。",
            &ctx,
        )
        .unwrap();
        assert_eq!(
            text,
            "クラス 'user' を対象とした ansible プレイブック 'user.yml'の実行を開始しました。"
        );
    }

    #[test]
    fn test_render_missing_value() {
        let err = render("<%= message %>", &Context::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0201);
    }

    #[test]
    fn test_render_single_pass() {
        let ctx = Context::new().with("message", "<%= message %>");
        assert_eq!(render("[<%= message %>]", &ctx).unwrap(), "[<%= message %>]");
    }

    #[test]
    fn test_render_keeps_malformed_text() {
        let ctx = Context::new().with("x", "X");
        assert_eq!(render("<%= x %> <% x %> <%= x", &ctx).unwrap(), "X <% x %> <%= x");
    }

    #[test]
    fn test_context_from_json() {
        let json = serde_json::json!({
            "host_name": "web01",
            "item": {"uid": "alice"},
            "message": null,
            "count": 3
        });
        let ctx = Context::from_json(&json).unwrap();
        assert_eq!(ctx.get("host_name"), Some("web01"));
        assert_eq!(ctx.get("item"), Some(r#"{"uid":"alice"}"#));
        assert_eq!(ctx.get("message"), Some(""));
        assert_eq!(ctx.get("count"), Some("3"));

        assert!(Context::from_json(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_context_extend_overrides() {
        let mut ctx = Context::new().with("a", "1").with("b", "2");
        ctx.extend(&Context::new().with("b", "3"));
        assert_eq!(ctx.get("b"), Some("3"));
        assert_eq!(ctx.len(), 2);
    }
}
