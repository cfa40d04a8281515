use super::ui_msg::UiMsg;
use super::{EN_UI_MSGS, JA_UI_MSGS};
use std::sync::OnceLock;

/// 表示言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Ja,
}

impl Lang {
    /// 言語タグから変換（未対応言語は英語）
    pub fn from_tag(tag: &str) -> Self {
        match tag.split(['_', '-', '.']).next().unwrap_or("") {
            "ja" => Lang::Ja,
            _ => Lang::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }
}

/// メッセージマネージャー（jaになければenにフォールバック）
pub struct Messages {
    lang: Lang,
}

impl Messages {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn ui(&self, key: UiMsg) -> &'static str {
        match self.lang {
            Lang::En => EN_UI_MSGS.get(&key).copied().unwrap_or("[missing message]"),
            Lang::Ja => JA_UI_MSGS
                .get(&key)
                .or_else(|| EN_UI_MSGS.get(&key))
                .copied()
                .unwrap_or("[missing message]"),
        }
    }

    /// プレースホルダー {0}, {1}, ... を置換
    pub fn fmt_ui(&self, key: UiMsg, args: &[&str]) -> String {
        fmt_positional(self.ui(key), args)
    }
}

/// 一度の走査で `{n}` を置換する。範囲外や数字以外はそのまま残す
fn fmt_positional(template: &str, args: &[&str]) -> String {
    let estimated_size = template.len() + args.iter().map(|s| s.len()).sum::<usize>();
    let mut result = String::with_capacity(estimated_size);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index = after[..close].parse::<usize>().ok()?;
            args.get(index).map(|arg| (arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}

// グローバルインスタンス
static MESSAGES: OnceLock<Messages> = OnceLock::new();

/// 表示言語を設定（2回目以降は無視）
pub fn init(lang: Lang) {
    let _ = MESSAGES.set(Messages::new(lang));
}

/// グローバルなメッセージインスタンスを取得
pub fn messages() -> &'static Messages {
    MESSAGES.get_or_init(|| Messages::new(Lang::from_tag(&crate::config::lang_from_env(None))))
}

/// UIメッセージを取得してフォーマット
pub fn fmt_ui_msg(key: UiMsg, args: &[&str]) -> String {
    messages().fmt_ui(key, args)
}

/// UIメッセージを取得
pub fn ui_msg(key: UiMsg) -> &'static str {
    messages().ui(key)
}
