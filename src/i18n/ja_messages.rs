use super::ui_msg::UiMsg;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 日本語UIメッセージ
pub static JA_UI_MSGS: LazyLock<HashMap<UiMsg, &'static str>> = LazyLock::new(|| {
    use UiMsg::*;
    HashMap::from([
        // ヘルプ
        (HelpTitle, "provmsg - プロビジョニングメッセージテーブルツール"),
        (HelpUsage, "使い方: provmsg [オプション] <コマンド> [引数...]"),
        (HelpCommands, "コマンド:"),
        (HelpOptions, "オプション:"),
        (HelpEnvVars, "環境変数:"),
        // コマンド説明
        (CmdShow, "show <code>                 メッセージ定義を表示"),
        (CmdRender, "render <code> [name=value]  メッセージを展開して表示"),
        (CmdList, "list                        メッセージ一覧を表示"),
        (CmdCheck, "check                       メッセージテーブルの整合性をチェック"),
        (CmdDump, "dump                        有効なメッセージテーブルをJSONで出力"),
        (
            CmdReplay,
            "replay <result.json> --class <name> --playbook <file> [--task-id <id>] [--setting <name>]\n                              ansible-playbookの結果からタスクログを生成",
        ),
        // オプション説明
        (OptConfig, "--config <path>   設定ファイル（既定: ./provmsg.toml）"),
        (OptLang, "--lang <lang>     メッセージの言語"),
        (OptHelp, "-h, --help        このヘルプを表示"),
        (OptVersion, "-v, --version     バージョンを表示"),
        // 環境変数説明
        (EnvLangProvmsg, "PROVMSG_LANG      メッセージの言語（最優先）"),
        (EnvLangSystem, "LANG              システムのロケール（ja_JP.UTF-8 -> ja）"),
        // バージョン
        (VersionString, "provmsg {0}"),
        // 一覧・表示
        (ListHeader, "言語 {0} のメッセージ ({1} 件)"),
        (ShowCode, "コード: {0}"),
        (ShowFormat, "フォーマット: {0}"),
        (ShowTemplate, "テンプレート: {0}"),
        (ShowPlaceholders, "プレースホルダー: {0}"),
        // チェック
        (CheckClean, "問題はありません（メッセージ {0} 件、パターン {1} 件）"),
        (CheckIssues, "{0} 件の問題が見つかりました"),
        (CheckIssue, "  - {0}"),
        // リプレイ
        (ReplayLine, "[{0}] {1} {2} {3}"),
        // エラー
        (ErrorRequiresArg, "エラー: {0} には引数が必要です"),
        (ErrorUnknownCommand, "エラー: 不明なコマンド: {0}"),
        (ErrorUnknownOption, "エラー: 不明なオプション: {0}"),
        (ErrorInvalidPair, "エラー: name=value 形式ではありません: {0}"),
        (ErrorFailedToRead, "エラー: {0} の読み込みに失敗しました: {1}"),
        (ErrorInvalidJson, "エラー: {0} はJSONとして不正です: {1}"),
        (ErrorUseHelp, "--help で使い方を表示します"),
    ])
});
