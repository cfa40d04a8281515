/// UIメッセージキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiMsg {
    // ヘルプ
    HelpTitle,
    HelpUsage,
    HelpCommands,
    HelpOptions,
    HelpEnvVars,

    // コマンド説明
    CmdShow,
    CmdRender,
    CmdList,
    CmdCheck,
    CmdDump,
    CmdReplay,

    // オプション説明
    OptConfig,
    OptLang,
    OptHelp,
    OptVersion,

    // 環境変数説明
    EnvLangProvmsg,
    EnvLangSystem,

    // バージョン
    VersionString, // provmsg {0}

    // 一覧・表示
    ListHeader,   // 言語 {0} のメッセージ ({1} 件)
    ShowCode,     // code: {0}
    ShowFormat,   // format: {0}
    ShowTemplate, // template: {0}
    ShowPlaceholders, // placeholders: {0}

    // チェック
    CheckClean,   // 問題はありません（メッセージ {0} 件、パターン {1} 件）
    CheckIssues,  // {0} 件の問題が見つかりました
    CheckIssue,   //   - {0}

    // リプレイ
    ReplayLine, // [{0}] {1} {2} {3}

    // エラー
    ErrorRequiresArg,     // {0} には引数が必要です
    ErrorUnknownCommand,  // 不明なコマンド: {0}
    ErrorUnknownOption,   // 不明なオプション: {0}
    ErrorInvalidPair,     // name=value 形式ではありません: {0}
    ErrorFailedToRead,    // {0} の読み込みに失敗しました: {1}
    ErrorInvalidJson,     // {0} はJSONとして不正です: {1}
    ErrorUseHelp,         // --help で使い方を表示します
}
