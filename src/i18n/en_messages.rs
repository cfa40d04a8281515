use super::ui_msg::UiMsg;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 英語UIメッセージ
pub static EN_UI_MSGS: LazyLock<HashMap<UiMsg, &'static str>> = LazyLock::new(|| {
    use UiMsg::*;
    HashMap::from([
        // Help
        (HelpTitle, "provmsg - provisioning message table tool"),
        (HelpUsage, "Usage: provmsg [options] <command> [args...]"),
        (HelpCommands, "Commands:"),
        (HelpOptions, "Options:"),
        (HelpEnvVars, "Environment variables:"),
        // Commands
        (CmdShow, "show <code>                 Show a message definition"),
        (CmdRender, "render <code> [name=value]  Render a message"),
        (CmdList, "list                        List messages"),
        (CmdCheck, "check                       Check message table integrity"),
        (CmdDump, "dump                        Print the effective message table as JSON"),
        (
            CmdReplay,
            "replay <result.json> --class <name> --playbook <file> [--task-id <id>] [--setting <name>]\n                              Build task logs from an ansible-playbook result",
        ),
        // Options
        (OptConfig, "--config <path>   Config file (default: ./provmsg.toml)"),
        (OptLang, "--lang <lang>     Message language"),
        (OptHelp, "-h, --help        Show this help"),
        (OptVersion, "-v, --version     Show version"),
        // Environment
        (EnvLangProvmsg, "PROVMSG_LANG      Message language (highest priority)"),
        (EnvLangSystem, "LANG              System locale (ja_JP.UTF-8 -> ja)"),
        // Version
        (VersionString, "provmsg {0}"),
        // Listing
        (ListHeader, "Messages for {0} ({1} entries)"),
        (ShowCode, "code: {0}"),
        (ShowFormat, "format: {0}"),
        (ShowTemplate, "template: {0}"),
        (ShowPlaceholders, "placeholders: {0}"),
        // Check
        (CheckClean, "No issues ({0} messages, {1} patterns)"),
        (CheckIssues, "{0} issue(s) found"),
        (CheckIssue, "  - {0}"),
        // Replay
        (ReplayLine, "[{0}] {1} {2} {3}"),
        // Errors
        (ErrorRequiresArg, "error: {0} requires an argument"),
        (ErrorUnknownCommand, "error: unknown command: {0}"),
        (ErrorUnknownOption, "error: unknown option: {0}"),
        (ErrorInvalidPair, "error: expected name=value: {0}"),
        (ErrorFailedToRead, "error: failed to read {0}: {1}"),
        (ErrorInvalidJson, "error: {0} is not valid JSON: {1}"),
        (ErrorUseHelp, "Use --help for usage"),
    ])
});
