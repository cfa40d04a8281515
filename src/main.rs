use prov_message::catalog::Catalog;
use prov_message::config::Config;
use prov_message::error::{ProvError, Result};
use prov_message::i18n::{self, fmt_ui_msg, ui_msg, Lang, UiMsg};
use prov_message::integrity;
use prov_message::log::LogFormat;
use prov_message::task_log::TaskLogger;
use prov_message::template::{self, Context};
use prov_message::{log_debug, log_error};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 値を取るオプション
const VALUE_OPTIONS: &[&str] = &[
    "--config",
    "--lang",
    "--class",
    "--playbook",
    "--task-id",
    "--setting",
];

/// コマンドライン引数
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    lang: Option<String>,
    class: Option<String>,
    playbook: Option<String>,
    task_id: Option<String>,
    setting: Option<String>,
    help: bool,
    version: bool,
    positional: Vec<String>,
}

/// 引数エラー（UIメッセージを表示して終了）
#[derive(Debug)]
enum ArgError {
    RequiresArg(String),
    UnknownOption(String),
}

fn parse_args(args: &[String]) -> std::result::Result<CliArgs, ArgError> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.help = true,
            "-v" | "--version" => cli.version = true,
            opt if VALUE_OPTIONS.contains(&opt) => {
                let value = iter
                    .next()
                    .cloned()
                    .ok_or_else(|| ArgError::RequiresArg(opt.to_string()))?;
                match opt {
                    "--config" => cli.config = Some(PathBuf::from(value)),
                    "--lang" => cli.lang = Some(value),
                    "--class" => cli.class = Some(value),
                    "--playbook" => cli.playbook = Some(value),
                    "--task-id" => cli.task_id = Some(value),
                    _ => cli.setting = Some(value),
                }
            }
            opt if opt.starts_with('-') && opt.len() > 1 => {
                return Err(ArgError::UnknownOption(opt.to_string()))
            }
            _ => cli.positional.push(arg.clone()),
        }
    }

    Ok(cli)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(ArgError::RequiresArg(opt)) => {
            usage_error(fmt_ui_msg(UiMsg::ErrorRequiresArg, &[&opt]))
        }
        Err(ArgError::UnknownOption(opt)) => {
            usage_error(fmt_ui_msg(UiMsg::ErrorUnknownOption, &[&opt]))
        }
    };

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log_error!(e.short());
            eprint!("{}", e.full());
            std::process::exit(1);
        }
    }
}

fn usage_error(message: String) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", ui_msg(UiMsg::ErrorUseHelp));
    std::process::exit(2);
}

fn run(cli: CliArgs) -> Result<i32> {
    let config = Config::find_and_load(cli.config.as_deref())?;
    config.apply_logging();

    let lang = cli.lang.clone().unwrap_or_else(|| config.lang());
    i18n::init(Lang::from_tag(&lang));

    if cli.help {
        print_help();
        return Ok(0);
    }
    if cli.version {
        println!("{}", fmt_ui_msg(UiMsg::VersionString, &[VERSION]));
        return Ok(0);
    }

    // 上書きファイルが不正な場合はここで終了する
    let catalog = Catalog::from_config(&config)?;
    log_debug!(
        "メッセージテーブルを読み込みました",
        lang = lang,
        languages = catalog.table().languages().join(",")
    );

    let Some((command, rest)) = cli.positional.split_first() else {
        print_help();
        return Ok(2);
    };
    execute(&cli, &config, &catalog, &lang, command, rest)
}

/// サブコマンドを実行して終了コードを返す
fn execute(
    cli: &CliArgs,
    config: &Config,
    catalog: &Catalog,
    lang: &str,
    command: &str,
    rest: &[String],
) -> Result<i32> {
    match command {
        "show" => {
            let code = require_arg(rest.first(), "show")?;
            let record = catalog.require(lang, code)?;
            println!("{}", fmt_ui_msg(UiMsg::ShowCode, &[&record.code]));
            println!("{}", fmt_ui_msg(UiMsg::ShowFormat, &[&record.format]));
            println!("{}", fmt_ui_msg(UiMsg::ShowTemplate, &[&record.template]));
            println!(
                "{}",
                fmt_ui_msg(
                    UiMsg::ShowPlaceholders,
                    &[&template::placeholders(&record.template).join(", ")]
                )
            );
            Ok(0)
        }
        "render" => {
            let code = require_arg(rest.first(), "render")?;
            let ctx = parse_pairs(&rest[1..])?;
            println!("{}", catalog.format(lang, code, &ctx)?);
            Ok(0)
        }
        "list" => {
            let table = catalog.table();
            if !table.has_language(lang) {
                return Err(ProvError::unknown_lang(lang));
            }
            let records = table.records(lang);
            println!(
                "{}",
                fmt_ui_msg(UiMsg::ListHeader, &[lang, &records.len().to_string()])
            );
            for record in records {
                println!("{}\t{}\t{}", record.code, record.format, record.template);
            }
            Ok(0)
        }
        "check" => {
            let report = integrity::check(catalog.table());
            if report.is_clean() {
                println!(
                    "{}",
                    fmt_ui_msg(
                        UiMsg::CheckClean,
                        &[
                            &report.checked_records.to_string(),
                            &report.checked_patterns.to_string()
                        ]
                    )
                );
                Ok(0)
            } else {
                println!(
                    "{}",
                    fmt_ui_msg(UiMsg::CheckIssues, &[&report.issues.len().to_string()])
                );
                for issue in &report.issues {
                    println!("{}", fmt_ui_msg(UiMsg::CheckIssue, &[&issue.to_string()]));
                }
                Ok(1)
            }
        }
        "dump" => {
            let json = serde_json::to_string_pretty(catalog.table())
                .map_err(|e| ProvError::from(e.to_string()))?;
            println!("{}", json);
            Ok(0)
        }
        "replay" => replay(cli, config, catalog, lang, rest),
        other => {
            eprintln!("{}", fmt_ui_msg(UiMsg::ErrorUnknownCommand, &[other]));
            eprintln!("{}", ui_msg(UiMsg::ErrorUseHelp));
            Ok(2)
        }
    }
}

/// ansible-playbookの結果JSONからタスクログを生成して表示
fn replay(
    cli: &CliArgs,
    config: &Config,
    catalog: &Catalog,
    lang: &str,
    rest: &[String],
) -> Result<i32> {
    let path = require_arg(rest.first(), "replay")?;
    let class = require_arg(cli.class.as_ref(), "--class")?;
    let playbook = require_arg(cli.playbook.as_ref(), "--playbook")?;

    let text = std::fs::read_to_string(path).map_err(|e| {
        ProvError::from(fmt_ui_msg(UiMsg::ErrorFailedToRead, &[path, &e.to_string()]))
    })?;
    let result: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        ProvError::from(fmt_ui_msg(UiMsg::ErrorInvalidJson, &[path, &e.to_string()]))
    })?;

    let logger = TaskLogger::new(
        cli.task_id.clone().unwrap_or_default(),
        cli.setting.clone().unwrap_or_default(),
        class.as_str(),
        playbook.as_str(),
    )
    .with_codebase(config.task.codebase);

    for log in logger.from_result(&result)? {
        let text = log.render(catalog, lang)?;
        match config.log.format {
            LogFormat::Json => {
                let mut payload = log.to_json();
                payload["message"] = serde_json::Value::String(text);
                println!("{}", payload);
            }
            LogFormat::Text => {
                let timestamp = log.timestamp.to_rfc3339();
                println!(
                    "{}",
                    fmt_ui_msg(
                        UiMsg::ReplayLine,
                        &[&timestamp, log.level.as_str(), &log.code, &text]
                    )
                );
            }
        }
    }
    Ok(0)
}

fn require_arg<'a>(value: Option<&'a String>, name: &str) -> Result<&'a String> {
    value.ok_or_else(|| ProvError::from(fmt_ui_msg(UiMsg::ErrorRequiresArg, &[name])))
}

/// name=value の並びをコンテキストにする
fn parse_pairs(pairs: &[String]) -> Result<Context> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| ProvError::from(fmt_ui_msg(UiMsg::ErrorInvalidPair, &[pair])))
        })
        .collect()
}

fn print_help() {
    println!("{}", ui_msg(UiMsg::HelpTitle));
    println!();
    println!("{}", ui_msg(UiMsg::HelpUsage));
    println!();
    println!("{}", ui_msg(UiMsg::HelpCommands));
    for key in [
        UiMsg::CmdShow,
        UiMsg::CmdRender,
        UiMsg::CmdList,
        UiMsg::CmdCheck,
        UiMsg::CmdDump,
        UiMsg::CmdReplay,
    ] {
        println!("    {}", ui_msg(key));
    }
    println!();
    println!("{}", ui_msg(UiMsg::HelpOptions));
    for key in [
        UiMsg::OptConfig,
        UiMsg::OptLang,
        UiMsg::OptHelp,
        UiMsg::OptVersion,
    ] {
        println!("    {}", ui_msg(key));
    }
    println!();
    println!("{}", ui_msg(UiMsg::HelpEnvVars));
    println!("    {}", ui_msg(UiMsg::EnvLangProvmsg));
    println!("    {}", ui_msg(UiMsg::EnvLangSystem));
}

#[cfg(test)]
mod tests {
    use super::*;
    use prov_message::error::ErrorCode;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_options() {
        let cli = parse_args(&args(&[
            "--lang", "en", "replay", "out.json", "--class", "user", "--playbook", "user.yml",
        ]))
        .unwrap();
        assert_eq!(cli.lang.as_deref(), Some("en"));
        assert_eq!(cli.class.as_deref(), Some("user"));
        assert_eq!(cli.playbook.as_deref(), Some("user.yml"));
        assert_eq!(cli.positional, args(&["replay", "out.json"]));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(
            parse_args(&args(&["show", "--lang"])),
            Err(ArgError::RequiresArg(opt)) if opt == "--lang"
        ));
        assert!(matches!(
            parse_args(&args(&["--verbose"])),
            Err(ArgError::UnknownOption(opt)) if opt == "--verbose"
        ));
    }

    /// provmsg.toml と messages.d を一時ディレクトリに作る
    fn project(overlays: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("provmsg.toml"),
            "[general]\nmessage_table_dir = \"messages.d\"\n",
        )
        .unwrap();
        let messages = dir.path().join("messages.d");
        std::fs::create_dir(&messages).unwrap();
        for (name, body) in overlays {
            std::fs::write(messages.join(name), body).unwrap();
        }
        dir
    }

    fn run_in(dir: &tempfile::TempDir, list: &[&str]) -> Result<i32> {
        let config = dir.path().join("provmsg.toml");
        let mut argv = args(&["--config", config.to_str().unwrap(), "--lang", "ja"]);
        argv.extend(args(list));
        run(parse_args(&argv).unwrap())
    }

    #[test]
    fn test_run_check_exit_codes() {
        let clean = project(&[]);
        assert_eq!(run_in(&clean, &["check"]).unwrap(), 0);

        // パターンのないformatを参照する上書き
        let dirty = project(&[(
            "extra.json",
            r#"{"messageTable": {"ja": {"messageTable": [
                {"code": "8300", "format": "8999", "template": "x"}
            ]}}}"#,
        )]);
        assert_eq!(run_in(&dirty, &["check"]).unwrap(), 1);
    }

    #[test]
    fn test_run_broken_overlay_is_fatal() {
        let dir = project(&[("broken.json", r#"{"messageTable": "#)]);
        let err = run_in(&dir, &["show", "8201"]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0302);
    }

    #[test]
    fn test_run_unknown_lang_and_command() {
        let dir = project(&[]);
        let config = dir.path().join("provmsg.toml");
        let argv = args(&["--config", config.to_str().unwrap(), "--lang", "fr", "list"]);
        let err = run(parse_args(&argv).unwrap()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0101);

        assert_eq!(run_in(&dir, &["frobnicate"]).unwrap(), 2);
        assert_eq!(run_in(&dir, &[]).unwrap(), 2);
        assert_eq!(run_in(&dir, &["show", "8201"]).unwrap(), 0);
    }

    #[test]
    fn test_parse_pairs() {
        let ctx = parse_pairs(&args(&["playbook=site.yml", "message=a=b"])).unwrap();
        assert_eq!(ctx.get("playbook"), Some("site.yml"));
        assert_eq!(ctx.get("message"), Some("a=b"));
        assert!(parse_pairs(&args(&["novalue"])).is_err());
    }
}
