//! 設定ファイル → 上書きファイル → カタログ → タスクログ の統合テスト
//!
//! 実行方法: cargo test --test message_flow

use prov_message::config::Config;
use prov_message::integrity;
use prov_message::task_log::{TaskEvent, TaskLogger};
use prov_message::{Catalog, Context, ErrorCode};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// ヘルパー: provmsg.toml と messages.d を作成
fn setup(overlays: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("provmsg.toml"),
        "[general]\nmessage_table_dir = \"messages.d\"\nlang = \"ja\"\n\n[task]\ncodebase = 8200\n",
    )
    .unwrap();
    let messages = dir.path().join("messages.d");
    fs::create_dir(&messages).unwrap();
    for (name, body) in overlays {
        fs::write(messages.join(name), body).unwrap();
    }
    dir
}

fn load(dir: &Path) -> Result<Catalog, prov_message::ProvError> {
    let config = Config::load(dir.join("provmsg.toml"))?;
    Catalog::from_config(&config)
}

#[test]
fn test_builtin_round_trip() {
    let dir = setup(&[]);
    let catalog = load(dir.path()).unwrap();

    let record = catalog.get("ja", "8201").unwrap();
    assert_eq!(
        record.template,
        "クラス '<%= class_name %>' を対象とした ansible プレイブック '<%= playbook %>'の実行を開始しました。"
    );
    assert!(integrity::check(catalog.table()).is_clean());
}

#[test]
fn test_overlay_overrides_and_extends() {
    let dir = setup(&[(
        "tenant.json",
        r#"{
            "messageTable": {
                "ja": {"messageTable": [
                    {"code": "8203", "format": "8200", "template": "プレイブック '<%= playbook %>' 完了"}
                ]},
                "en": {"messageTable": [
                    {"code": "8201", "format": "8250", "template": "Started playbook '<%= playbook %>' for class '<%= class_name %>'"}
                ]}
            },
            "messagePattern": [
                {"format": "8250", "template": "[tenant] <%= message %>"}
            ]
        }"#,
    )]);
    let catalog = load(dir.path()).unwrap();

    let logger = TaskLogger::new("7", "tenant", "group", "group.yml");
    assert_eq!(
        logger.end().render(&catalog, "ja").unwrap(),
        "プレイブック 'group.yml' 完了"
    );
    assert_eq!(
        logger.start().render(&catalog, "en").unwrap(),
        "[tenant] Started playbook 'group.yml' for class 'group'"
    );
    // en にないコードは ja にフォールバック
    assert_eq!(
        logger.empty_provisioning().render(&catalog, "en").unwrap(),
        "クラス 'group' には対象となるデータがありませんでしたので、タスクを実行しませんでした。"
    );
    assert!(integrity::check(catalog.table()).is_clean());
}

#[test]
fn test_malformed_overlay_stops_loading() {
    let dir = setup(&[("broken.json", "module.exports = {")]);
    let err = load(dir.path()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0302);
}

#[test]
fn test_replay_playbook_result() {
    let dir = setup(&[]);
    let catalog = load(dir.path()).unwrap();
    let result = serde_json::json!({
        "plays": [{
            "play": {"name": "accounts", "duration": {"start": "2024-04-01T10:00:00Z", "end": "2024-04-01T10:01:00Z"}},
            "tasks": [{
                "task": {"name": "useradd", "duration": {"start": "2024-04-01T10:00:10Z", "end": "2024-04-01T10:00:20Z"}},
                "hosts": {"host1": {"changed": true}}
            }]
        }],
        "stats": {"host1": {"changed": 1}}
    });

    let logs = TaskLogger::new("1", "tenant", "user", "user.yml")
        .from_result(&result)
        .unwrap();
    let events: Vec<TaskEvent> = logs.iter().map(|l| l.event).collect();
    assert_eq!(
        events,
        vec![
            TaskEvent::PlayStart,
            TaskEvent::TaskStart,
            TaskEvent::HostChanged,
            TaskEvent::TaskEnd,
            TaskEvent::PlayEnd,
            TaskEvent::Summary,
        ]
    );

    let rendered: Vec<String> = logs
        .iter()
        .map(|l| l.render(&catalog, "ja").unwrap())
        .collect();
    assert_eq!(rendered[0], "プレイ accounts の実行を開始しました。");
    assert_eq!(rendered[2], "対象 'host1' にタスク useradd を実行しました");
    assert_eq!(
        rendered[5],
        r#"プレイブック 'user.yml'のサマリ： {"host1":{"changed":1}}"#
    );
}

#[test]
fn test_render_with_explicit_context() {
    let dir = setup(&[]);
    let catalog = load(dir.path()).unwrap();
    let ctx = Context::new()
        .with("item", "\"alice\"")
        .with("host_name", "ldap01")
        .with("task_name", "add entry")
        .with("message", "");
    assert_eq!(
        catalog.format_default("8210", &ctx).unwrap(),
        "要素 \"alice\" について対象 'ldap01' に繰り返しタスク add entry を実行しましたが失敗しました"
    );
}
