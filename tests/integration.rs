use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_apidoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn api(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cmd();
    c.args(["-c", &fixture_path("apidoc.toml")])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["api", "--routes", &fixture_path("routes.json")]);
    c
}

fn db(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cmd();
    c.args(["-c", &fixture_path("apidoc.toml")])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["db", "--tables", &fixture_path("tables.json")]);
    c
}

// -- api pass --

#[test]
fn api_dry_run_prints_index() {
    let assert = cmd()
        .args(["-c", &fixture_path("apidoc.toml"), "--dry-run"])
        .args(["api", "--routes", &fixture_path("routes.json")])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("### 订单\n\n| 接口 | 注释 |\n"));
    assert!(stdout.contains("| [/order/create](https://docs.example.com/api/order/create) | 创建订单 |"));
    assert!(stdout.contains("| [/order/new](https://docs.example.com/api/order/new) | 创建订单 |"));
    assert!(!stdout.contains("/misc/ping"));
    assert!(!stdout.contains("/user"));
}

#[test]
fn api_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    api(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate description \"创建订单\": /order/create, /order/new"))
        .stderr(predicate::str::contains("unindexed group [未分组X]: /misc/ping"))
        .stderr(predicate::str::contains("handler has no doc comment"))
        .stderr(predicate::str::contains("malformed table reference (orders)"));
}

#[test]
fn api_writes_route_page() {
    let dir = TempDir::new().unwrap();
    api(&dir).assert().success();

    let page = std::fs::read_to_string(dir.path().join("api/order/create.md")).unwrap();
    assert!(page.starts_with("创建订单\n\n## 基本信息\n\n* 接口：【POST】/order/create\n"));
    assert!(page.contains("* 操作日志：启用"));
    assert!(page.contains("| TTP | string | 必填 | - |"));
    assert!(page.contains("| guid | string | 必填 | - | 用户有效guid，用于鉴权 |"));
    assert!(page.contains("| items | []object | 必填 | - | 商品列表 |"));
    assert!(page.contains("| remark | string | 可选 | - | 备注 |"));
    assert!(page.contains("#### items对象详解"));
    assert!(page.contains("| qty | int | 购买数量 |"));
    assert!(page.contains("### success\n```js\n{\n  orderId: '...'\n}\n```\n"));
    assert!(page.contains("### failure\n库存不足\n"));
    assert!(page.contains("## 补充说明\n\n* 同一用户 10 秒内只能下单一次\n"));
    assert!(page.contains("## 未完成事项\n\n* 支持优惠券\n"));

    assert!(dir.path().join("api/接口索引.md").exists());
    assert!(dir.path().join("pages.json").exists());
}

#[test]
fn api_links_tables_documented_earlier() {
    let dir = TempDir::new().unwrap();
    db(&dir).assert().success();
    api(&dir).assert().success();

    let page = std::fs::read_to_string(dir.path().join("api/order/create.md")).unwrap();
    assert!(page.contains("* [db1/orders](https://docs.example.com/db/main/orders)\n* orders\n"));
}

#[test]
fn strict_mode_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    api(&dir)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("documentation error(s)"));
}

#[test]
fn strict_flag_before_subcommand() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["--strict", "-c", &fixture_path("apidoc.toml")])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["api", "--routes", &fixture_path("routes.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("documentation error(s)"));
}

#[test]
fn non_strict_run_succeeds_despite_errors() {
    let dir = TempDir::new().unwrap();
    api(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("documentation error(s)").not());
}

#[test]
fn route_without_declared_params_has_no_parameters_section() {
    let dir = TempDir::new().unwrap();
    api(&dir).assert().success();

    let page = std::fs::read_to_string(dir.path().join("api/order/new.md")).unwrap();
    assert!(!page.contains("## 参数"));
    assert!(!page.contains("| TTP |"));
}

// -- db pass --

#[test]
fn db_writes_tables_and_index() {
    let dir = TempDir::new().unwrap();
    db(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("column [db1.users.nick] has no comment"));

    let orders = std::fs::read_to_string(dir.path().join("db/main/orders.md")).unwrap();
    assert!(orders.contains("|id|BIGINT|否|自增字段|主键|"));
    assert!(orders.contains("#### 字段详解：status"));

    let index = std::fs::read_to_string(dir.path().join("db/main/索引.md")).unwrap();
    let order_pos = index.find("### 订单").unwrap();
    let user_pos = index.find("### 用户").unwrap();
    assert!(order_pos < user_pos);
    assert!(index.contains("| [users](https://docs.example.com/db/main/users) | 用户表 |"));
}

// -- cli --

#[test]
fn missing_config_fails() {
    cmd()
        .args(["-c", "/nonexistent/apidoc.toml"])
        .args(["api", "--routes", &fixture_path("routes.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn invalid_registry_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-c", &fixture_path("apidoc.toml")])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["api", "--routes", &fixture_path("apidoc.toml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid registry"));
}
