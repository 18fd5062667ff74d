#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GRID: &str = r#"[
    {"id": 103, "name": "Ahri"},
    {"id": 157, "name": "Yasuo"},
    {"id": 238, "name": "Zed"}
]"#;

fn draftpilot(server: &mockito::Server) -> Command {
    let mut cmd = Command::cargo_bin("draftpilot").unwrap();
    cmd.env_remove("DRAFTPILOT_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--base-url", &server.url(), "--password", "secret"]);
    cmd
}

fn with_champions(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/lol-champ-select/v1/all-grid-champions")
        .with_status(200)
        .with_body(GRID)
        .create()
}

// ---------------------------------------------------------------------------
// draftpilot --help
// ---------------------------------------------------------------------------

#[test]
fn help_lists_commands() {
    Command::cargo_bin("draftpilot")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("champions"))
        .stdout(predicate::str::contains("badges"));
}

// ---------------------------------------------------------------------------
// draftpilot summoner
// ---------------------------------------------------------------------------

#[test]
fn summoner_prints_summary() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-summoner/v1/current-summoner")
        .match_header("authorization", "Basic cmlvdDpzZWNyZXQ=")
        .with_status(200)
        .with_body(r#"{"gameName":"Faker","tagLine":"KR1","summonerLevel":612}"#)
        .create();
    server
        .mock("GET", "/riotclient/region-locale")
        .with_status(200)
        .with_body(r#"{"webRegion":"kr"}"#)
        .create();
    server
        .mock("GET", "/lol-ranked/v1/current-ranked-stats")
        .with_status(200)
        .with_body(r#"{"queues":[{"queueType":"RANKED_SOLO_5x5","tier":"GOLD","division":"II","leaguePoints":45}]}"#)
        .create();

    draftpilot(&server)
        .arg("summoner")
        .assert()
        .success()
        .stdout(predicate::str::contains("Faker#KR1"))
        .stdout(predicate::str::contains("GOLD II 45 LP"));
}

#[test]
fn summoner_json() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-summoner/v1/current-summoner")
        .with_status(200)
        .with_body(r#"{"gameName":"Faker","tagLine":"KR1","summonerLevel":612}"#)
        .create();

    let output = draftpilot(&server)
        .args(["summoner", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["riot_id"], "Faker#KR1");
    assert_eq!(value["region"], "Unknown");
}

#[test]
fn unreachable_client_fails() {
    let mut cmd = Command::cargo_bin("draftpilot").unwrap();
    cmd.env_remove("DRAFTPILOT_CONFIG")
        .args(["--base-url", "http://127.0.0.1:1", "--timeout", "1", "summoner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// profile commands
// ---------------------------------------------------------------------------

#[test]
fn icon_change() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/lol-summoner/v1/current-summoner/icon")
        .match_body(mockito::Matcher::Json(serde_json::json!({"profileIconId": 29})))
        .with_status(201)
        .create();

    draftpilot(&server)
        .args(["icon", "29"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Icon changed to 29"));
    mock.assert();
}

#[test]
fn icon_rejected_reports_status() {
    let mut server = mockito::Server::new();
    server
        .mock("PUT", "/lol-summoner/v1/current-summoner/icon")
        .with_status(400)
        .with_body("not owned")
        .create();

    draftpilot(&server)
        .args(["icon", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status 400"));
}

#[test]
fn riot_id_validated_before_request() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/lol-summoner/v1/save-alias")
        .expect(0)
        .create();

    draftpilot(&server)
        .args(["riot-id", "averyveryverylongname", "EUW"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("longer than 16"));
    mock.assert();
}

// ---------------------------------------------------------------------------
// draftpilot champions
// ---------------------------------------------------------------------------

#[test]
fn champions_table() {
    let mut server = mockito::Server::new();
    with_champions(&mut server);

    draftpilot(&server)
        .arg("champions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Yasuo"))
        .stdout(predicate::str::contains("3 champions"));
}

#[test]
fn champion_search_suggests() {
    let mut server = mockito::Server::new();
    with_champions(&mut server);

    draftpilot(&server)
        .args(["champions", "--search", "yasou"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean: Yasuo"));
}

#[test]
fn champion_list_falls_back_to_inventory() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-champ-select/v1/all-grid-champions")
        .with_status(404)
        .create();
    server
        .mock("GET", "/lol-champions/v1/inventories/local-player/champions")
        .with_status(200)
        .with_body(r#"[{"id":-1,"name":"None"},{"id":1,"name":"Annie"}]"#)
        .create();

    draftpilot(&server)
        .args(["champions", "--search", "ann"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Annie (1)"));
}

// ---------------------------------------------------------------------------
// lobby / badges / friends
// ---------------------------------------------------------------------------

#[test]
fn reveal_prints_url() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-champ-select/v1/session")
        .with_status(200)
        .with_body(r#"{"myTeam":[{"summonerId": 5, "nameVisibilityType": "VISIBLE"}]}"#)
        .create();
    server
        .mock("GET", "/lol-summoner/v1/summoners/5")
        .with_status(200)
        .with_body(r#"{"gameName":"Teammate","tagLine":"EUW"}"#)
        .create();
    server
        .mock("GET", "/riotclient/region-locale")
        .with_status(200)
        .with_body(r#"{"webRegion":"euw"}"#)
        .create();

    draftpilot(&server)
        .args(["reveal", "--no-open"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://porofessor.gg/pregame/euw/Teammate%23EUW/soloqueue/season",
        ));
}

#[test]
fn reveal_outside_champ_select() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-champ-select/v1/session")
        .with_status(404)
        .with_body(r#"{"errorCode":"RPC_ERROR"}"#)
        .create();

    draftpilot(&server)
        .args(["reveal", "--no-open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in champion select"));
}

#[test]
fn glitched_badge_out_of_range() {
    let server = mockito::Server::new();
    draftpilot(&server)
        .args(["badges", "glitched", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 5"));
}

#[test]
fn remove_all_friends_requires_confirmation() {
    let server = mockito::Server::new();
    draftpilot(&server)
        .args(["friends", "remove-all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn remove_all_friends_summary() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/lol-chat/v1/friends")
        .with_status(200)
        .with_body(r#"[{"pid":"a@pvp.net"},{"pid":"b@pvp.net"}]"#)
        .create();
    server
        .mock("DELETE", mockito::Matcher::Regex("^/lol-chat/v1/friends/.+".into()))
        .with_status(204)
        .expect(2)
        .create();

    draftpilot(&server)
        .args(["friends", "remove-all", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 of 2 friends"));
}

// ---------------------------------------------------------------------------
// draftpilot watch
// ---------------------------------------------------------------------------

#[test]
fn watch_accepts_commands_from_stdin() {
    let mut server = mockito::Server::new();
    with_champions(&mut server);

    draftpilot(&server)
        .arg("watch")
        .write_stdin("pick backup2 zed\npick ahri\nban yasou\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("pick backup2: Zed"))
        .stdout(predicate::str::contains("pick primary: Ahri"))
        .stdout(predicate::str::contains("Ahri (2nd: Zed)"))
        .stderr(predicate::str::contains("did you mean: Yasuo"));
}

#[test]
fn watch_uses_config_file() {
    let mut server = mockito::Server::new();
    with_champions(&mut server);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("draftpilot.yaml");
    std::fs::write(
        &path,
        "pick:\n  primary: Ahri\nban:\n  primary: Zed\noptions:\n  pre_hover: false\n",
    )
    .unwrap();

    draftpilot(&server)
        .arg("--config")
        .arg(&path)
        .args(["watch", "--json"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""display": "Zed""#))
        .stdout(predicate::str::contains(r#""pre_hover_enabled": false"#));
}

#[test]
fn bad_config_file_fails() {
    let server = mockito::Server::new();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "monitor: [not, a, map]\n").unwrap();

    draftpilot(&server)
        .arg("--config")
        .arg(&path)
        .arg("summoner")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn watch_clears_unknown_config_names() {
    let mut server = mockito::Server::new();
    with_champions(&mut server);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("draftpilot.yaml");
    std::fs::write(&path, "pick:\n  primary: Ahri\nban:\n  primary: Xyz\n").unwrap();

    let output = draftpilot(&server)
        .arg("--config")
        .arg(&path)
        .args(["watch", "--json"])
        .write_stdin("quit\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown champion cleared"), "{stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let start = stdout.find('{').unwrap();
    let status: serde_json::Value = serde_json::Deserializer::from_str(&stdout[start..])
        .into_iter::<serde_json::Value>()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(status["pick"]["enabled"], true);
    assert_eq!(status["ban"]["enabled"], false);
    assert_eq!(status["ban"]["primary"], "None");
}
