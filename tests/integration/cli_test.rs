use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mixopt"))
}

const SUBSTANCES: &str = r#"[
    {"name": "Cuke", "cost": 200, "defaultEffect": "Energizing"},
    {"name": "Banana", "cost": 200, "defaultEffect": "Gingeritis"},
    {"name": "Mega Bean", "cost": 700, "defaultEffect": "Foggy"}
]"#;

const EFFECTS: &str = r#"[
    {"name": "Calming", "multiplier": 0.2},
    {"name": "Energizing", "multiplier": 0.1},
    {"name": "Gingeritis", "multiplier": 0.2},
    {"name": "Thought-Provoking", "multiplier": 0.44},
    {"name": "Foggy", "multiplier": 0.36}
]"#;

const RULES: &str = r#"[
    {"substanceName": "Banana", "rules": [
        {"action": {"type": "replace", "target": "Energizing", "withEffect": "Thought-Provoking"},
         "condition": ["Energizing"], "ifNotPresent": []}
    ]},
    {"substanceName": "Nonexistent", "rules": []}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(substances: &str, rules: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("product.json"),
            r#"{"name": "OG Kush", "initialEffect": "Calming"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("substances.json"), substances).unwrap();
        fs::write(dir.path().join("effects.json"), EFFECTS).unwrap();
        fs::write(dir.path().join("rules.json"), rules).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn search(&self, max_depth: &str, extra: &[&str]) -> Output {
        Command::new(get_binary_path())
            .arg("search")
            .arg("--product")
            .arg(self.path("product.json"))
            .arg("--substances")
            .arg(self.path("substances.json"))
            .arg("--effects")
            .arg(self.path("effects.json"))
            .arg("--rules")
            .arg(self.path("rules.json"))
            .arg("--max-depth")
            .arg(max_depth)
            .args(extra)
            .output()
            .expect("Failed to execute mixopt")
    }
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_search_single_substance() {
    let fixture = Fixture::new(
        r#"[{"name": "Cuke", "cost": 200, "defaultEffect": "Energizing"}]"#,
        "[]",
    );
    let output = fixture.search("1", &[]);
    assert_success(&output);

    let result: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["mixArray"], serde_json::json!(["Cuke"]));
    assert_eq!(result["sellPriceCents"], 4550);
    assert_eq!(result["costCents"], 200);
    assert_eq!(result["profitCents"], 4350);
    assert_eq!(result["profit"], 43.5);
    assert_eq!(result["cancelled"], false);
}

#[test]
fn test_search_algorithms_agree() {
    let fixture = Fixture::new(SUBSTANCES, RULES);

    let dfs = fixture.search("3", &["--algorithm", "dfs"]);
    let bfs = fixture.search("3", &["--algorithm", "bfs", "--workers", "2", "--no-memo"]);
    assert_success(&dfs);
    assert_success(&bfs);

    let dfs: Value = serde_json::from_slice(&dfs.stdout).unwrap();
    let bfs: Value = serde_json::from_slice(&bfs.stdout).unwrap();
    assert_eq!(dfs["profitCents"], bfs["profitCents"]);
    assert_eq!(dfs["sellPriceCents"], bfs["sellPriceCents"]);

    let profit = dfs["profitCents"].as_i64().unwrap();
    let sell = dfs["sellPriceCents"].as_i64().unwrap();
    let cost = dfs["costCents"].as_i64().unwrap();
    assert_eq!(profit, sell - cost);
}

#[test]
fn test_search_writes_output_file() {
    let fixture = Fixture::new(SUBSTANCES, RULES);
    let out = fixture.path("result.json");

    let output = fixture.search("2", &["-o", out.to_str().unwrap(), "--progress"]);
    assert_success(&output);

    assert!(output.stdout.is_empty(), "result should go to the file only");
    let result = read_json(&out);
    assert!(result["mixArray"].as_array().is_some_and(|mix| !mix.is_empty()));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Progress: Depth"), "stderr: {}", stderr);
}

#[test]
fn test_search_rejects_invalid_depth() {
    let fixture = Fixture::new(SUBSTANCES, RULES);
    for depth in ["0", "17"] {
        let output = fixture.search(depth, &[]);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("max depth"), "stderr: {}", stderr);
    }
}

#[test]
fn test_search_reports_missing_file() {
    let fixture = Fixture::new(SUBSTANCES, RULES);
    fs::remove_file(fixture.path("effects.json")).unwrap();

    let output = fixture.search("2", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("effects.json"), "stderr: {}", stderr);
}

#[test]
fn test_search_rejects_unknown_rule_action() {
    let fixture = Fixture::new(
        SUBSTANCES,
        r#"[{"substanceName": "Cuke", "rules": [
            {"action": {"type": "swap", "target": "Calming"}, "condition": []}
        ]}]"#,
    );
    let output = fixture.search("2", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("swap"), "stderr: {}", stderr);
}

#[test]
fn test_search_verbose_prints_statistics() {
    let fixture = Fixture::new(SUBSTANCES, RULES);
    let output = fixture.search("3", &["--verbose"]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Search Statistics:"), "stderr: {}", stderr);
    assert!(stderr.contains("Mixes evaluated: 39"), "stderr: {}", stderr);
    assert!(stderr.contains("Best mix so far"), "stderr: {}", stderr);
}
