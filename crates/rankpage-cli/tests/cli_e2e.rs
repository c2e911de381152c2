use std::path::PathBuf;
use std::process::{Command, Output};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("canonicalize repo root")
}

fn rankpage_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rankpage"))
}

fn demo(name: &str) -> PathBuf {
    repo_root().join("demos").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(rankpage_bin())
        .args(args)
        .output()
        .expect("run rankpage")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "rankpage failed:\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn info_reports_domains_and_total_count() {
    let model = demo("pets.json");
    let out = stdout(&run(&["info", "--data", model.to_str().unwrap(), "--json"]));
    let info: serde_json::Value = serde_json::from_str(&out).expect("info json");
    assert_eq!(info["answer"], "species");
    assert_eq!(info["rows"], 5);
    assert_eq!(info["total_count"], 10_800);
}

#[test]
fn navigate_ranks_with_query_and_toggles() {
    let model = demo("pets.json");
    let out = stdout(&run(&[
        "navigate",
        "--data",
        model.to_str().unwrap(),
        "--query",
        "size=large",
        "--toggle",
        "legs=4",
        "--format",
        "json",
    ]));
    let view: serde_json::Value = serde_json::from_str(&out).expect("view json");
    assert_eq!(view["phase"], "filtered");
    let entities: Vec<&str> = view["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["entity"].as_str().unwrap())
        .collect();
    assert_eq!(entities, vec!["horse", "dog", "cat", "goldfish", "parrot"]);
    assert_eq!(view["results"][1]["percent"], 83);
}

#[test]
fn toggling_the_same_value_twice_returns_to_unfiltered() {
    let model = demo("pets.json");
    let out = stdout(&run(&[
        "navigate",
        "--data",
        model.to_str().unwrap(),
        "--toggle",
        "size=small",
        "--toggle",
        "size=small",
        "--format",
        "json",
    ]));
    let view: serde_json::Value = serde_json::from_str(&out).expect("view json");
    assert_eq!(view["phase"], "unfiltered");
    assert!(view["results"][0]["percent"].is_null());
}

#[test]
fn bundle_then_navigate_rows_model_as_html() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("out/pets.bundle.json");
    let model = demo("pets.json");
    let translation = demo("pets.pl.json");

    stdout(&run(&[
        "bundle",
        "--data",
        model.to_str().unwrap(),
        "--translation",
        translation.to_str().unwrap(),
        "--out",
        bundle.to_str().unwrap(),
    ]));
    assert!(bundle.exists());

    let page = stdout(&run(&[
        "navigate",
        "--data",
        bundle.to_str().unwrap(),
        "--mode",
        "rows",
        "--query",
        "size=small",
        "--format",
        "html",
    ]));
    assert!(page.contains("<h1>Which pet?</h1>"));
    assert!(page.contains("<th>Parametry:</th>"));
    assert!(page.contains("<th>Wyniki:</th>"));
    assert!(page.contains("<tr> <td><a href=\"pages/cat.html\">cat</a></td> <td></td> "));
    assert!(page.contains("<tr> <td>goldfish</td> <td></td> </tr>"));
    assert!(!page.contains("horse"));
    assert!(page.contains(" / "));
}

#[test]
fn generate_writes_every_linked_page() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("site");
    let model = demo("pets.json");

    stdout(&run(&[
        "generate",
        "--data",
        model.to_str().unwrap(),
        "--outdir",
        outdir.to_str().unwrap(),
    ]));

    let index = std::fs::read_to_string(outdir.join("index.html")).unwrap();
    assert!(index.contains("<title>Which pet?</title>"));
    assert!(index.contains("<a href=\"pages/match_3.html\">horse</a>"));
    for n in 0..5 {
        assert!(outdir.join(format!("pages/match_{n}.html")).exists());
    }
    for n in 0..4 {
        assert!(outdir.join(format!("pages/category_{n}.html")).exists());
    }

    let page = stdout(&run(&[
        "navigate",
        "--data",
        outdir.join("bundle.json").to_str().unwrap(),
        "--query",
        "size=small",
        "--format",
        "html",
    ]));
    assert!(page.contains("<a href=\"pages/category_0.html\">size</a>"));
    assert!(page.contains("<a href=\"pages/match_0.html\">cat</a>"));
}

#[test]
fn unknown_toggle_attribute_is_reported_not_fatal() {
    let model = demo("pets.json");
    let out = stdout(&run(&[
        "navigate",
        "--data",
        model.to_str().unwrap(),
        "--query",
        "wings=2",
    ]));
    assert!(out.contains("ignored: wings=2 (unknown attribute)"));
}

#[test]
fn toggling_the_answer_attribute_fails() {
    let model = demo("pets.json");
    let output = run(&[
        "navigate",
        "--data",
        model.to_str().unwrap(),
        "--toggle",
        "species=cat",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("species"), "stderr: {stderr}");
}

#[test]
fn missing_data_file_fails() {
    let output = run(&["info", "--data", "/nonexistent/model.json"]);
    assert!(!output.status.success());
}
