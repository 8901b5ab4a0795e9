//! Integration test: load a specification and a fixture tree from disk.
//!
//! Mirrors the layout the `speccheck` binary expects: an `openrpc.json`
//! next to a `tests/` directory with one sub-directory per method.

use std::fs;
use std::path::Path;

use regex::Regex;
use rpcspec_loader::{load_corpus, load_spec, CorpusLoadError, SpecLoadError};

const SPEC: &str = r##"{
  "openrpc": "1.2.4",
  "info": {"title": "calculator", "version": "1.0.0"},
  "methods": [
    {
      "name": "sum",
      "params": [
        {"name": "a", "required": true, "schema": {"$ref": "#/components/schemas/Int"}},
        {"name": "b", "required": true, "schema": {"$ref": "#/components/schemas/Int"}}
      ],
      "result": {"name": "total", "schema": {"$ref": "#/components/schemas/Int"}}
    }
  ],
  "components": {"schemas": {"Int": {"type": "integer"}}}
}"##;

const SPEC_YAML: &str = r#"
openrpc: 1.2.4
methods:
  - name: greet
    params:
      - name: greeting
        required: true
        schema:
          type: string
      - name: loud
        schema:
          type: boolean
    result:
      name: reply
      schema:
        type: string
"#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let tests = dir.path().join("tests");
    write(
        &tests.join("sum").join("sum-simple.io"),
        ">> {\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"sum\",\"params\":[1,2]}\n<< {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":3}\n",
    );
    write(
        &tests.join("sum").join("sum-invalid-string.io"),
        "// strings are rejected\n>> {\"method\":\"sum\",\"params\":[1,\"two\"]}\n<< {\"error\":{\"code\":-32602,\"message\":\"invalid argument 1\"}}\n",
    );
    write(
        &tests.join("greet").join("greet-short.io"),
        ">> {\"method\":\"greet\",\"params\":[\"hi\"]}\n<< {\"result\":\"hi\"}\n",
    );
    write(&tests.join("README.md"), "not a fixture\n");
    dir
}

#[test]
fn test_load_json_spec_with_component_refs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openrpc.json");
    write(&path, SPEC);

    let registry = load_spec(&path).unwrap();
    let sum = registry.lookup("sum").unwrap();
    assert_eq!(sum.params.len(), 2);
    assert_eq!(sum.params[0].schema["type"], "integer");
    assert_eq!(sum.result.schema["type"], "integer");
}

#[test]
fn test_load_yaml_spec() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openrpc.yaml");
    write(&path, SPEC_YAML);

    let registry = load_spec(&path).unwrap();
    let greet = registry.lookup("greet").unwrap();
    assert!(greet.params[0].required);
    assert!(!greet.params[1].required);
}

#[test]
fn test_missing_spec_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_spec(&dir.path().join("openrpc.json")).unwrap_err();
    assert!(matches!(err, SpecLoadError::Io { .. }), "got: {err}");
}

#[test]
fn test_malformed_spec_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openrpc.json");
    write(&path, "{\"methods\": [");
    let err = load_spec(&path).unwrap_err();
    assert!(matches!(err, SpecLoadError::Parse { .. }), "got: {err}");
}

#[test]
fn test_corpus_loaded_in_sorted_order() {
    let dir = fixture_tree();
    let rts = load_corpus(&dir.path().join("tests"), None).unwrap();

    let names: Vec<&str> = rts.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        ["greet/greet-short", "sum/sum-invalid-string", "sum/sum-simple"]
    );
    assert!(rts[1].expect_invalid);
    assert!(rts[1].response.is_error_only());
    assert_eq!(rts[2].params[1].as_str(), "2");
}

#[test]
fn test_corpus_filter_selects_by_name() {
    let dir = fixture_tree();
    let re = Regex::new("^sum/").unwrap();
    let rts = load_corpus(&dir.path().join("tests"), Some(&re)).unwrap();
    assert_eq!(rts.len(), 2);
    assert!(rts.iter().all(|r| r.method == "sum"));
}

#[test]
fn test_missing_corpus_root() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_corpus(&dir.path().join("nope"), None).unwrap_err();
    assert!(matches!(err, CorpusLoadError::MissingRoot { .. }));
}

#[test]
fn test_malformed_fixture_reports_path_and_line() {
    let dir = fixture_tree();
    let tests = dir.path().join("tests");
    write(&tests.join("sum").join("sum-broken.io"), "\n\n<< {\"result\":3}\n");

    let err = load_corpus(&tests, None).unwrap_err();
    match &err {
        CorpusLoadError::Fixture { path, source } => {
            assert!(path.ends_with("sum-broken.io"));
            assert_eq!(source.line, 3);
        }
        other => panic!("Expected Fixture error, got: {other}"),
    }
}
