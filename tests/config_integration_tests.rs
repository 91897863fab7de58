//! Loading grammar punctuation from TOML files
use std::io::Write;

use selector_schema::{Parser, Syntax};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_syntax_from_file_drives_parser() {
    let file = write_config("separator = ';'\nnegator = '~'\n");
    let syntax = Syntax::from_toml_file(file.path()).expect("load syntax");

    let parser = Parser::with_syntax(syntax.clone());
    let selector = parser.parse("@e[type=~pig;tag=a]").expect("parse");
    assert_eq!(selector.render(&syntax), "@e[type=~pig;tag=a]");
    assert_eq!(selector.to_string(), "@e[type=!pig,tag=a]");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("missing.toml");
    let err = Syntax::from_toml_file(&path).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_invalid_file_rejected() {
    let file = write_config("separator = ','\ndesignator = ','\n");
    assert!(Syntax::from_toml_file(file.path()).is_err());

    let file = write_config("separator = \"too long\"\n");
    assert!(Syntax::from_toml_file(file.path()).is_err());
}
