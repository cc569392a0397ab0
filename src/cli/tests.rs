//! Unit tests for CLI commands
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::cli::{run_cli, Cli, Commands};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["stackgen", "generate", "--templates", "tpl"]).unwrap();
    match cli.command {
        Commands::Generate {
            dir,
            templates,
            dry_run,
            skip_cleanup,
        } => {
            assert_eq!(dir, PathBuf::from("."));
            assert_eq!(templates, Some(PathBuf::from("tpl")));
            assert!(!dry_run);
            assert!(!skip_cleanup);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "stackgen",
        "lint",
        "--dir",
        "app",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();
    match cli.command {
        Commands::Lint {
            dir,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(dir, PathBuf::from("app"));
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_needle_requires_content() {
    assert!(Cli::try_parse_from(["stackgen", "needle", "--file", "pom.xml", "--needle", "x"]).is_err());
    let cli = Cli::try_parse_from([
        "stackgen",
        "needle",
        "--file",
        "pom.xml",
        "--needle",
        "maven-add-dependency",
        "--content",
        "<a/>",
        "<b/>",
    ])
    .unwrap();
    match cli.command {
        Commands::Needle { content, .. } => assert_eq!(content, vec!["<a/>", "<b/>"]),
        _ => panic!("Expected Needle command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["stackgen", "generate", "--dir", "app", "--dry-run", "--skip-cleanup"],
        vec!["stackgen", "lint"],
        vec!["stackgen", "needle", "-f", "a.xml", "-n", "x", "-c", "y"],
        vec!["stackgen", "cleanup", "--from-version", "6.0.0", "--dry-run"],
    ];
    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_needle_command_edits_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("logback-spring.xml");
    fs::write(&file, "<configuration>\n    <!-- jhipster-needle-logback-add-log -->\n</configuration>\n").unwrap();
    let args = [
        "stackgen".to_string(),
        "needle".to_string(),
        "--file".to_string(),
        file.display().to_string(),
        "--needle".to_string(),
        "logback-add-log".to_string(),
        "--content".to_string(),
        r#"<logger name="org.acme" level="DEBUG"/>"#.to_string(),
    ];
    run_cli(Cli::try_parse_from(&args).unwrap()).unwrap();
    run_cli(Cli::try_parse_from(&args).unwrap()).unwrap();
    let text = fs::read_to_string(&file).unwrap();
    assert_eq!(text.matches("org.acme").count(), 1);
}

#[test]
fn test_lint_fails_on_error_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".yo-rc.json"),
        r#"{ "generator-jhipster": { "packageName": "Not.Valid" } }"#,
    )
    .unwrap();
    let path = dir.path().display().to_string();
    let lenient = Cli::try_parse_from(["stackgen", "lint", "--dir", path.as_str()]).unwrap();
    assert!(run_cli(lenient).is_ok());
    let strict =
        Cli::try_parse_from(["stackgen", "lint", "--dir", path.as_str(), "--fail-on-error"]).unwrap();
    assert!(run_cli(strict).is_err());
}
