use std::path::PathBuf;

use anyhow::Result;

use super::build;
use super::log_dir_from;
use super::log_path;

#[test]
fn it_parses_headless_edits() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "lumina",
        "edit",
        "-i",
        "./before.png",
        "--image",
        "./style.png",
        "-p",
        "Convert to a watercolor painting",
        "-o",
        "./after.png",
    ])?;

    let edit_matches = match matches.subcommand() {
        Some(("edit", edit_matches)) => edit_matches,
        _ => panic!("expected the edit subcommand"),
    };

    let images = edit_matches
        .get_many::<String>("image")
        .unwrap()
        .cloned()
        .collect::<Vec<String>>();
    assert_eq!(images, vec!["./before.png", "./style.png"]);
    assert_eq!(
        edit_matches.get_one::<String>("prompt").unwrap(),
        "Convert to a watercolor painting"
    );
    assert_eq!(edit_matches.get_one::<String>("output").unwrap(), "./after.png");

    return Ok(());
}

#[test]
fn it_requires_images_and_prompt_for_headless_edits() {
    let res = build().try_get_matches_from(vec!["lumina", "edit", "-p", "Add a glow"]);
    assert!(res.is_err());

    let res = build().try_get_matches_from(vec!["lumina", "edit", "-i", "./before.png"]);
    assert!(res.is_err());
}

#[test]
fn it_accepts_global_config_args_on_edit() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "lumina",
        "edit",
        "-i",
        "./before.png",
        "-p",
        "Add a glow",
        "--request-timeout",
        "30000",
    ])?;

    let edit_matches = match matches.subcommand() {
        Some(("edit", edit_matches)) => edit_matches,
        _ => panic!("expected the edit subcommand"),
    };
    assert_eq!(
        edit_matches.get_one::<String>("request-timeout").unwrap(),
        "30000"
    );

    return Ok(());
}

#[test]
fn it_rejects_unknown_backends() {
    let res = build().try_get_matches_from(vec!["lumina", "--backend", "dall-e"]);
    assert!(res.is_err());
}

#[test]
fn it_logs_to_cache_dir() {
    assert!(log_dir_from(None).ends_with("lumina"));
    assert!(log_dir_from(Some("".to_string())).ends_with("lumina"));
    assert!(log_path().ends_with("debug.log"));
}

#[test]
fn it_logs_to_overridden_dir() {
    assert_eq!(
        log_dir_from(Some("/tmp/lumina-logs".to_string())),
        PathBuf::from("/tmp/lumina-logs")
    );
}
