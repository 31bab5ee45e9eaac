#![cfg(unix)]

// End-to-end behavior of the tii binary: argument handling, environment
// switches, the package-manager check, and cache refresh over HTTP.
mod support;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::process::Output;
use tii::PackageIndex;

use support::{CatalogServer, Sandbox, sample_index};

fn run(mut cmd: std::process::Command) -> Result<Output> {
    cmd.output().context("failed to run tii")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_arguments_prints_help() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let output = run(sandbox.command())?;
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Instantly install command when not found"));
    assert!(text.contains("TII_DISABLE_INTERACTIVE"));
    Ok(())
}

#[test]
fn version_flag_prints_version() -> Result<()> {
    let sandbox = Sandbox::new()?;
    for flag in ["--version", "-v"] {
        let mut cmd = sandbox.command();
        cmd.arg(flag);
        let output = run(cmd)?;
        assert!(output.status.success());
        assert!(stdout(&output).starts_with("Tii "), "{flag} output: {}", stdout(&output));
    }
    Ok(())
}

#[test]
fn too_many_arguments_is_a_usage_error() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&sample_index())?;
    let mut cmd = sandbox.command();
    cmd.args(["fish", "cowsay"]);
    let output = run(cmd)?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));
    assert!(stdout(&output).contains("Usage"));
    assert!(sandbox.brew_invocation().is_none());
    Ok(())
}

#[test]
fn non_interactive_lookup_reports_without_installing() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&sample_index())?;
    let mut cmd = sandbox.command();
    cmd.arg("fish").env("TII_DISABLE_INTERACTIVE", "true");
    let output = run(cmd)?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("non-interactive mode"));
    assert!(text.contains("Found exact match"));
    assert!(sandbox.brew_invocation().is_none());
    Ok(())
}

#[test]
fn auto_install_runs_brew_through_shell() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&sample_index())?;
    let mut cmd = sandbox.command();
    cmd.arg("fish").env("TII_AUTO_INSTALL_EXACT_MATCHES", "true");
    let output = run(cmd)?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(sandbox.brew_invocation().as_deref(), Some("install fish"));
    Ok(())
}

#[test]
fn missing_brew_offers_homebrew_install() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&sample_index())?;
    sandbox.remove_stub("brew")?;
    let mut cmd = sandbox.command();
    cmd.arg("fish");
    let output = run(cmd)?;
    assert!(output.status.success());
    assert!(stderr(&output).contains("Homebrew is not installed"));
    assert!(stdout(&output).contains("Install Homebrew"));
    assert!(!stdout(&output).contains("Found exact match"));
    Ok(())
}

#[test]
fn corrupt_cache_fails_cleanly() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let store = sandbox.store();
    fs::create_dir_all(store.dir())?;
    fs::write(store.data_path(), "[1, 2")?;
    let mut cmd = sandbox.command();
    cmd.arg("fish");
    let output = run(cmd)?;
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("package cache"), "stderr: {err}");
    assert!(err.contains("--refresh-cache"));
    assert!(!err.contains("panicked"));
    Ok(())
}

#[test]
fn refresh_cache_fetches_both_listings() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&PackageIndex::from([("stale", "old entry")]))?;
    let formulae = json!([
        {"name": "fish", "desc": "User-friendly command-line shell"},
        {"name": "docker", "desc": "Pack, ship and run any application"}
    ]);
    let casks = json!([
        {"token": "docker", "name": ["Docker Desktop"], "desc": "App to build and share containers"},
        {"token": "iterm2", "name": ["iTerm2"], "desc": null}
    ]);
    let server = CatalogServer::start(
        vec![
            ("/formula.json", formulae.to_string()),
            ("/cask.json", casks.to_string()),
        ],
        2,
    )?;

    let mut cmd = sandbox.command();
    cmd.arg("--refresh-cache")
        .env("TII_FORMULA_URL", server.url("/formula.json"))
        .env("TII_CASK_URL", server.url("/cask.json"));
    let output = run(cmd)?;
    server.join();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Cache refreshed!"));

    let cached: Value = serde_json::from_str(&fs::read_to_string(sandbox.store().data_path())?)?;
    assert_eq!(
        cached,
        json!({
            "fish": "User-friendly command-line shell",
            "docker": "App to build and share containers",
            "iterm2": ""
        })
    );
    Ok(())
}

#[test]
fn refresh_keeps_formulae_when_casks_fail() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let formulae = json!([{"name": "fish", "desc": "shell"}]);
    let server = CatalogServer::start(vec![("/formula.json", formulae.to_string())], 2)?;

    let mut cmd = sandbox.command();
    cmd.arg("-r")
        .env("TII_FORMULA_URL", server.url("/formula.json"))
        .env("TII_CASK_URL", server.url("/cask.json"));
    let output = run(cmd)?;
    server.join();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("continuing with formulae only"));
    assert_eq!(sandbox.store().load()?.names(), vec!["fish"]);
    Ok(())
}

#[test]
fn strict_catalog_policy_fails_refresh_and_keeps_old_cache() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.seed_cache(&sample_index())?;
    let formulae = json!([{"name": "fish", "desc": "shell"}]);
    let server = CatalogServer::start(vec![("/formula.json", formulae.to_string())], 2)?;

    let mut cmd = sandbox.command();
    cmd.arg("--refresh-cache")
        .env("TII_ALLOW_PARTIAL_CATALOG", "false")
        .env("TII_FORMULA_URL", server.url("/formula.json"))
        .env("TII_CASK_URL", server.url("/cask.json"));
    let output = run(cmd)?;
    server.join();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cask"));
    assert_eq!(sandbox.store().load()?, sample_index());
    Ok(())
}
