//! Integration tests for the rp-cli binary commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn rp() -> Command {
    Command::cargo_bin("rp").unwrap()
}

/// Names of the countries generated for a seed, in store order.
fn country_names(countries: usize, seed: u64) -> Vec<String> {
    let output = rp()
        .args([
            "inspect",
            "-c",
            &countries.to_string(),
            "-s",
            &seed.to_string(),
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_summary_and_table() {
    rp().args(["simulate", "-c", "3", "-t", "20", "-s", "7"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulation")
                .and(predicate::str::contains("3 countries simulated"))
                .and(predicate::str::contains("Country Status"))
                .and(predicate::str::contains("units produced")),
        );
}

#[test]
fn simulate_verbose_shows_event_log() {
    rp().args(["simulate", "-c", "4", "-t", "15", "-s", "3", "--verbose"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Event Log")
                .and(predicate::str::contains("[tick"))
                .and(predicate::str::contains("Generated 4 countries")),
        );
}

#[test]
fn simulate_accepts_add_loot_policy() {
    rp().args(["simulate", "-c", "2", "-t", "5", "--loot", "add"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loot=add"));
}

#[test]
fn simulate_rejects_unknown_loot_policy() {
    rp().args(["simulate", "--loot", "steal"])
        .assert()
        .failure();
}

#[test]
fn simulate_zero_countries_fails() {
    rp().args(["simulate", "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn simulate_is_deterministic_for_a_seed() {
    let run = || {
        rp().args(["simulate", "-c", "4", "-t", "30", "-s", "21"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_table_lists_countries_and_relations() {
    let names = country_names(3, 5);
    rp().args(["inspect", "-c", "3", "-s", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Ideology")
                .and(predicate::str::contains("Relations"))
                .and(predicate::str::contains(names[0].as_str()))
                .and(predicate::str::contains(names[2].as_str())),
        );
}

#[test]
fn inspect_json_has_full_country_records() {
    let output = rp()
        .args(["inspect", "-c", "4", "-s", "9", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let countries = value.as_array().unwrap();
    assert_eq!(countries.len(), 4);
    for country in countries {
        assert_eq!(country["isAnnihilated"], false);
        assert_eq!(country["relations"].as_object().unwrap().len(), 3);
        assert!(country["wars"].as_object().unwrap().is_empty());
        assert!(country["economy"].as_f64().unwrap() >= 0.0);
    }
}

#[test]
fn inspect_names_are_unique() {
    let mut names = country_names(12, 2);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 12);
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_starts_with_country_list() {
    let output = rp()
        .args(["run", "-c", "3", "-s", "4", "--seconds", "1", "--interval-ms", "50"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["type"], "country_list");
    assert_eq!(first["countries"].as_array().unwrap().len(), 3);
    assert!(String::from_utf8(output.stderr).unwrap().contains("Stopped"));
}

#[test]
fn run_streams_forced_war_declaration() {
    let names = country_names(3, 8);
    let war = format!("{}:{}", names[0], names[1]);
    rp().args([
        "run",
        "-c",
        "3",
        "-s",
        "8",
        "--seconds",
        "1",
        "--interval-ms",
        "50",
        "--war",
        &war,
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("\"type\":\"war_declaration\"").and(predicate::str::contains(
            format!("{} has declared war on {}!", names[0], names[1]),
        )),
    );
}

#[test]
fn run_follow_streams_updates_for_one_country() {
    let names = country_names(3, 6);
    let output = rp()
        .args([
            "run",
            "-c",
            "3",
            "-s",
            "6",
            "--seconds",
            "1",
            "--interval-ms",
            "20",
            "--follow",
            &names[1],
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let updates: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .filter(|v| v["type"] == "country_update")
        .collect();
    assert!(!updates.is_empty());
    let id = &updates[0]["country"]["id"];
    assert!(updates.iter().all(|u| &u["country"]["id"] == id));
}

#[test]
fn run_without_follow_hides_per_tick_updates() {
    rp().args(["run", "-c", "3", "--seconds", "1", "--interval-ms", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("country_update").not());
}

#[test]
fn run_unknown_follow_target_fails() {
    rp().args(["run", "-c", "3", "--seconds", "1", "--follow", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown country"));
}

#[test]
fn run_rejects_non_finite_funds() {
    let names = country_names(2, 42);
    let fund = format!("{}=inf", names[0]);
    rp().args(["run", "-c", "2", "--seconds", "1", "--fund", &fund])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot add funds"));
}
