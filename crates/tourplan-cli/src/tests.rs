use clap::Parser;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tourplan-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_show_with_user() {
    let cli = Cli::try_parse_from(["tourplan-cli", "show", "--user", "u1"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Show)));
    assert_eq!(cli.user.as_deref(), Some("u1"));
}

#[test]
fn parses_add_city() {
    let cli = Cli::try_parse_from([
        "tourplan-cli",
        "add-city",
        "--id",
        "c1",
        "--name",
        "Jaipur",
        "--state-id",
        "s1",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::AddCity {
            ref id,
            name: Some(ref name),
            state_id: Some(ref state_id),
            state: None,
        }) if id == "c1" && name == "Jaipur" && state_id == "s1"
    ));
}

#[test]
fn add_state_requires_id() {
    let result = Cli::try_parse_from(["tourplan-cli", "add-state", "--name", "Goa"]);
    assert!(result.is_err());
}

#[test]
fn update_accepts_day_within_cap() {
    let cli = Cli::try_parse_from(["tourplan-cli", "update", "city:c1", "--day", "10"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Update(UpdateArgs { day: Some(10), .. }))
    ));
}

#[test]
fn update_rejects_day_out_of_range() {
    for day in ["0", "11"] {
        let result = Cli::try_parse_from(["tourplan-cli", "update", "city:c1", "--day", day]);
        assert!(result.is_err(), "day {day} should be rejected");
    }
}

#[test]
fn update_parses_date() {
    let cli = Cli::try_parse_from(["tourplan-cli", "update", "place:p1", "--date", "2025-03-14"])
        .unwrap();
    let Some(Commands::Update(args)) = cli.command else {
        panic!("expected update command");
    };
    assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2025, 3, 14));
}

#[test]
fn update_rejects_date_with_clear_date() {
    let result = Cli::try_parse_from([
        "tourplan-cli",
        "update",
        "place:p1",
        "--date",
        "2025-03-14",
        "--clear-date",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_note_and_clear() {
    let cli = Cli::try_parse_from(["tourplan-cli", "note", "Honeymoon"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Note { ref text }) if text == "Honeymoon"));

    let cli = Cli::try_parse_from(["tourplan-cli", "clear"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Clear)));
}
