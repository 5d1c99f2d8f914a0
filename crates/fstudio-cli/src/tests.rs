use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["fstudio-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["fstudio-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn run_without_flags_uses_config_defaults() {
    let cli = Cli::try_parse_from(["fstudio-cli", "run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            pages: None,
            delay: None,
            dry_run: false
        })
    ));
}

#[test]
fn run_with_all_flags() {
    let cli = Cli::try_parse_from([
        "fstudio-cli",
        "run",
        "--pages",
        "3",
        "--delay",
        "0",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            pages: Some(3),
            delay: Some(0),
            dry_run: true
        })
    ));
}

#[test]
fn run_rejects_negative_pages() {
    let result = Cli::try_parse_from(["fstudio-cli", "run", "--pages", "-1"]);
    assert!(result.is_err());
}

#[test]
fn run_rejects_non_numeric_delay() {
    let result = Cli::try_parse_from(["fstudio-cli", "run", "--delay", "soon"]);
    assert!(result.is_err());
}

#[test]
fn db_requires_subcommand() {
    let result = Cli::try_parse_from(["fstudio-cli", "db"]);
    assert!(result.is_err());
}

#[test]
fn unknown_command_is_rejected() {
    let result = Cli::try_parse_from(["fstudio-cli", "collect"]);
    assert!(result.is_err());
}
