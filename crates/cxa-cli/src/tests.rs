use super::*;

#[test]
fn parses_every_stage_command() {
    let cases = [
        ("collect", "Collect"),
        ("clean", "Clean"),
        ("preprocess", "Preprocess"),
        ("sentiment", "Sentiment"),
        ("themes", "Themes"),
        ("load", "Load"),
        ("report", "Report"),
        ("pipeline", "Pipeline"),
    ];

    for (arg, variant) in cases {
        let cli = Cli::try_parse_from(["cxa", arg]).expect("expected valid cli args");
        assert_eq!(format!("{:?}", cli.command), variant);
    }
}

#[test]
fn parses_load_command() {
    let cli = Cli::try_parse_from(["cxa", "load"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Load));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["cxa"]).is_err());
}

#[test]
fn stage_commands_take_no_arguments() {
    assert!(Cli::try_parse_from(["cxa", "collect", "--bank", "Dashen Bank"]).is_err());
    assert!(Cli::try_parse_from(["cxa", "report", "extra"]).is_err());
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["cxa", "migrate"]).is_err());
}
