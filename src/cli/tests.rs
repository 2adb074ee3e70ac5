use super::*;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["geminal"]);
    assert!(args.command.is_none());
    assert!(!args.session.no_search);
}

#[test]
fn global_flags_parse_after_subcommand() {
    let args = parse_args(&["geminal", "chat", "-m", "gemini-2.5-flash", "-t", "1.2", "--no-search"]);
    assert_eq!(args.command, Some(Commands::Chat));
    assert_eq!(args.session.model.as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(args.session.temperature, Some(1.2));
    assert!(args.session.no_search);
}

#[test]
fn out_of_range_temperature_is_rejected() {
    assert!(Args::try_parse_from(["geminal", "-t", "3"]).is_err());
    assert!(Args::try_parse_from(["geminal", "-t", "warm"]).is_err());
}

#[test]
fn say_joins_prompt_words() {
    let args = parse_args(&["geminal", "say", "what", "is", "-1", "squared"]);
    match args.command {
        Some(Commands::Say { prompt }) => assert_eq!(prompt.join(" "), "what is -1 squared"),
        other => panic!("expected say, got {other:?}"),
    }
}

#[test]
fn say_requires_a_prompt() {
    assert!(Args::try_parse_from(["geminal", "say"]).is_err());
}

#[test]
fn set_collects_multi_word_values() {
    let args = parse_args(&["geminal", "set", "system-prompt", "Be", "brief."]);
    assert_eq!(
        args.command,
        Some(Commands::Set {
            key: "system-prompt".into(),
            value: vec!["Be".into(), "brief.".into()],
        })
    );
}

#[test]
fn defaults_apply_without_flags_or_config() {
    let (model, base_url, settings) =
        resolve_session_settings(&SessionArgs::default(), &Config::default(), None);
    assert_eq!(model, DEFAULT_MODEL);
    assert_eq!(base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.temperature, DEFAULT_TEMPERATURE);
    assert!(settings.search);
}

#[test]
fn flags_override_env_and_config() {
    let mut config = Config::default();
    config
        .set_value("model", "config-model")
        .expect("set model");
    config.set_value("temperature", "0.2").expect("set temp");
    config
        .set_value("base-url", "https://config.example/v1")
        .expect("set url");

    let (model, base_url, settings) =
        resolve_session_settings(&SessionArgs::default(), &config, None);
    assert_eq!(model, "config-model");
    assert_eq!(base_url, "https://config.example/v1");
    assert_eq!(settings.temperature, 0.2);

    let args = SessionArgs {
        model: Some("flag-model".into()),
        temperature: Some(1.5),
        no_search: true,
        log: None,
    };
    let (model, base_url, settings) =
        resolve_session_settings(&args, &config, Some("https://env.example/v1".into()));
    assert_eq!(model, "flag-model");
    assert_eq!(base_url, "https://env.example/v1");
    assert_eq!(settings.temperature, 1.5);
    assert!(!settings.search);
}

#[test]
fn blank_env_base_url_falls_back_to_config() {
    let (_, base_url, _) =
        resolve_session_settings(&SessionArgs::default(), &Config::default(), Some("  ".into()));
    assert_eq!(base_url, DEFAULT_BASE_URL);
}
