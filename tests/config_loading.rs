// tests/config_loading.rs

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use miniflow::cli::CliArgs;
use miniflow::config::load_and_validate;
use miniflow::dag::TaskState;
use miniflow::errors::MiniflowError;
use miniflow::render::Theme;
use miniflow::resolve_config;
use miniflow::types::ThemeName;
use miniflow_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_loads_and_compiles() {
    let file = write_config(
        r##"
[config]
tick_ms = 250
theme = "demo"
max_rounds = 3

[theme]
succeed_fill = "#123456"

[graph]
lines = [
    "a => b => c",
    "b &",
    "  c => d",
]
"##,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.tick_ms, 250);
    assert_eq!(cfg.config.theme, ThemeName::Demo);
    assert_eq!(cfg.config.max_rounds, 3);
    assert_eq!(cfg.theme.get("succeed_fill").map(String::as_str), Some("#123456"));

    let graph = cfg.compiled_graph();
    assert_eq!(graph.tasks().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    assert_eq!(graph.dependencies_of("d"), ["b", "c"]);
}

#[test]
fn defaults_apply_to_missing_sections() {
    let cfg = ConfigFileBuilder::new().with_line("a => b").build();
    assert_eq!(cfg.config.tick_ms, 3000);
    assert_eq!(cfg.config.theme, ThemeName::Default);
    assert_eq!(cfg.config.max_rounds, 0);
}

#[test]
fn missing_graph_is_a_config_error() {
    let file = write_config("[config]\ntick_ms = 10\n");
    match load_and_validate(file.path()) {
        Err(MiniflowError::ConfigError(msg)) => assert!(msg.contains("[graph].lines")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_tick_is_a_config_error() {
    let raw = ConfigFileBuilder::new()
        .with_line("a => b")
        .with_tick_ms(0)
        .raw();
    match miniflow::config::ConfigFile::try_from(raw) {
        Err(MiniflowError::ConfigError(msg)) => assert!(msg.contains("tick_ms")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn bad_condition_is_a_parse_error() {
    let file = write_config("[graph]\nlines = [\"a => b\", \"~a => c\"]\n");
    match load_and_validate(file.path()) {
        Err(MiniflowError::Parse(err)) => assert!(err.to_string().contains('~')),
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn cycles_load_fine() {
    let cfg = ConfigFileBuilder::new()
        .with_line("a => b")
        .with_line("b => a")
        .build();
    assert!(cfg.compiled_graph().cycle_member().is_some());
}

#[test]
fn theme_overrides_layer_over_the_named_theme() {
    let cfg = ConfigFileBuilder::new()
        .with_line("a => b")
        .with_theme("demo")
        .with_theme_override("running_fill", "#123456")
        .with_max_rounds(2)
        .build();
    assert_eq!(cfg.config.theme, ThemeName::Demo);
    assert_eq!(cfg.config.max_rounds, 2);

    let theme = Theme::named(&cfg.config.theme).with_overrides(&cfg.theme);
    assert_eq!(theme.style_for(TaskState::Running).fill, "#123456");
    assert_eq!(theme.style_for(TaskState::Succeeded).fill, "#aabbff");
    // Unset by both the demo theme and the overrides.
    assert_eq!(theme.style_for(TaskState::Waiting).fill, "none");
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let file = write_config("[graph\nlines = 1");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(MiniflowError::TomlError(_))
    ));
}

#[test]
fn cli_flags_override_the_config_file() {
    let file = write_config("[config]\ntick_ms = 50\n\n[graph]\nlines = [\"x => y\"]\n");
    let path = file.path().to_string_lossy().to_string();

    let args = CliArgs::parse_from([
        "miniflow",
        "--config",
        path.as_str(),
        "--graph",
        "a => b // b => c",
        "--theme",
        "demo",
        "--rounds",
        "2",
    ]);
    let cfg = resolve_config(&args).unwrap();

    assert_eq!(cfg.config.tick_ms, 50);
    assert_eq!(cfg.config.theme, ThemeName::Demo);
    assert_eq!(cfg.config.max_rounds, 2);
    assert_eq!(
        cfg.compiled_graph().tasks().collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
}

#[test]
fn inline_graph_needs_no_config_file() {
    let args = CliArgs::parse_from(["miniflow", "--graph", "a=>b", "--tick-ms", "5"]);
    let cfg = resolve_config(&args).unwrap();
    assert_eq!(cfg.config.tick_ms, 5);
    assert_eq!(cfg.compiled_graph().edges().len(), 1);
}
