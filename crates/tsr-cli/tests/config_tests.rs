use super::*;
use tempfile::TempDir;

#[test]
fn booleans_accept_strings() {
    let config = parse_config(r#"{ "reflectionEnabled": "off" }"#).unwrap();
    assert_eq!(config.reflection_enabled, Some(false));
    let config = parse_config(r#"{ "reflectionEnabled": " TRUE " }"#).unwrap();
    assert_eq!(config.reflection_enabled, Some(true));
    let config = parse_config(r#"{ "reflectionEnabled": false }"#).unwrap();
    assert_eq!(config.reflection_enabled, Some(false));
}

#[test]
fn invalid_boolean_string_is_an_error() {
    let err = parse_config(r#"{ "reflectionEnabled": "sometimes" }"#).unwrap_err();
    assert!(format!("{err:#}").contains("invalid boolean value: 'sometimes'"));
}

#[test]
fn enum_fields_use_lowercase_names() {
    let config = parse_config(
        r#"{ "packageLayout": "flat", "format": "json", "newLine": "crlf", "libraryName": "app" }"#,
    )
    .unwrap();
    assert_eq!(config.package_layout, Some(PackageLayout::Flat));
    assert_eq!(config.format, Some(OutputFormat::Json));
    assert_eq!(config.new_line, Some(NewLine::Crlf));
    assert_eq!(config.library_name.as_deref(), Some("app"));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(parse_config(r#"{ "reflection": true }"#).is_err());
}

#[test]
fn extends_merges_child_over_base() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("shared")).unwrap();
    std::fs::write(
        dir.path().join("shared/base.json"),
        r#"{ "libraryName": "base", "format": "json", "outFile": "out/meta.json" }"#,
    )
    .unwrap();
    let child = dir.path().join("tsrconfig.json");
    std::fs::write(
        &child,
        r#"{ "extends": "./shared/base", "libraryName": "child", "rootDir": "src" }"#,
    )
    .unwrap();

    let config = load_config(&child).unwrap();
    assert_eq!(config.library_name.as_deref(), Some("child"));
    assert_eq!(config.format, Some(OutputFormat::Json));
    assert_eq!(config.root_dir, Some(PathBuf::from("src")));
    // Relative to the file that set it.
    assert_eq!(
        config.out_file,
        Some(dir.path().join("shared").join("out/meta.json"))
    );
    assert_eq!(config.extends, None);
}

#[test]
fn extends_cycle_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.json"), r#"{ "extends": "./b" }"#).unwrap();
    std::fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

    let err = load_config(&dir.path().join("a.json")).unwrap_err();
    assert!(format!("{err:#}").contains("extends cycle"));
}

#[test]
fn missing_config_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");
    let err = discover_config(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read tsrconfig"));
}

#[test]
fn overrides_win_over_file_values() {
    let config = parse_config(
        r#"{ "libraryName": "file", "packageLayout": "flat", "format": "json", "rootDir": "src" }"#,
    )
    .unwrap();
    let overrides = Overrides {
        library_name: Some("cli".to_string()),
        format: Some(OutputFormat::Script),
        ..Overrides::default()
    };

    let resolved = ResolvedConfig::resolve(Some(config), overrides);
    assert!(resolved.enabled);
    assert_eq!(resolved.options.library_name, "cli");
    assert_eq!(resolved.options.package_layout, PackageLayout::Flat);
    assert_eq!(resolved.options.root_dir, Some(PathBuf::from("src")));
    assert_eq!(resolved.format, OutputFormat::Script);
    assert_eq!(resolved.out_file, None);
}

#[test]
fn defaults_without_a_config() {
    let resolved = ResolvedConfig::resolve(None, Overrides::default());
    assert!(resolved.enabled);
    assert_eq!(resolved.options, ReflectOptions::default());
    assert_eq!(resolved.format, OutputFormat::Script);
    assert_eq!(resolved.new_line, NewLine::Lf);
}
