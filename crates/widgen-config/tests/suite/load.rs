use std::path::PathBuf;

use widgen_config::{ConfigError, NullabilityOverride, QuirkValue, WidgenConfig};

#[test]
fn empty_document_is_default() {
    assert_eq!(WidgenConfig::from_toml_str("").unwrap(), WidgenConfig::default());
}

#[test]
fn parses_every_section() {
    let config = WidgenConfig::from_toml_str(
        r#"
root = "android.view.View"
archives = ["libs/widgets.jar"]
classpath = ["/sdk/android.jar"]

[output]
path = "src/main/java/com/example/Dsl.java"
package = "com.example"
class_name = "Dsl"
header = ["Generated."]

[runtime]
construct = "com.example.runtime.Dsl.v"
nullable_annotation = "androidx.annotation.Nullable"

[nullability]
nullable_annotations = ["Nullable"]
overrides = { "android.widget.TextView#setText(java.lang.CharSequence)" = "nullable", "android.view.View#setTag" = "non-null" }

[quirks."android.widget.TextView"]
"setText:CharSequence" = "v.setText((CharSequence) arg); return true;"
setFilters = false

[quirks."android.widget.ListView"]
__classAlias = "list"

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    assert_eq!(config.root.as_deref(), Some("android.view.View"));
    assert_eq!(config.archives, [PathBuf::from("libs/widgets.jar")]);
    assert_eq!(config.output.class_name.as_deref(), Some("Dsl"));
    assert_eq!(config.output.header, Some(vec!["Generated.".to_string()]));
    assert_eq!(
        config.runtime.construct.as_deref(),
        Some("com.example.runtime.Dsl.v")
    );
    assert_eq!(config.runtime.render, None);
    assert_eq!(
        config.nullability.overrides["android.view.View#setTag"],
        NullabilityOverride::NonNull
    );

    let text_view = &config.quirks["android.widget.TextView"];
    assert_eq!(text_view["setFilters"], QuirkValue::Flag(false));
    assert_eq!(
        text_view["setText:CharSequence"],
        QuirkValue::Code("v.setText((CharSequence) arg); return true;".to_string())
    );
    assert!(config.logging.json);
    assert!(config.logging.stderr);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = WidgenConfig::from_toml_str("[output]\nclassname = \"Dsl\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    assert!(err.to_string().contains("classname"), "{err}");
}

#[test]
fn quirk_values_are_validated() {
    let err = WidgenConfig::from_toml_str("[quirks.\"a.B\"]\nsetX = true\n").unwrap_err();
    assert!(
        matches!(&err, ConfigError::Invalid { key, .. } if key == "quirks.\"a.B\".setX"),
        "{err}"
    );

    let err = WidgenConfig::from_toml_str("[quirks.\"a.B\"]\n__classAlias = \"two words\"\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");

    WidgenConfig::from_toml_str("[quirks.\"a.B\"]\n__classAlias = false\n").unwrap();
}

#[test]
fn relative_paths_resolve_against_the_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widgen.toml");
    std::fs::write(
        &path,
        "archives = [\"libs/a.jar\", \"/abs/b.jar\"]\nclasspath = [\"sdk.jar\"]\n[output]\npath = \"out/Dsl.java\"\n",
    )
    .unwrap();

    let config = WidgenConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config.archives,
        [dir.path().join("libs/a.jar"), PathBuf::from("/abs/b.jar")]
    );
    assert_eq!(config.classpath, [dir.path().join("sdk.jar")]);
    assert_eq!(config.output.path, Some(dir.path().join("out/Dsl.java")));
}

#[test]
fn load_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let err = WidgenConfig::load_from_path(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("missing.toml"));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "root = [").unwrap();
    let err = WidgenConfig::load_from_path(&broken).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
