// codemend-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use codemend_core::config::{self, MendConfig};
use codemend_core::{rewrite_text, PassKind};

fn write_yaml(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_default_config() {
    let config = MendConfig::load_default().unwrap();
    assert!(config.debug_log.exclude_files.iter().any(|f| f == "utils/logger.ts"));
    assert!(config.selector.exclude_dirs.iter().any(|d| d == "node_modules"));
    assert!(config.repair.targets.is_empty());
    assert_eq!(
        config.debug_log.logger_import,
        "import { Logger } from '../utils/logger';"
    );
}

#[test]
fn test_partial_user_file_merges_over_defaults() -> Result<()> {
    let file = write_yaml(
        r#"
selector:
  root: ./app
debug_log:
  logger_import: "import { Logger } from '@app/logging';"
repair:
  targets:
    - src/geometry.ts
"#,
    )?;
    let config = MendConfig::load_effective(Some(file.path()))?;

    assert_eq!(config.selector.root, Some(PathBuf::from("./app")));
    assert_eq!(config.selector.extensions, vec!["ts", "tsx"]);
    assert_eq!(config.debug_log.logger_import, "import { Logger } from '@app/logging';");
    assert_eq!(
        config.debug_log.logger_field,
        "private logger = new Logger('{class}');"
    );
    assert_eq!(config.repair.targets, vec![PathBuf::from("src/geometry.ts")]);
    Ok(())
}

#[test]
fn test_user_builtins_change_guarding() -> Result<()> {
    let file = write_yaml(
        r#"
optional_access:
  builtin_namespaces:
    - repo
"#,
    )?;
    let config = MendConfig::load_effective(Some(file.path()))?;
    assert_eq!(
        rewrite_text(PassKind::OptionalAccess, &config, "repo.save(x);")?,
        "repo.save(x);"
    );
    assert_eq!(
        rewrite_text(PassKind::OptionalAccess, &config, "Math.max(a, b);")?,
        "Math?.max(a, b);"
    );
    Ok(())
}

#[test]
fn test_invalid_user_config_is_rejected() -> Result<()> {
    let file = write_yaml(
        r#"
error_cast:
  catch_variable: "not an identifier"
"#,
    )?;
    let err = MendConfig::load_effective(Some(file.path())).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("catch_variable"));
    Ok(())
}

#[test]
fn test_unparseable_file_reports_its_path() -> Result<()> {
    let file = write_yaml("selector: [this is not a map")?;
    let err = MendConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_merge_without_user_config_keeps_defaults() {
    let defaults = MendConfig::load_default().unwrap();
    assert_eq!(config::merge_config(defaults.clone(), None), defaults);
}
