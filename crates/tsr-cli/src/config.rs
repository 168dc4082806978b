//! `tsrconfig.json` loading.
//!
//! Every field is optional. A config may `extends` another file; the child's
//! values win field by field. Command-line flags are applied last, in
//! [`ResolvedConfig::resolve`].

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tsr_reflect::{DEFAULT_LIBRARY, NewLine, PackageLayout, ReflectOptions};

pub const CONFIG_FILE_NAME: &str = "tsrconfig.json";

fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Script,
    Json,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TsrConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub reflection_enabled: Option<bool>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub package_layout: Option<PackageLayout>,
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub new_line: Option<NewLine>,
}

impl TsrConfig {
    /// Field-by-field merge; values in `self` win.
    fn over(self, base: Self) -> Self {
        Self {
            extends: None,
            reflection_enabled: self.reflection_enabled.or(base.reflection_enabled),
            library_name: self.library_name.or(base.library_name),
            package_layout: self.package_layout.or(base.package_layout),
            root_dir: self.root_dir.or(base.root_dir),
            out_file: self.out_file.or(base.out_file),
            format: self.format.or(base.format),
            new_line: self.new_line.or(base.new_line),
        }
    }

    /// Resolve a relative `outFile` against `dir`. `rootDir` is compared
    /// with program file names as written, so it is left alone.
    fn rebase(mut self, dir: &Path) -> Self {
        self.out_file = self.out_file.map(|path| {
            if path.is_absolute() || dir.as_os_str().is_empty() {
                path
            } else {
                dir.join(path)
            }
        });
        self
    }
}

pub fn parse_config(source: &str) -> Result<TsrConfig> {
    serde_json::from_str(source).context("failed to parse tsrconfig JSON")
}

/// Load `path` and everything it `extends`. An `outFile` is resolved
/// against the directory of the file that names it.
pub fn load_config(path: &Path) -> Result<TsrConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsrConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsrconfig extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tsrconfig: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse tsrconfig: {}", path.display()))?;
    let dir = path.parent().unwrap_or(Path::new(""));
    let extends = config.extends.take();
    config = config.rebase(dir);

    if let Some(extends) = extends {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = config.over(base);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("tsrconfig has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

/// Explicit `--config`, else `tsrconfig.json` in the working directory if
/// one exists.
pub fn discover_config(explicit: Option<&Path>) -> Result<Option<TsrConfig>> {
    if let Some(path) = explicit {
        return load_config(path).map(Some);
    }
    let default = Path::new(CONFIG_FILE_NAME);
    if default.is_file() {
        return load_config(default).map(Some);
    }
    Ok(None)
}

/// Command-line values that override the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub library_name: Option<String>,
    pub package_layout: Option<PackageLayout>,
    pub root_dir: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub new_line: Option<NewLine>,
}

/// Final settings for one `emit` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub enabled: bool,
    pub options: ReflectOptions,
    /// `None` writes to stdout.
    pub out_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub new_line: NewLine,
}

impl ResolvedConfig {
    pub fn resolve(config: Option<TsrConfig>, overrides: Overrides) -> Self {
        let config = config.unwrap_or_default();
        Self {
            enabled: config.reflection_enabled.unwrap_or(true),
            options: ReflectOptions {
                library_name: overrides
                    .library_name
                    .or(config.library_name)
                    .unwrap_or_else(|| DEFAULT_LIBRARY.to_string()),
                package_layout: overrides
                    .package_layout
                    .or(config.package_layout)
                    .unwrap_or_default(),
                root_dir: overrides.root_dir.or(config.root_dir),
            },
            out_file: overrides.out_file.or(config.out_file),
            format: overrides.format.or(config.format).unwrap_or_default(),
            new_line: overrides.new_line.or(config.new_line).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
