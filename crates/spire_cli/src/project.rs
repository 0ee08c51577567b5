//! Locating and loading the project configuration.

use std::path::{Path, PathBuf};

use spire_compiler::SDK_ENV_VAR;
use spire_config::{
    load_config, resolve_project, BuildConfig, PathsConfig, ResolvedProject, SpireConfig,
    ToolchainSection, CONFIG_FILE,
};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `spire.toml`.
///
/// Returns the directory containing `spire.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `spire.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Loads and resolves the project selected by the global args.
pub fn load_project(global: &GlobalArgs) -> Result<ResolvedProject, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = load_config(&root)?;
    Ok(resolve_project(&config, &root, sdk_from_env().as_deref()))
}

/// Loads the project and applies the `--input`/`--output` overrides.
///
/// Without a `spire.toml`, both overrides must be given and the project
/// uses default settings. Relative overrides resolve against the current
/// directory.
pub fn select_project(
    global: &GlobalArgs,
    input: Option<&str>,
    output: Option<&str>,
) -> Result<ResolvedProject, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let project = match (load_project(global), input, output) {
        (Ok(project), _, _) => project,
        (Err(_), Some(input), Some(output)) if global.config.is_none() => {
            standalone_project(input, output, &cwd)
        }
        (Err(e), _, _) => return Err(e),
    };
    Ok(apply_overrides(project, input, output, &cwd))
}

/// Replaces the input and output roots, anchoring relative values at `cwd`.
fn apply_overrides(
    mut project: ResolvedProject,
    input: Option<&str>,
    output: Option<&str>,
    cwd: &Path,
) -> ResolvedProject {
    if let Some(input) = input {
        project.input = cwd.join(input);
    }
    if let Some(output) = output {
        project.output = cwd.join(output);
    }
    project
}

/// A project with default settings for explicit input and output roots,
/// used when no `spire.toml` exists.
fn standalone_project(input: &str, output: &str, cwd: &Path) -> ResolvedProject {
    let config = SpireConfig {
        paths: PathsConfig {
            input: input.to_string(),
            output: output.to_string(),
            include: Vec::new(),
        },
        toolchain: ToolchainSection::default(),
        build: BuildConfig::default(),
    };
    resolve_project(&config, cwd, sdk_from_env().as_deref())
}

fn sdk_from_env() -> Option<PathBuf> {
    std::env::var_os(SDK_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = "[paths]\ninput = \"shaders\"\noutput = \"build\"\n";

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("spire.toml"), MINIMAL).unwrap();
        let root = find_project_root(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("spire.toml"), MINIMAL).unwrap();
        let sub = tmp.path().join("shaders").join("materials");
        fs::create_dir_all(&sub).unwrap();
        let root = find_project_root(&sub).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = find_project_root(tmp.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("could not find spire.toml"));
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("spire.toml");
        fs::write(&config_path, MINIMAL).unwrap();

        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(config_path.to_str().unwrap().to_string()),
        };
        let root = resolve_project_root(&global).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let root = resolve_project_root(&global).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn standalone_project_searches_input_parent() {
        let project = standalone_project("shaders", "out", Path::new("/work"));
        assert_eq!(project.input, PathBuf::from("/work/shaders"));
        assert_eq!(project.output, PathBuf::from("/work/out"));
        assert_eq!(
            project.include_paths(),
            vec![PathBuf::from("/work/shaders"), PathBuf::from("/work")]
        );
    }

    #[test]
    fn relative_overrides_anchor_at_cwd() {
        let project = standalone_project("shaders", "out", Path::new("/proj"));
        let project = apply_overrides(
            project,
            Some("engine/shaders"),
            Some("/tmp/spv"),
            Path::new("/work"),
        );
        assert_eq!(project.input, PathBuf::from("/work/engine/shaders"));
        assert_eq!(project.output, PathBuf::from("/tmp/spv"));
        assert_eq!(
            project.include_paths(),
            vec![
                PathBuf::from("/work/engine/shaders"),
                PathBuf::from("/work/engine"),
            ]
        );
    }

    #[test]
    fn select_project_overrides_configured_paths() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("spire.toml"), MINIMAL).unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let project = select_project(&global, Some("src/shaders"), None).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(project.input, cwd.join("src/shaders"));
        assert_eq!(project.output, tmp.path().join("build"));
        assert_eq!(project.include_paths().len(), 2);
    }

    #[test]
    fn select_project_requires_config_without_both_roots() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        assert!(select_project(&global, Some("shaders"), Some("out")).is_err());
    }

    #[test]
    fn load_project_anchors_paths() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("spire.toml"), MINIMAL).unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let project = load_project(&global).unwrap();
        assert_eq!(project.input, tmp.path().join("shaders"));
        assert_eq!(project.output, tmp.path().join("build"));
    }
}
