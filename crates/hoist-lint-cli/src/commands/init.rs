//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "hoist-lint.toml";

const DEFAULT_CONFIG: &str = r#"# hoist-lint configuration

# Lowest severity that makes `hoist-lint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
]

# Only analyze files matching these patterns (empty: every .js/.ts file)
# include = ["src/**"]

# Respect .gitignore files
respect_gitignore = true

[rules.vars-on-top]
enabled = true
# severity = "warning"  # Override default severity

# Allow `var` in loop headers, e.g. `for (var i = 0; ...)`
forStatement = true
forInStatement = true
forOfStatement = true
"#;

/// Writes a default configuration file into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to configure rules");
    println!("  2. Run: hoist-lint check");

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.is_rule_enabled("vars-on-top"));
        assert!(hoist_lint_rules::rules_from_config(&config).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = run(tmp.path(), false).unwrap();
        std::fs::write(&path, "# edited\n").unwrap();

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");

        run(tmp.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
