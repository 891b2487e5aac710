//! Check command - validate configuration and content

use color_eyre::eyre::{Result, bail};
use restful_core::{RestfulConfig, SiteConfig, SiteContent, SiteExposure};
use restful_generator::ApiGenerator;

use super::Inputs;

/// Key fragments that suggest a value should not be published.
const SECRET_HINTS: [&str; 5] = ["secret", "password", "token", "apikey", "api_key"];

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads and validates configuration and content, then generates the API in
/// memory without writing anything.
pub fn run(inputs: &Inputs, strict: bool) -> Result<()> {
    tracing::info!(?inputs, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match inputs.load_config() {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            Some(config)
        }
        Err(e) => {
            result.add_error(format!("{e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
            None
        }
    };

    println!("\nChecking content...");
    let content = match inputs.load_content() {
        Ok(content) => match content.validate() {
            Ok(()) => {
                println!("  ✓ {} posts", content.posts.len());
                Some(content)
            }
            Err(e) => {
                result.add_error(format!("Content error: {e}"));
                println!("  ✗ Content invalid: {e}");
                None
            }
        },
        Err(e) => {
            result.add_error(format!("{e:#}"));
            println!("  ✗ Content unreadable: {e:#}");
            None
        }
    };

    if let Some(config) = &config {
        println!("\nChecking configuration values...");
        if let Ok(restful) = config.restful() {
            check_config_values(config, &restful, &mut result);
        }
    }

    if let (Some(config), Some(content)) = (config, content) {
        println!("\nGenerating...");
        check_content(&content, &mut result);
        match ApiGenerator::new(config).and_then(|generator| generator.generate(&content)) {
            Ok(resources) => println!("  ✓ {} resources", resources.len()),
            Err(e) => {
                result.add_error(format!("Generation error: {e}"));
                println!("  ✗ Generation failed: {e}");
            }
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Warn about settings that are valid but probably unintended.
fn check_config_values(config: &SiteConfig, restful: &RestfulConfig, result: &mut ValidationResult) {
    if restful.site == SiteExposure::Full {
        for key in exposed_secrets(config) {
            result.add_warning(format!(
                "`{key}` is published in api/site.json; list public keys in restful.site"
            ));
        }
    }

    if restful.posts_props.fields().next().is_none() {
        result.add_warning("restful.posts_props enables no fields; every post payload is null");
    }
}

/// Top-level keys whose names look like credentials.
fn exposed_secrets(config: &SiteConfig) -> Vec<&str> {
    config
        .as_map()
        .keys()
        .filter(|key| {
            let key = key.to_lowercase();
            SECRET_HINTS.iter().any(|hint| key.contains(hint))
        })
        .map(String::as_str)
        .collect()
}

fn check_content(content: &SiteContent, result: &mut ValidationResult) {
    if content.published().is_empty() {
        result.add_warning("No published posts");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(value: serde_json::Value) -> SiteConfig {
        SiteConfig::from_value(value).expect("config")
    }

    #[test]
    fn test_exposed_secrets() {
        let config = config(json!({
            "title": "Blog",
            "secretKey": "x",
            "deploy_token": "y",
            "author": "me"
        }));
        assert_eq!(exposed_secrets(&config), vec!["secretKey", "deploy_token"]);
    }

    #[test]
    fn test_full_exposure_warns_about_secrets() {
        let config = config(json!({ "password": "x" }));
        let mut result = ValidationResult::default();
        check_config_values(&config, &RestfulConfig::default(), &mut result);
        assert!(result.has_warnings());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_whitelist_does_not_warn() {
        let config = config(json!({
            "password": "x",
            "restful": { "site": ["title"], "posts_props": { "title": true } }
        }));
        let restful = config.restful().expect("restful");
        let mut result = ValidationResult::default();
        check_config_values(&config, &restful, &mut result);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("_config.yml");
        let content_path = dir.path().join("content.yml");
        std::fs::write(&config_path, "title: Blog\napi_key: abc\n").expect("write");
        std::fs::write(
            &content_path,
            "posts:\n  - title: A\n    slug: a\n    date: 2024-01-01T00:00:00Z\n",
        )
        .expect("write");

        let inputs = Inputs::new(&config_path, &content_path);
        assert!(run(&inputs, false).is_ok());
        assert!(run(&inputs, true).is_err());
    }
}
