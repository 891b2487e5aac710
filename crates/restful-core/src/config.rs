//! Site configuration management.

use std::path::Path;

use serde_json::{Map, Value};

use crate::{
    error::{CoreError, Result},
    restful::RestfulConfig,
};

/// Prefix of environment variables layered over the configuration file.
const ENV_PREFIX: &str = "RESTFUL";

/// Top-level site configuration.
///
/// An arbitrary, insertion-ordered mapping of keys to values. Besides the
/// optional `restful` section, keys carry no meaning to the generator and are
/// only published through `api/site.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    values: Map<String, Value>,
}

impl SiteConfig {
    /// Wrap an already parsed configuration object.
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build from any JSON value; the value must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self::new(values)),
            Value::Null => Ok(Self::default()),
            other => Err(CoreError::invalid_config(format!(
                "configuration root must be a mapping, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Load configuration from a YAML, TOML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::invalid_config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let value: Value = match extension.as_str() {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "yml" | "yaml" => serde_yaml::from_str(&content)?,
            other => {
                return Err(CoreError::invalid_config(format!(
                    "unsupported configuration format `{other}` for {}",
                    path.display()
                )));
            }
        };

        let config = Self::from_value(value)?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            keys = config.values.len(),
            "loaded site configuration"
        );
        Ok(config)
    }

    /// Load configuration using the config crate, layering `RESTFUL__*`
    /// environment variables over the file.
    ///
    /// `RESTFUL__RESTFUL__POSTS_SIZE=5` sets `restful.posts_size`; numbers and
    /// booleans are parsed from the variable's text.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_layered(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(env.separator("__").try_parsing(true))
            .build()?;

        let values: Map<String, Value> = settings.try_deserialize()?;
        let config = Self::new(values);
        config.validate()?;
        Ok(config)
    }

    /// Check the `restful` section up front so a bad file fails at load time.
    fn validate(&self) -> Result<()> {
        self.restful().map(|_| ())
    }

    /// Resolve the `restful` section, see [`RestfulConfig::resolve`].
    pub fn restful(&self) -> Result<RestfulConfig> {
        RestfulConfig::resolve(self.values.get("restful"))
    }

    /// Site keywords, projected into posts through the `keywords` field.
    pub fn keywords(&self) -> Option<&Value> {
        self.values.get("keywords")
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The whole configuration object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The configuration restricted to `keys`, in the order given.
    ///
    /// Keys missing from the configuration are left out rather than set to
    /// `null`.
    pub fn pick<S: AsRef<str>>(&self, keys: &[S]) -> Map<String, Value> {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                self.values
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::restful::SiteExposure;

    fn write_config(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write");
        (dir, path)
    }

    #[test]
    fn test_load_yaml_config() {
        let (_dir, path) = write_config(
            "_config.yml",
            r#"
title: My Blog
url: https://example.com
keywords: rust, blog
restful:
  site: [title, url]
  posts_size: 5
  posts_props:
    title: true
    slug: true
  categories: true
"#,
        );

        let config = SiteConfig::load(&path).expect("load config");
        assert_eq!(config.get("title"), Some(&json!("My Blog")));
        assert_eq!(config.keywords(), Some(&json!("rust, blog")));

        let restful = config.restful().expect("restful");
        assert_eq!(restful.posts_size, 5);
        assert!(restful.categories);
        assert!(!restful.tags);
        assert_eq!(
            restful.site,
            SiteExposure::Keys(vec!["title".to_string(), "url".to_string()])
        );
    }

    #[test]
    fn test_load_toml_config() {
        let (_dir, path) = write_config(
            "config.toml",
            r#"
title = "My Blog"

[restful]
site = true
posts_size = 0
"#,
        );

        let config = SiteConfig::load(&path).expect("load config");
        let restful = config.restful().expect("restful");
        assert_eq!(restful.site, SiteExposure::Full);
        assert_eq!(restful.page_size(), None);
    }

    #[test]
    fn test_load_preserves_key_order() {
        let (_dir, path) = write_config("config.json", r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
        let config = SiteConfig::load(&path).expect("load config");
        let keys: Vec<_> = config.as_map().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_load_rejects_malformed_restful() {
        let (_dir, path) = write_config("_config.yml", "restful:\n  posts_size: lots\n");
        let err = SiteConfig::load(&path).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_config_not_found() {
        let result = SiteConfig::load(Path::new("/nonexistent/_config.yml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_unsupported_extension() {
        let (_dir, path) = write_config("config.ini", "title = x");
        let err = SiteConfig::load(&path).expect_err("must fail");
        assert!(err.to_string().contains("unsupported configuration format"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = SiteConfig::from_value(json!([1, 2])).expect_err("must fail");
        assert!(err.to_string().contains("a list"));
    }

    #[test]
    fn test_pick_skips_missing_keys() {
        let config = SiteConfig::from_value(json!({
            "title": "Blog",
            "url": "https://example.com",
            "secretKey": "hunter2"
        }))
        .expect("config");

        let picked = config.pick(&["url", "title", "author"]);
        assert_eq!(
            Value::Object(picked),
            json!({ "url": "https://example.com", "title": "Blog" })
        );
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<config::Map<String, String>>();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_load_with_env_keeps_file_key_order() {
        let (_dir, path) = write_config(
            "_config.yml",
            "title: Blog\nsubtitle: Notes\nurl: https://example.com\nauthor: me\nlanguage: en\ntimezone: UTC\ndescription: x\nCamelKey: y\nzeta: 1\n",
        );
        let expected = vec![
            "title",
            "subtitle",
            "url",
            "author",
            "language",
            "timezone",
            "description",
            "CamelKey",
            "zeta",
        ];

        for _ in 0..10 {
            let config = SiteConfig::load_with_env(&path).expect("load config");
            let keys: Vec<_> = config.as_map().keys().map(String::as_str).collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_env_overrides_typed_restful_values() {
        let (_dir, path) = write_config(
            "_config.yml",
            "title: Blog\nrestful:\n  posts_size: 10\n  tags: false\n",
        );

        let config = SiteConfig::load_layered(
            &path,
            env(&[
                ("RESTFUL__RESTFUL__POSTS_SIZE", "5"),
                ("RESTFUL__RESTFUL__TAGS", "true"),
            ]),
        )
        .expect("load config");

        let restful = config.restful().expect("restful");
        assert_eq!(restful.posts_size, 5);
        assert!(restful.tags);
        assert_eq!(config.get("title"), Some(&json!("Blog")));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let (_dir, path) = write_config("config.toml", "title = \"Env Blog\"\n");
        let config = SiteConfig::load_with_env(&path).expect("load config");
        assert_eq!(config.get("title"), Some(&json!("Env Blog")));
    }
}
