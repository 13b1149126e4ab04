use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Prefix under which the house datasets live in the bucket.
pub const DEFAULT_PREFIX: &str = "flin/diffusion";

// ---------------------------------------------------------------------------
// Raw file layout
// ---------------------------------------------------------------------------

/// Keys as they appear in `config.yaml`. The same names are read from the
/// environment and take precedence over the file.
#[derive(Debug, Default, Deserialize)]
struct RawStorageConfig {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    access_key_id: Option<String>,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    secret_access_key: Option<String>,
    #[serde(rename = "AWS_SESSION_TOKEN")]
    session_token: Option<String>,
    #[serde(rename = "AWS_DEFAULT_REGION")]
    region: Option<String>,
    #[serde(rename = "AWS_S3_ENDPOINT")]
    endpoint: Option<String>,
    #[serde(rename = "S3_BUCKET")]
    bucket: Option<String>,
    #[serde(rename = "S3_PREFIX")]
    prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// StorageConfig – validated remote storage settings
// ---------------------------------------------------------------------------

/// Everything needed to reach the object store. Built once at startup and
/// handed explicitly to whatever needs remote access.
#[derive(Clone, PartialEq)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
    /// Always carries a scheme.
    pub endpoint: String,
    pub bucket: String,
    pub prefix: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl StorageConfig {
    /// Load from an optional YAML file, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`StorageConfig::load`] with an explicit variable lookup.
    pub fn load_with(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut raw = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Configuration(format!("cannot read {}: {e}", path.display()))
                })?;
                serde_yaml::from_str(&text).map_err(|e| {
                    Error::Configuration(format!("cannot parse {}: {e}", path.display()))
                })?
            }
            None => RawStorageConfig::default(),
        };

        let overlay = |slot: &mut Option<String>, key: &str| {
            if let Some(v) = env(key) {
                *slot = Some(v);
            }
        };
        overlay(&mut raw.access_key_id, "AWS_ACCESS_KEY_ID");
        overlay(&mut raw.secret_access_key, "AWS_SECRET_ACCESS_KEY");
        overlay(&mut raw.session_token, "AWS_SESSION_TOKEN");
        overlay(&mut raw.region, "AWS_DEFAULT_REGION");
        overlay(&mut raw.endpoint, "AWS_S3_ENDPOINT");
        overlay(&mut raw.bucket, "S3_BUCKET");
        overlay(&mut raw.prefix, "S3_PREFIX");

        Self::validate(raw)
    }

    fn validate(raw: RawStorageConfig) -> Result<Self> {
        fn required(value: Option<String>, key: &str) -> Result<String> {
            match value.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(Error::Configuration(format!("{key} is not set"))),
            }
        }

        let endpoint = required(raw.endpoint, "AWS_S3_ENDPOINT")?;
        let endpoint = if endpoint.contains("://") {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(Error::Configuration(format!(
                    "AWS_S3_ENDPOINT '{endpoint}' must use http or https"
                )));
            }
            endpoint
        } else {
            format!("https://{endpoint}")
        };

        Ok(Self {
            access_key_id: required(raw.access_key_id, "AWS_ACCESS_KEY_ID")?,
            secret_access_key: required(raw.secret_access_key, "AWS_SECRET_ACCESS_KEY")?,
            session_token: raw.session_token.filter(|t| !t.trim().is_empty()),
            region: required(raw.region, "AWS_DEFAULT_REGION")?,
            endpoint,
            bucket: required(raw.bucket, "S3_BUCKET")?,
            prefix: raw
                .prefix
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = "\
AWS_ACCESS_KEY_ID: key
AWS_SECRET_ACCESS_KEY: secret
AWS_SESSION_TOKEN: token
AWS_DEFAULT_REGION: us-east-1
AWS_S3_ENDPOINT: minio.lab.sspcloud.fr
S3_BUCKET: houses
";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn reads_yaml_and_adds_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, YAML).unwrap();

        let cfg = StorageConfig::load_with(Some(&path), no_env).unwrap();
        assert_eq!(cfg.endpoint, "https://minio.lab.sspcloud.fr");
        assert_eq!(cfg.session_token.as_deref(), Some("token"));
        assert_eq!(cfg.prefix, DEFAULT_PREFIX);
        assert!(!format!("{cfg:?}").contains("\"secret\""));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, YAML).unwrap();

        let env: HashMap<&str, &str> =
            [("S3_BUCKET", "other"), ("S3_PREFIX", "/raw/")].into_iter().collect();
        let cfg =
            StorageConfig::load_with(Some(&path), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.bucket, "other");
        assert_eq!(cfg.prefix, "raw");
    }

    #[test]
    fn missing_value_is_a_configuration_error() {
        let err = StorageConfig::load_with(None, |k| {
            (k != "AWS_SECRET_ACCESS_KEY").then(|| "x".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(m) if m.contains("AWS_SECRET_ACCESS_KEY")));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = StorageConfig::load_with(Some(Path::new("/nonexistent/config.yaml")), no_env)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = StorageConfig::load_with(None, |k| {
            Some(if k == "AWS_S3_ENDPOINT" { "ftp://host" } else { "x" }.to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
