use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use super::loader::read_csv;
use super::model::Dataset;
use crate::config::StorageConfig;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DatasetName – the logical datasets kept in storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetName {
    Train,
    Test,
    Submission,
    TrainProcessed,
    TestProcessed,
    ValProcessed,
}

impl DatasetName {
    pub const ALL: [DatasetName; 6] = [
        DatasetName::Train,
        DatasetName::Test,
        DatasetName::Submission,
        DatasetName::TrainProcessed,
        DatasetName::TestProcessed,
        DatasetName::ValProcessed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetName::Train => "train",
            DatasetName::Test => "test",
            DatasetName::Submission => "submission",
            DatasetName::TrainProcessed => "train_processed",
            DatasetName::TestProcessed => "test_processed",
            DatasetName::ValProcessed => "val_processed",
        }
    }

    /// File name of the object, relative to the configured prefix.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetName::Train => "train.csv",
            DatasetName::Test => "test.csv",
            DatasetName::Submission => "sample_submission.csv",
            DatasetName::TrainProcessed => "train_processed.csv",
            DatasetName::TestProcessed => "test_processed.csv",
            DatasetName::ValProcessed => "val_processed.csv",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DatasetName::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| format!("unknown dataset '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// DatasetSource – where named datasets come from
// ---------------------------------------------------------------------------

/// Retrieval of named datasets. Implementations own their connection state;
/// callers receive one explicitly instead of reaching for a global handle.
pub trait DatasetSource {
    fn fetch(&self, name: DatasetName) -> Result<Dataset>;
}

fn unavailable(
    name: DatasetName,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> Error {
    Error::DataUnavailable {
        name: name.to_string(),
        source: source.into(),
    }
}

// ---------------------------------------------------------------------------
// ObjectStoreSource – CSV objects in an S3-compatible store
// ---------------------------------------------------------------------------

/// Blocking facade over an [`ObjectStore`]. Each fetch is a single call that
/// runs to completion on a private current-thread runtime.
pub struct ObjectStoreSource {
    store: Arc<dyn ObjectStore>,
    prefix: ObjectPath,
    runtime: tokio::runtime::Runtime,
}

impl ObjectStoreSource {
    /// Wrap any store, e.g. `object_store::memory::InMemory` in tests.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            store,
            prefix: ObjectPath::from(prefix),
            runtime,
        })
    }

    /// Connect to the bucket described by `config`.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_endpoint(&config.endpoint)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_allow_http(config.endpoint.starts_with("http://"));
        if let Some(token) = &config.session_token {
            builder = builder.with_token(token);
        }
        let store = builder
            .build()
            .map_err(|e| Error::Configuration(format!("object store: {e}")))?;
        log::info!(
            "Using bucket '{}' at {} (prefix '{}')",
            config.bucket,
            config.endpoint,
            config.prefix
        );
        Self::new(Arc::new(store), &config.prefix)
    }

    fn location(&self, name: DatasetName) -> ObjectPath {
        self.prefix.child(name.file_name())
    }
}

impl DatasetSource for ObjectStoreSource {
    fn fetch(&self, name: DatasetName) -> Result<Dataset> {
        let location = self.location(name);
        log::info!("Fetching '{name}' from {location}");
        let bytes = self
            .runtime
            .block_on(async {
                let object = self.store.get(&location).await?;
                object.bytes().await
            })
            .map_err(|e| unavailable(name, e))?;
        read_csv(&bytes[..])
    }
}

// ---------------------------------------------------------------------------
// LocalSource – the same file names in a local directory
// ---------------------------------------------------------------------------

pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for LocalSource {
    fn fetch(&self, name: DatasetName) -> Result<Dataset> {
        let path = self.root.join(name.file_name());
        log::info!("Reading '{name}' from {}", path.display());
        let file = std::fs::File::open(&path).map_err(|e| unavailable(name, e))?;
        read_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::PutPayload;

    fn seeded_store() -> ObjectStoreSource {
        let store = Arc::new(InMemory::new());
        let source = ObjectStoreSource::new(store.clone(), "flin/diffusion").unwrap();
        source
            .runtime
            .block_on(store.put(
                &ObjectPath::from("flin/diffusion/train.csv"),
                PutPayload::from(b"Id,LotArea,SalePrice\n1,8450,208500\n".to_vec()),
            ))
            .unwrap();
        source
    }

    #[test]
    fn parses_names() {
        for name in DatasetName::ALL {
            assert_eq!(name.as_str().parse::<DatasetName>().unwrap(), name);
        }
        assert!("holdout".parse::<DatasetName>().is_err());
    }

    #[test]
    fn fetches_csv_objects() {
        let ds = seeded_store().fetch(DatasetName::Train).unwrap();
        assert_eq!(ds.column_names(), vec!["Id", "LotArea", "SalePrice"]);
        assert_eq!(ds.height(), 1);
    }

    #[test]
    fn missing_object_is_unavailable() {
        let err = seeded_store().fetch(DatasetName::Submission).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { name, .. } if name == "submission"));
    }

    #[test]
    fn local_source_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.csv"), "Id,LotArea\n7,11000\n").unwrap();
        let source = LocalSource::new(dir.path());

        assert_eq!(source.fetch(DatasetName::Test).unwrap().height(), 1);
        assert!(matches!(
            source.fetch(DatasetName::Train),
            Err(Error::DataUnavailable { .. })
        ));
    }
}
