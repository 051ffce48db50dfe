use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{CatalogError, CatalogResult};
use super::{Catalog, CatalogColumns};
use crate::constants::validate_embedding_dim;

/// Source of the catalog table. Called once at startup.
pub trait CatalogLoader: Send + Sync {
    fn load(&self) -> CatalogResult<Catalog>;
}

/// One catalog row as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub item_id: String,
    pub embedding: Vec<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub premiere_year: Option<i32>,
}

impl Catalog {
    /// Builds a catalog from records in file order.
    ///
    /// The title column exists only if every record has a title. Poster and year
    /// columns exist if at least one record carries the field.
    pub fn from_records(records: Vec<CatalogRecord>) -> CatalogResult<Self> {
        let with_title = records.iter().filter(|r| r.title.is_some()).count();
        if with_title != 0 && with_title != records.len() {
            let line = records
                .iter()
                .position(|r| r.title.is_none())
                .map(|p| p + 1)
                .unwrap_or_default();
            return Err(CatalogError::PartialColumn {
                column: "title",
                line,
            });
        }
        let has_titles = with_title != 0;
        let has_posters = records.iter().any(|r| r.poster.is_some());
        let has_years = records.iter().any(|r| r.premiere_year.is_some());

        let n = records.len();
        let mut item_ids = Vec::with_capacity(n);
        let mut embeddings = Vec::with_capacity(n);
        let mut titles = Vec::with_capacity(if has_titles { n } else { 0 });
        let mut posters = Vec::with_capacity(if has_posters { n } else { 0 });
        let mut years = Vec::with_capacity(if has_years { n } else { 0 });

        for record in records {
            item_ids.push(record.item_id);
            embeddings.push(record.embedding);
            if let Some(title) = record.title {
                titles.push(title);
            }
            if has_posters {
                posters.push(record.poster);
            }
            if has_years {
                years.push(record.premiere_year);
            }
        }

        let columns = CatalogColumns {
            titles: has_titles.then_some(titles),
            posters: has_posters.then_some(posters),
            premiere_years: has_years.then_some(years),
        };

        Catalog::new(item_ids, embeddings, columns)
    }
}

/// Reads one JSON object per line.
///
/// ```text
/// {"item_id": "a1", "title": "Arrival", "embedding": [0.1, 0.2], "premiere_year": 2016}
/// ```
#[derive(Debug, Clone)]
pub struct JsonLinesLoader {
    path: PathBuf,
    expected_dim: Option<usize>,
}

impl JsonLinesLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            expected_dim: None,
        }
    }

    pub fn with_expected_dim(mut self, dim: Option<usize>) -> Self {
        self.expected_dim = dim;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> CatalogResult<Vec<CatalogRecord>> {
        let file = File::open(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CatalogRecord = serde_json::from_str(&line)
                .map_err(|source| CatalogError::Parse { line: i + 1, source })?;
            records.push(record);
        }

        debug!(path = %self.path.display(), records = records.len(), "Read catalog records");
        Ok(records)
    }
}

impl CatalogLoader for JsonLinesLoader {
    fn load(&self) -> CatalogResult<Catalog> {
        let catalog = Catalog::from_records(self.read_records()?)?;

        if let Some(expected) = self.expected_dim {
            validate_embedding_dim(expected, catalog.dim())?;
        }

        info!(
            path = %self.path.display(),
            items = catalog.len(),
            dim = catalog.dim(),
            titles = catalog.has_titles(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockCatalogLoader {
    catalog: Catalog,
}

#[cfg(any(test, feature = "mock"))]
impl MockCatalogLoader {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Builds a titled catalog from `(item_id, title, embedding)` rows.
    pub fn from_rows(rows: &[(&str, &str, &[f64])]) -> CatalogResult<Self> {
        let records = rows
            .iter()
            .map(|(id, title, embedding)| CatalogRecord {
                item_id: id.to_string(),
                embedding: embedding.to_vec(),
                title: Some(title.to_string()),
                poster: None,
                premiere_year: None,
            })
            .collect();
        Ok(Self::new(Catalog::from_records(records)?))
    }
}

#[cfg(any(test, feature = "mock"))]
impl CatalogLoader for MockCatalogLoader {
    fn load(&self) -> CatalogResult<Catalog> {
        Ok(self.catalog.clone())
    }
}
