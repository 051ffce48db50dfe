//! Immutable item catalog shared by every scorer.
//!
//! A [`Catalog`] fixes the index space of all score vectors: row `i` of the embedding
//! matrix, `item_ids[i]` and the optional metadata columns all describe the same item.
//! It is built once at startup by a [`CatalogLoader`] and never mutated afterwards.

pub mod error;
pub mod loader;


pub use error::{CatalogError, CatalogResult};
#[cfg(any(test, feature = "mock"))]
pub use loader::MockCatalogLoader;
pub use loader::{CatalogLoader, CatalogRecord, JsonLinesLoader};

use nalgebra::DMatrix;
use std::collections::HashMap;

/// Optional metadata columns, aligned by index to the item ids.
#[derive(Debug, Clone, Default)]
pub struct CatalogColumns {
    pub titles: Option<Vec<String>>,
    pub posters: Option<Vec<Option<String>>>,
    pub premiere_years: Option<Vec<Option<i32>>>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    item_ids: Vec<String>,
    index: HashMap<String, usize>,
    embeddings: DMatrix<f64>,
    titles: Option<Vec<String>>,
    posters: Option<Vec<Option<String>>>,
    premiere_years: Option<Vec<Option<i32>>>,
}

impl Catalog {
    /// Builds a catalog from row-major embeddings.
    pub fn new(
        item_ids: Vec<String>,
        embeddings: Vec<Vec<f64>>,
        columns: CatalogColumns,
    ) -> CatalogResult<Self> {
        let n = item_ids.len();
        if n == 0 {
            return Err(CatalogError::Empty);
        }
        if embeddings.len() != n {
            return Err(CatalogError::LengthMismatch {
                column: "embeddings",
                expected: n,
                actual: embeddings.len(),
            });
        }

        let dim = embeddings[0].len();
        if dim == 0 {
            return Err(CatalogError::ZeroDimension);
        }

        check_column("titles", n, columns.titles.as_ref().map(Vec::len))?;
        check_column("posters", n, columns.posters.as_ref().map(Vec::len))?;
        check_column(
            "premiere_years",
            n,
            columns.premiere_years.as_ref().map(Vec::len),
        )?;

        let mut index = HashMap::with_capacity(n);
        let mut flat = Vec::with_capacity(n * dim);
        for (i, (item_id, row)) in item_ids.iter().zip(&embeddings).enumerate() {
            if index.insert(item_id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateItemId {
                    item_id: item_id.clone(),
                });
            }
            if row.len() != dim {
                return Err(CatalogError::RowDimensionMismatch {
                    item_id: item_id.clone(),
                    expected: dim,
                    actual: row.len(),
                });
            }
            if let Some(position) = row.iter().position(|v| !v.is_finite()) {
                return Err(CatalogError::NonFiniteEmbedding {
                    item_id: item_id.clone(),
                    position,
                });
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            item_ids,
            index,
            embeddings: DMatrix::from_row_slice(n, dim, &flat),
            titles: columns.titles,
            posters: columns.posters,
            premiere_years: columns.premiere_years,
        })
    }

    /// Number of items `N`.
    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    /// Embedding width `d`.
    pub fn dim(&self) -> usize {
        self.embeddings.ncols()
    }

    /// The `N × d` embedding matrix, one row per item.
    pub fn embeddings(&self) -> &DMatrix<f64> {
        &self.embeddings
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn item_id(&self, index: usize) -> &str {
        &self.item_ids[index]
    }

    pub fn index_of(&self, item_id: &str) -> Option<usize> {
        self.index.get(item_id).copied()
    }

    pub fn has_titles(&self) -> bool {
        self.titles.is_some()
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.titles.as_ref().map(|t| t[index].as_str())
    }

    pub fn poster(&self, index: usize) -> Option<&str> {
        self.posters.as_ref().and_then(|p| p[index].as_deref())
    }

    pub fn premiere_year(&self, index: usize) -> Option<i32> {
        self.premiere_years.as_ref().and_then(|y| y[index])
    }
}

fn check_column(column: &'static str, expected: usize, actual: Option<usize>) -> CatalogResult<()> {
    match actual {
        Some(actual) if actual != expected => Err(CatalogError::LengthMismatch {
            column,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
