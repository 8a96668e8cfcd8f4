use crate::analytics::Analytics;
use crate::catalog::{Catalog, Item};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File layout of a data directory.
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn catalog(&self) -> PathBuf { self.root.join("df_recomendacion_juego.csv") }
    pub fn developer(&self) -> PathBuf { self.root.join("df_developer.csv") }
    pub fn userdata(&self) -> PathBuf { self.root.join("df_userdata.csv") }
    pub fn user_genre(&self) -> PathBuf { self.root.join("df_user_genre.csv") }
    pub fn best_developer_year(&self) -> PathBuf { self.root.join("best_developer_year.csv") }
    pub fn developer_reviews(&self) -> PathBuf { self.root.join("developer_reviews_analysis.csv") }
}

#[derive(Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
}

/// Read the `id,title` catalog in file order. Other columns are ignored.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let rows: Vec<CatalogRow> = load_records(path, &["id", "title"])?;
    Ok(rows.into_iter().map(|r| Item::new(r.id, r.title)).collect())
}

/// Deserialize every row of a CSV file after checking its header carries `required`.
pub fn load_records<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(Error::MissingColumn { file: path.display().to_string(), column: column.to_string() });
        }
    }
    let rows = reader.deserialize::<T>().collect::<std::result::Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

/// Like [`load_records`], but a missing file yields `None` instead of an error.
pub fn load_optional<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Option<Vec<T>>> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "dataset not found, related queries disabled");
        return Ok(None);
    }
    let rows = load_records(path, required)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "dataset loaded");
    Ok(Some(rows))
}

/// Load every analytics dataset present under `paths`.
pub fn load_analytics(paths: &DataPaths) -> Result<Analytics> {
    Ok(Analytics {
        developers: load_optional(&paths.developer(), &["developer", "price", "year"])?,
        users: load_optional(&paths.userdata(), &["user_id", "Dinero gastado", "Cantidad de items", "% de recomendación"])?,
        user_genres: load_optional(&paths.user_genre(), &["user_id", "genres", "year", "Horas jugadas"])?,
        best_developers: load_optional(&paths.best_developer_year(), &["year", "developer", "Recomendaciones"])?,
        developer_reviews: load_optional(
            &paths.developer_reviews(),
            &["developer", "sentiment", "Recuento de sentiment_analysis"],
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn catalog_keeps_file_order_and_canonical_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, ",id,title,genre\n0,10.0,Counter Strike,Action\n1,20,\"Portal, Still Alive\",Puzzle\n2,30,,Misc\n").unwrap();
        let cat = load_catalog(&path).unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.items()[0], Item::new("10", "Counter Strike"));
        assert_eq!(cat.items()[1].title, "Portal, Still Alive");
        assert_eq!(cat.items()[2].title, "");
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, "id,name\n1,Portal\n").unwrap();
        match load_catalog(&path) {
            Err(Error::MissingColumn { column, .. }) => assert_eq!(column, "title"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn absent_optional_dataset_is_none() {
        let dir = tempdir().unwrap();
        let analytics = load_analytics(&DataPaths::new(dir.path())).unwrap();
        assert!(analytics.developers.is_none());
        assert!(analytics.developer_reviews.is_none());
    }
}
