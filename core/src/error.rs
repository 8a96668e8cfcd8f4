#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no item with id {0}")]
    NotFound(String),

    #[error("catalog is empty, refusing to build the recommender")]
    EmptyCorpus,

    #[error("dataset for {0} was not loaded")]
    DatasetUnavailable(&'static str),

    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
