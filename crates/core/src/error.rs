use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to deserialize YAML configuration: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error(
        "document rejected (path: {path}): {source}",
        path = path.display()
    )]
    DocumentRejected {
        path: PathBuf,
        #[source]
        source: press_ganey::PressGaneyError,
    },
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error("failed to write table {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("raw data error: {0}")]
    Files(#[from] pgs_files::FilesError),
}

pub type SurveyResult<T> = std::result::Result<T, SurveyError>;
