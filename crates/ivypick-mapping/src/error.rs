use thiserror::Error;

/// Guard failures inside a pipeline run.
///
/// "Nothing matched" is never an error; it surfaces as unmapped items in the
/// report. These variants mean the run itself could not be trusted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("canonical catalog is empty; refusing to map against nothing")]
    EmptyCatalog,

    #[error("quantity overflow for \"{name}\": {detail}")]
    QuantityOverflow { name: String, detail: String },

    #[error("zh-TW collation unavailable: {0}")]
    Collation(String),
}

impl PipelineError {
    pub(crate) fn overflow(name: &str, detail: impl Into<String>) -> Self {
        PipelineError::QuantityOverflow {
            name: name.to_string(),
            detail: detail.into(),
        }
    }
}
