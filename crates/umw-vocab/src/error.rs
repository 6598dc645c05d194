use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    /// A configured synonym points at something other than a canonical modality.
    #[error("Synonym {label:?} maps to {target:?}, which is not a canonical modality")]
    UnknownTarget { label: String, target: String },

    #[error("Synonym label must not be empty")]
    EmptyLabel,
}
