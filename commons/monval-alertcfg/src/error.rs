#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to decode alert configuration: {0}")]
    Decode(#[from] DecodeError),

    #[error("cannot edit alert configuration: {0}")]
    Structural(#[from] StructuralEditError),

    #[error("failed to encode alert configuration: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("alert configuration is empty")]
    Empty,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("top level is not a mapping")]
    NotAMapping,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StructuralEditError {
    #[error("`receivers` key is missing")]
    MissingReceivers,

    #[error("`receivers` is not a sequence")]
    ReceiversNotSequence,

    #[error("`route` key is missing")]
    MissingRoute,

    #[error("`route` is not a mapping")]
    RouteNotMapping,

    #[error("`route.routes` is not a sequence")]
    RoutesNotSequence,

    #[error("no receiver sends to {url}")]
    MissingReceiver { url: String },

    #[error("invalid target url `{0}`")]
    InvalidTarget(String),
}
