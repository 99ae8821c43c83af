use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Component {component} not found for entity {entity}")]
    ComponentNotFound {
        entity: EntityId,
        component: &'static str,
    },

    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
