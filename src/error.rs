#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Decode: {0}")]
    Decode(String),

    #[error("Unknown wire type: factory {factory_id}, type {type_id}")]
    UnknownType { factory_id: i32, type_id: i32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
