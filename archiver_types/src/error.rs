use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Buffer too short: needed {needed} bytes, {remaining} remain")]
    OutOfBounds { needed: usize, remaining: usize },

    #[error("Malformed buffer: {0}")]
    Malformed(String),

    #[error("Values are nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("Identifier is {len} bytes; at most 255 fit the prefix. {identifier:?}")]
    IdentifierTooLong { identifier: String, len: usize },

    #[error("Not encodable: {0:?}")]
    NotEncodable(String),

    #[error("Identifier {identifier:?} is already registered by {owner}")]
    IdentifierCollision {
        identifier: String,
        owner: &'static str,
    },

    #[error("Identifier {0:?} is reserved for a built-in type")]
    ReservedIdentifier(String),

    #[error("The global registry is already held by this thread")]
    ReentrantGlobalAccess,
}

pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;
