/// Failures talking to Open Library. `NotFound` is a well-formed response
/// that simply carries no record; everything else is transport or decoding
/// trouble.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("No record found")]
    NotFound,
}
