pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Query must be at most {max_chars} characters.")]
	QueryTooLong { max_chars: u32 },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<souk_storage::Error> for Error {
	fn from(err: souk_storage::Error) -> Self {
		match err {
			souk_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<souk_domain::Error> for Error {
	fn from(err: souk_domain::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
