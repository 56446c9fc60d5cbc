pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid pattern: {message}")]
	InvalidPattern { message: String },
	#[error("Unknown {field} value: {value}")]
	UnknownValue { field: &'static str, value: String },
}
