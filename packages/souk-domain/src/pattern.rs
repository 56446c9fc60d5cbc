use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

const MAX_PATTERN_BYTES: usize = 1_024;

/// A case-insensitive substring pattern built from untrusted input.
///
/// Every user-supplied substring filter is escaped here exactly once. The escaped source is safe
/// to hand to a regex engine (including Postgres `~*`), and the compiled form is used for
/// in-process matching.
#[derive(Clone)]
pub struct SafePattern {
	literal: String,
	escaped: String,
	regex: Regex,
}
impl SafePattern {
	pub fn substring(literal: &str) -> Result<Self> {
		if literal.len() > MAX_PATTERN_BYTES {
			return Err(Error::InvalidPattern {
				message: format!("pattern exceeds {MAX_PATTERN_BYTES} bytes."),
			});
		}

		let escaped = regex::escape(literal);
		let regex = RegexBuilder::new(&escaped)
			.case_insensitive(true)
			.build()
			.map_err(|err| Error::InvalidPattern { message: err.to_string() })?;

		Ok(Self { literal: literal.to_string(), escaped, regex })
	}

	/// The original, unescaped text.
	pub fn literal(&self) -> &str {
		&self.literal
	}

	/// The escaped regex source.
	pub fn as_regex_source(&self) -> &str {
		&self.escaped
	}

	pub fn is_match(&self, haystack: &str) -> bool {
		self.regex.is_match(haystack)
	}
}
impl fmt::Debug for SafePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SafePattern").field("literal", &self.literal).finish()
	}
}
impl PartialEq for SafePattern {
	fn eq(&self, other: &Self) -> bool {
		self.literal == other.literal
	}
}
