use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum EditError {
	#[error(transparent)]
	#[diagnostic(code(tagedit::io_error))]
	Io(#[from] std::io::Error),

	#[error("pattern not matched: `{pattern}`")]
	#[diagnostic(
		code(tagedit::pattern_not_found),
		help("check the target text, or use the optional mode if the match may be absent")
	)]
	PatternNotFound { pattern: String },

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(code(tagedit::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("pattern `{pattern}` has no capturing group")]
	#[diagnostic(
		code(tagedit::missing_capture_group),
		help("wrap the part to replace in parentheses, e.g. `name: (\\w+)`")
	)]
	MissingCaptureGroup { pattern: String },

	#[error("pattern `{pattern}` matched but its first capturing group did not take part")]
	#[diagnostic(
		code(tagedit::group_not_captured),
		help("make the first group mandatory, e.g. `(a)b` instead of `(a)?b`")
	)]
	GroupNotCaptured { pattern: String },

	#[error("invalid tag name `{name}`")]
	#[diagnostic(
		code(tagedit::invalid_tag_name),
		help("tag names are letters, digits and underscores, e.g. `cart_total`")
	)]
	InvalidTagName { name: String },

	#[error("modification time of `{path}` did not advance after {attempts} write(s)")]
	#[diagnostic(
		code(tagedit::timestamp_stalled),
		help("the file system clock may be behind the file's recorded modification time")
	)]
	TimestampStalled { path: String, attempts: u32 },

	#[error("edit script failed for `{path}`: {message}")]
	#[diagnostic(code(tagedit::script_failure))]
	Script { path: String, message: String },

	#[error("failed to read data file `{path}`: {reason}")]
	#[diagnostic(code(tagedit::data_file))]
	DataFile { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(tagedit::config_parse),
		help("check that tagedit.toml is valid TOML with `data_dir` and/or a [persist] section")
	)]
	ConfigParse(String),
}

impl EditError {
	pub(crate) fn not_found(pattern: impl Into<String>) -> Self {
		Self::PatternNotFound {
			pattern: pattern.into(),
		}
	}

	/// Returns true for the error kinds that end a session without the file
	/// having been persisted.
	pub fn is_io(&self) -> bool {
		matches!(self, Self::Io(_) | Self::TimestampStalled { .. })
	}
}

pub type EditResult<T> = Result<T, EditError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
