use std::ops::Range;

use regex::Regex;

use crate::EditError;
use crate::EditResult;

/// Keywords that open a declaration block.
const DECLARATION_KEYWORDS: [&str; 3] = ["class", "def", "test"];

/// The terminator line of a declaration block, after its indentation.
const DECLARATION_TERMINATOR: &str = "end";

/// What to look for in a buffer.
#[derive(Debug, Clone)]
pub enum Target {
	/// The first line containing this literal text. The region is the whole
	/// line without its newline.
	Literal(String),
	/// A regular expression. Multi-line matching is opt-in through the
	/// pattern's own flags (`(?s)`, `(?m)`).
	Pattern(Regex),
}

impl Target {
	/// Compile `pattern` into a [`Target::Pattern`].
	pub fn pattern(pattern: &str) -> EditResult<Self> {
		compile(pattern).map(Self::Pattern)
	}

	/// The text shown in diagnostics for this target.
	pub fn describe(&self) -> &str {
		match self {
			Self::Literal(text) => text,
			Self::Pattern(regex) => regex.as_str(),
		}
	}

	fn to_regex(&self) -> EditResult<Regex> {
		match self {
			Self::Literal(text) => compile(&format!(".*{}.*", regex::escape(text))),
			Self::Pattern(regex) => Ok(regex.clone()),
		}
	}
}

impl From<&str> for Target {
	fn from(value: &str) -> Self {
		Self::Literal(value.to_string())
	}
}

impl From<String> for Target {
	fn from(value: String) -> Self {
		Self::Literal(value)
	}
}

impl From<Regex> for Target {
	fn from(value: Regex) -> Self {
		Self::Pattern(value)
	}
}

/// A located span of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
	/// Byte range of the region within the searched text.
	pub range: Range<usize>,
	/// Leading whitespace of the opening line. Only set for declaration
	/// blocks.
	pub indent: Option<String>,
}

impl Region {
	/// The region's text within `source`, which must be the text it was
	/// located in.
	pub fn as_str<'a>(&self, source: &'a str) -> &'a str {
		&source[self.range.clone()]
	}
}

/// Compile a pattern, reporting failures as [`EditError::InvalidPattern`].
pub(crate) fn compile(pattern: &str) -> EditResult<Regex> {
	Regex::new(pattern).map_err(|e| {
		EditError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		}
	})
}

/// Find the first match of `target` in `content`.
pub fn locate(content: &str, target: &Target) -> EditResult<Region> {
	let regex = target.to_regex()?;
	let found = regex
		.find(content)
		.ok_or_else(|| EditError::not_found(target.describe()))?;

	tracing::debug!(
		pattern = target.describe(),
		start = found.start(),
		end = found.end(),
		"located region"
	);

	Ok(Region {
		range: found.range(),
		indent: None,
	})
}

/// Find the declaration block named `name`: a line opened by `class`, `def`
/// or `test` followed by the (optionally double-quoted) name, through the
/// first later line consisting of exactly the opener's indentation and `end`.
///
/// Openers are tried in order. An opener without a matching terminator is
/// skipped, so an inner `end` is never paired with an outer opener.
pub fn locate_declaration(content: &str, name: &str) -> EditResult<Region> {
	let lines = LineSpans::new(content);

	for (index, opener) in lines.spans.iter().enumerate() {
		let line = &content[opener.text.clone()];
		let Some(indent) = declaration_indent(line, name) else {
			continue;
		};

		let terminator = lines.spans[index + 1..]
			.iter()
			.find(|span| is_terminator(&content[span.text.clone()], indent));

		if let Some(terminator) = terminator {
			tracing::debug!(name, indent = indent.len(), "located declaration");
			return Ok(Region {
				range: opener.text.start..terminator.full_end,
				indent: Some(indent.to_string()),
			});
		}
	}

	Err(EditError::not_found(format!(
		"{} {name}",
		DECLARATION_KEYWORDS.join("|")
	)))
}

/// Returns the leading indentation when `line` opens a declaration of `name`.
fn declaration_indent<'a>(line: &'a str, name: &str) -> Option<&'a str> {
	let body = line.trim_start_matches([' ', '\t']);
	let indent = &line[..line.len() - body.len()];

	let rest = DECLARATION_KEYWORDS
		.iter()
		.find_map(|keyword| body.strip_prefix(keyword))?;
	let after_keyword = rest.trim_start();
	if after_keyword.len() == rest.len() {
		return None;
	}

	let quoted = after_keyword.strip_prefix('"');
	let rest = quoted.unwrap_or(after_keyword).strip_prefix(name)?;
	let rest = match quoted {
		Some(_) => rest.strip_prefix('"').unwrap_or(rest),
		None => rest,
	};

	// `def index` must not open `def index_all`.
	if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
		return None;
	}

	Some(indent)
}

fn is_terminator(line: &str, indent: &str) -> bool {
	line.trim_end_matches('\r')
		.strip_prefix(indent)
		.is_some_and(|rest| rest == DECLARATION_TERMINATOR)
}

struct LineSpan {
	/// The line without its newline.
	text: Range<usize>,
	/// End of the line including its newline.
	full_end: usize,
}

struct LineSpans {
	spans: Vec<LineSpan>,
}

impl LineSpans {
	fn new(content: &str) -> Self {
		let mut spans = Vec::new();
		let mut offset = 0;

		for line in content.split_inclusive('\n') {
			let full_end = offset + line.len();
			let text_end = if line.ends_with('\n') {
				full_end - 1
			} else {
				full_end
			};
			spans.push(LineSpan {
				text: offset..text_end,
				full_end,
			});
			offset = full_end;
		}

		Self { spans }
	}
}
