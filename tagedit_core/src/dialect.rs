use std::sync::LazyLock;

use regex::Regex;

/// A line that opens a markup element, e.g. `<div>`, `<%= x %>` or
/// `<!DOCTYPE html>`.
static MARKUP: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^\s*<[%!\w].*>").expect("valid markup pattern"));

/// A class or id selector line that opens a rule block.
static SELECTOR_BLOCK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^\s*[.#]\w+[, ].*\{$").expect("valid selector pattern"));

/// A line ending in `;`, optionally followed by a closing brace.
static STATEMENT_TERMINATED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m);\s*\}?$").expect("valid statement pattern"));

/// A whole line holding exactly one sentinel, in any dialect's comment
/// syntax. The legacy `// START_HIGHLIGHT` form is also recognized.
static SENTINEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[ \t]*(?:<!--|/\*|//#?|#)\s*(START|END)(?:(_HIGHLIGHT)|:(\w+))\s*(?:-->|\*/)?\s*$",
	)
	.expect("valid sentinel pattern")
});

/// The names a tag sentinel can carry.
static TAG_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\w+$").expect("valid tag name pattern"));

/// Whether `name` can be written into a `START:name` sentinel and parsed back.
pub fn is_tag_name(name: &str) -> bool {
	TAG_NAME.is_match(name)
}

/// The syntax family of a region, sniffed from its content. Only used to pick
/// the comment syntax of the sentinels wrapped around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
	/// HTML or XML.
	Markup,
	/// CSS-like rule blocks.
	SelectorBlock,
	/// Templates with embedded `<%=` substitutions.
	TemplateSubstitution,
	/// Languages whose statements end in `;`.
	StatementTerminated,
	/// Anything else; hash comments.
	Default,
}

impl Dialect {
	/// Sniff the dialect used for tag sentinels. Only markup and
	/// statement-terminated content get their own syntax.
	pub fn sniff_for_tag(text: &str) -> Self {
		if MARKUP.is_match(text) {
			Self::Markup
		} else if STATEMENT_TERMINATED.is_match(text) {
			Self::StatementTerminated
		} else {
			Self::Default
		}
	}

	/// Sniff the dialect used for highlight sentinels.
	pub fn sniff_for_highlight(text: &str) -> Self {
		if MARKUP.is_match(text) {
			Self::Markup
		} else if SELECTOR_BLOCK.is_match(text) {
			Self::SelectorBlock
		} else if text.contains("<%=") {
			Self::TemplateSubstitution
		} else if STATEMENT_TERMINATED.is_match(text) {
			Self::StatementTerminated
		} else {
			Self::Default
		}
	}

	/// The `START:name` / `END:name` pair for this dialect. Dialects without a
	/// tag syntax of their own use hash comments.
	pub fn tag_sentinels(self, name: &str) -> (String, String) {
		match self {
			Self::Markup => (format!("<!-- START:{name} -->"), format!("<!-- END:{name} -->")),
			Self::StatementTerminated => (format!("//#START:{name}"), format!("//#END:{name}")),
			Self::SelectorBlock | Self::TemplateSubstitution | Self::Default => {
				(format!("#START:{name}"), format!("#END:{name}"))
			}
		}
	}

	/// The `START_HIGHLIGHT` / `END_HIGHLIGHT` pair for this dialect.
	pub fn highlight_sentinels(self) -> (&'static str, &'static str) {
		match self {
			Self::Markup => ("<!-- START_HIGHLIGHT -->", "<!-- END_HIGHLIGHT -->"),
			Self::SelectorBlock => ("/* START_HIGHLIGHT */", "/* END_HIGHLIGHT */"),
			Self::StatementTerminated => ("//#START_HIGHLIGHT", "//#END_HIGHLIGHT"),
			Self::TemplateSubstitution | Self::Default => ("#START_HIGHLIGHT", "#END_HIGHLIGHT"),
		}
	}
}

/// A parsed sentinel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentinel {
	TagStart(String),
	TagEnd(String),
	HighlightStart,
	HighlightEnd,
}

impl Sentinel {
	/// Parse a single line (without its line terminator). Returns `None` when
	/// the line is anything other than exactly one sentinel.
	pub fn parse(line: &str) -> Option<Self> {
		let captures = SENTINEL_LINE.captures(line)?;
		let is_start = &captures[1] == "START";

		let sentinel = match (captures.get(2), captures.get(3)) {
			(Some(_), _) if is_start => Self::HighlightStart,
			(Some(_), _) => Self::HighlightEnd,
			(None, Some(name)) if is_start => Self::TagStart(name.as_str().to_string()),
			(None, Some(name)) => Self::TagEnd(name.as_str().to_string()),
			(None, None) => return None,
		};

		Some(sentinel)
	}

	pub fn is_highlight(&self) -> bool {
		matches!(self, Self::HighlightStart | Self::HighlightEnd)
	}
}
