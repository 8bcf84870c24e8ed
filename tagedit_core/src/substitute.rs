use regex::Captures;

use crate::EditError;
use crate::EditResult;
use crate::dialect::is_tag_name;
use crate::highlight;
use crate::mark;
use crate::matcher::compile;

/// How [`substitute`] treats the replacement and a missing match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubstituteMode {
	/// Fail with [`EditError::PatternNotFound`] when the pattern is absent.
	#[default]
	Required,
	/// Leave the content untouched when the pattern is absent.
	Optional,
	/// Wrap the replacement in highlight sentinels.
	Highlight,
	/// Wrap the replacement in `START:name` / `END:name` sentinels.
	Mark(String),
}

/// Replace the first capture group of the first match of `pattern` in
/// `content` with `replacement`.
///
/// `\1` through `\9` in `replacement` are replaced by the text the
/// corresponding group captured. Groups that did not take part in the match
/// interpolate as empty text. Returns `None` when the pattern is absent in
/// [`SubstituteMode::Optional`]. A match in which the first group took no
/// part fails with [`EditError::GroupNotCaptured`] in every mode.
///
/// ```rust
/// use tagedit_core::SubstituteMode;
/// use tagedit_core::substitute;
///
/// let updated = substitute(
/// 	"greeting = 'hello'\n",
/// 	r"(\w+) = '(\w+)'",
/// 	r"\2_\1",
/// 	&SubstituteMode::Required,
/// )?;
/// assert_eq!(updated.as_deref(), Some("hello_greeting = 'hello'\n"));
/// # Ok::<(), tagedit_core::EditError>(())
/// ```
pub fn substitute(
	content: &str,
	pattern: &str,
	replacement: &str,
	mode: &SubstituteMode,
) -> EditResult<Option<String>> {
	let regex = compile(pattern)?;
	if regex.captures_len() < 2 {
		return Err(EditError::MissingCaptureGroup {
			pattern: pattern.to_string(),
		});
	}

	if let SubstituteMode::Mark(name) = mode {
		if !is_tag_name(name) {
			return Err(EditError::InvalidTagName { name: name.clone() });
		}
	}

	let Some(captures) = regex.captures(content) else {
		if *mode == SubstituteMode::Optional {
			tracing::debug!(pattern, "optional substitution skipped");
			return Ok(None);
		}
		return Err(EditError::not_found(pattern));
	};
	let Some(group) = captures.get(1).map(|group| group.range()) else {
		return Err(EditError::GroupNotCaptured {
			pattern: pattern.to_string(),
		});
	};

	let text = interpolate(replacement, &captures);
	let text = match mode {
		SubstituteMode::Highlight => highlight(&text),
		SubstituteMode::Mark(name) => mark(&text, Some(name))?,
		SubstituteMode::Required | SubstituteMode::Optional => text,
	};

	let mut result = String::with_capacity(content.len() - group.len() + text.len());
	result.push_str(&content[..group.start]);
	result.push_str(&text);
	result.push_str(&content[group.end..]);

	Ok(Some(result))
}

/// Expand `\1`..`\9` back-references. Every other character, including a
/// backslash not followed by a non-zero digit, is copied verbatim.
fn interpolate(replacement: &str, captures: &Captures<'_>) -> String {
	let mut result = String::with_capacity(replacement.len());
	let mut chars = replacement.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' {
			let group = chars
				.peek()
				.and_then(|next| next.to_digit(10))
				.filter(|&index| index > 0);

			if let Some(index) = group {
				chars.next();
				result.push_str(captures.get(index as usize).map_or("", |m| m.as_str()));
				continue;
			}
		}

		result.push(c);
	}

	result
}
