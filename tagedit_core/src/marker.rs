use crate::EditError;
use crate::EditResult;
use crate::dialect::Dialect;
use crate::dialect::is_tag_name;

/// Wrap `text` in a named `START:name` / `END:name` sentinel pair. The
/// sentinel syntax is picked by sniffing `text`. Returns `text` unchanged when
/// `name` is absent or empty.
///
/// Names are restricted to word characters so the sentinels can be found
/// again by [`clear_all_marks`](crate::clear_all_marks) and tag filtering.
/// Anything else fails with [`EditError::InvalidTagName`].
///
/// ```rust
/// use tagedit_core::mark;
///
/// assert_eq!(mark("x = 1\n", Some("init"))?, "#START:init\nx = 1\n#END:init\n");
/// assert_eq!(mark("x = 1;", Some("init"))?, "//#START:init\nx = 1;\n//#END:init");
/// assert_eq!(mark("x = 1\n", None)?, "x = 1\n");
/// assert!(mark("x = 1\n", Some("my tag")).is_err());
/// # Ok::<(), tagedit_core::EditError>(())
/// ```
pub fn mark(text: &str, name: Option<&str>) -> EditResult<String> {
	let Some(name) = name.filter(|name| !name.is_empty()) else {
		return Ok(text.to_string());
	};

	if !is_tag_name(name) {
		return Err(EditError::InvalidTagName {
			name: name.to_string(),
		});
	}

	let (start, end) = Dialect::sniff_for_tag(text).tag_sentinels(name);
	Ok(wrap(text, &start, &end))
}

/// Wrap `text` in a `START_HIGHLIGHT` / `END_HIGHLIGHT` sentinel pair.
///
/// ```rust
/// use tagedit_core::highlight;
///
/// assert_eq!(
/// 	highlight("<p>hi</p>\n"),
/// 	"<!-- START_HIGHLIGHT -->\n<p>hi</p>\n<!-- END_HIGHLIGHT -->\n"
/// );
/// ```
pub fn highlight(text: &str) -> String {
	let (start, end) = Dialect::sniff_for_highlight(text).highlight_sentinels();
	wrap(text, start, end)
}

/// A region that ends in a newline keeps it in front of the closing sentinel
/// and gets a newline after it. Otherwise the closing sentinel goes on its own
/// line with nothing after it.
fn wrap(text: &str, start: &str, end: &str) -> String {
	let mut result = String::with_capacity(text.len() + start.len() + end.len() + 2);
	result.push_str(start);
	result.push('\n');
	result.push_str(text);

	if text.ends_with('\n') {
		result.push_str(end);
		result.push('\n');
	} else {
		result.push('\n');
		result.push_str(end);
	}

	result
}
