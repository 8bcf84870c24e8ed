use crate::dialect::Sentinel;

/// Remove every line that is solely a highlight sentinel, in any dialect.
///
/// A sentinel on a last line without a newline also removes the newline
/// before it, so `"a\n#END_HIGHLIGHT"` becomes `"a"`. This holds for
/// hand-written sentinels as well as those added by [`highlight`](crate::highlight).
pub fn clear_highlights(content: &str) -> String {
	remove_lines(content, Sentinel::is_highlight)
}

/// Remove every line that is solely a tag or highlight sentinel, in any
/// dialect. A sentinel on an unterminated last line takes the preceding
/// newline with it, as in [`clear_highlights`].
pub fn clear_all_marks(content: &str) -> String {
	remove_lines(content, |_| true)
}

/// Drop each sentinel line accepted by `should_remove` together with its
/// newline. A sentinel on an unterminated last line takes the preceding
/// newline with it, since that newline was added when the sentinel was.
fn remove_lines(content: &str, should_remove: impl Fn(&Sentinel) -> bool) -> String {
	let mut result = String::with_capacity(content.len());

	for line in content.split_inclusive('\n') {
		let terminated = line.ends_with('\n');
		let text = line.strip_suffix('\n').unwrap_or(line);

		match Sentinel::parse(text) {
			Some(sentinel) if should_remove(&sentinel) => {
				if !terminated && result.ends_with('\n') {
					result.pop();
				}
			}
			_ => result.push_str(line),
		}
	}

	result
}
