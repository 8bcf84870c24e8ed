use derive_more::Deref;
use derive_more::DerefMut;

use crate::EditError;
use crate::EditResult;
use crate::Region;
use crate::SubstituteMode;
use crate::Target;
use crate::cleaner;
use crate::marker;
use crate::matcher::locate;
use crate::matcher::locate_declaration;
use crate::substitute::substitute;

/// Decorations applied to a located region after its script has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOptions {
	/// Wrap the region in highlight sentinels.
	pub highlight: bool,
	/// Wrap the region in `START:name` / `END:name` sentinels.
	pub mark: Option<String>,
}

impl EditOptions {
	#[must_use]
	pub fn highlighted(mut self) -> Self {
		self.highlight = true;
		self
	}

	#[must_use]
	pub fn marked(mut self, name: impl Into<String>) -> Self {
		self.mark = Some(name.into());
		self
	}
}

/// The text of one file (or of one region of it) under edit.
///
/// All region, mark and highlight operations are methods on this type. It
/// dereferences to the underlying [`String`] for direct access.
///
/// ```rust
/// use tagedit_core::Buffer;
/// use tagedit_core::EditOptions;
///
/// let mut buffer = Buffer::new("a = 1\nb = 2\n");
/// buffer.edit_with("b =", &EditOptions::default().highlighted(), |line| {
/// 	line.set_all("b = 3");
/// 	Ok::<(), tagedit_core::EditError>(())
/// })?;
/// assert_eq!(buffer.as_str(), "a = 1\n#START_HIGHLIGHT\nb = 3\n#END_HIGHLIGHT\n");
/// # Ok::<(), tagedit_core::EditError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Buffer(String);

impl Buffer {
	pub fn new(content: impl Into<String>) -> Self {
		Self(content.into())
	}

	pub fn into_string(self) -> String {
		self.0
	}

	/// The whole content.
	pub fn all(&self) -> &str {
		&self.0
	}

	/// Replace the whole content.
	pub fn set_all(&mut self, content: impl Into<String>) {
		self.0 = content.into();
	}

	/// Locate `target` and apply `options` to it. See [`Buffer::edit_with`].
	pub fn edit(&mut self, target: impl Into<Target>, options: &EditOptions) -> EditResult<()> {
		self.edit_with(target, options, |_| Ok::<(), EditError>(()))
	}

	/// Locate `target`, hand the region to `script` as its own buffer, then
	/// highlight and mark the result as `options` request and write it back
	/// in place of the region.
	pub fn edit_with<F, E>(
		&mut self,
		target: impl Into<Target>,
		options: &EditOptions,
		script: F,
	) -> Result<(), E>
	where
		F: FnOnce(&mut Buffer) -> Result<(), E>,
		E: From<EditError>,
	{
		let region = locate(&self.0, &target.into())?;
		let mut part = Buffer::new(region.as_str(&self.0));

		script(&mut part)?;
		if options.highlight {
			part.highlight();
		}
		if let Some(name) = &options.mark {
			part.mark(Some(name))?;
		}

		self.replace_region(&region, &part);
		Ok(())
	}

	/// Locate the declaration block `name` and apply `options` to it. See
	/// [`Buffer::declaration_with`].
	pub fn declaration(&mut self, name: &str, options: &EditOptions) -> EditResult<()> {
		self.declaration_with(name, options, |_| Ok::<(), EditError>(()))
	}

	/// Locate the declaration block `name`, hand it to `script`, then mark and
	/// highlight it as `options` request. The mark goes inside the highlight.
	pub fn declaration_with<F, E>(
		&mut self,
		name: &str,
		options: &EditOptions,
		script: F,
	) -> Result<(), E>
	where
		F: FnOnce(&mut Buffer) -> Result<(), E>,
		E: From<EditError>,
	{
		let region = locate_declaration(&self.0, name)?;
		let mut part = Buffer::new(region.as_str(&self.0));

		script(&mut part)?;
		if let Some(mark) = &options.mark {
			part.mark(Some(mark))?;
		}
		if options.highlight {
			part.highlight();
		}

		self.replace_region(&region, &part);
		Ok(())
	}

	/// Replace the first capture group of `pattern`. Returns whether a
	/// substitution was made, which is only ever `false` in
	/// [`SubstituteMode::Optional`].
	pub fn substitute(
		&mut self,
		pattern: &str,
		replacement: &str,
		mode: &SubstituteMode,
	) -> EditResult<bool> {
		let Some(updated) = substitute(&self.0, pattern, replacement, mode)? else {
			return Ok(false);
		};

		self.0 = updated;
		Ok(true)
	}

	/// Wrap the whole content in a named tag. No-op without a name. See
	/// [`mark`](crate::mark) for valid names.
	pub fn mark(&mut self, name: Option<&str>) -> EditResult<()> {
		if name.is_some_and(|name| !name.is_empty()) {
			self.0 = marker::mark(&self.0, name)?;
		}
		Ok(())
	}

	/// Wrap the whole content in highlight sentinels.
	pub fn highlight(&mut self) {
		self.0 = marker::highlight(&self.0);
	}

	pub fn clear_highlights(&mut self) {
		self.0 = cleaner::clear_highlights(&self.0);
	}

	pub fn clear_all_marks(&mut self) {
		self.0 = cleaner::clear_all_marks(&self.0);
	}

	/// Prefix every line with `columns` spaces.
	pub fn indent(&mut self, columns: usize) {
		let padding = " ".repeat(columns);
		self.0 = self
			.0
			.split_inclusive('\n')
			.map(|line| format!("{padding}{line}"))
			.collect();
	}

	/// Remove `columns` leading spaces from every line that has them. Lines
	/// with less indentation are left as they are.
	pub fn unindent(&mut self, columns: usize) {
		let padding = " ".repeat(columns);
		self.0 = self
			.0
			.split_inclusive('\n')
			.map(|line| line.strip_prefix(padding.as_str()).unwrap_or(line))
			.collect();
	}

	fn replace_region(&mut self, region: &Region, part: &Buffer) {
		self.0.replace_range(region.range.clone(), &part.0);
	}
}

impl From<String> for Buffer {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for Buffer {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}
