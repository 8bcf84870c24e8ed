use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use std::time::SystemTime;

use serde::Serialize;

use crate::AnyEmptyResult;
use crate::Buffer;
use crate::EditError;
use crate::EditResult;
use crate::dialect::Sentinel;

/// Assumed age of a file whose modification time can't be read.
const STALE_MARGIN: Duration = Duration::from_secs(2);

/// How far past the prior modification time a stalled file is pushed once
/// polling gives up. Covers the coarsest common file system resolution.
const FORCED_ADVANCE: Duration = Duration::from_secs(1);

/// Classification of a rendered line, passed to the [`Renderer`] as its
/// style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
	/// The `edit <path>` header of a session.
	Command,
	/// A line that was present before the edit.
	Unchanged,
	/// A line that is new, changed, or inside a highlight span.
	Highlighted,
}

impl LineStyle {
	/// The style tag handed to renderers.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Command => "command",
			Self::Unchanged => "unchanged",
			Self::Highlighted => "highlighted",
		}
	}
}

/// Displays the output of an edit session.
pub trait Renderer {
	/// Emit one line with its classification.
	fn line(&mut self, text: &str, style: LineStyle);
	/// Emit the diagnostic trace of a failed session.
	fn trace(&mut self, error: &EditError);
}

/// A line captured by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
	pub text: String,
	pub style: LineStyle,
}

/// A [`Renderer`] that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
	pub lines: Vec<RenderedLine>,
	/// Display text of every traced error.
	pub traces: Vec<String>,
}

impl RecordingRenderer {
	/// The text of every content line, without session headers.
	pub fn content(&self) -> Vec<&str> {
		self.lines
			.iter()
			.filter(|line| line.style != LineStyle::Command)
			.map(|line| line.text.as_str())
			.collect()
	}
}

impl Renderer for RecordingRenderer {
	fn line(&mut self, text: &str, style: LineStyle) {
		self.lines.push(RenderedLine {
			text: text.to_string(),
			style,
		});
	}

	fn trace(&mut self, error: &EditError) {
		self.traces.push(error.to_string());
	}
}

/// Kinds of events reported to an [`EventLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventKind {
	/// A file went through an edit session.
	Edit,
}

impl EventKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Edit => "edit",
		}
	}
}

/// Receives session events. Fire and forget.
pub trait EventLog {
	fn event(&mut self, kind: EventKind, argument: &str);
}

/// An [`EventLog`] that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
	fn event(&mut self, kind: EventKind, argument: &str) {
		tracing::info!(kind = kind.as_str(), argument, "session event");
	}
}

/// The lines of a file before its edit.
#[derive(Debug, Clone, Default)]
pub struct LineSnapshot {
	lines: HashSet<String>,
}

impl LineSnapshot {
	pub fn new(content: &str) -> Self {
		Self {
			lines: content.lines().map(str::to_string).collect(),
		}
	}

	pub fn contains(&self, line: &str) -> bool {
		self.lines.contains(line)
	}
}

/// Controls the wait for a file's modification time to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOptions {
	/// Pause between writes while the modification time has not advanced.
	pub poll_interval: Duration,
	/// Number of writes attempted before forcing the timestamp forward. At
	/// least one write is always made.
	pub max_attempts: u32,
}

impl Default for PersistOptions {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(100),
			max_attempts: 50,
		}
	}
}

/// The outcome of a session that persisted its file.
#[derive(Debug)]
pub struct SessionReport {
	pub path: PathBuf,
	/// Number of content lines handed to the renderer.
	pub rendered_lines: usize,
	/// Modification time of the file after the write.
	pub modified: SystemTime,
	/// The script's error, if it failed. The file still holds whatever the
	/// script left in the buffer.
	pub script_failure: Option<EditError>,
}

impl SessionReport {
	pub fn is_ok(&self) -> bool {
		self.script_failure.is_none()
	}
}

/// Applies one edit to one file and renders the result.
pub struct EditSession<'a> {
	renderer: &'a mut dyn Renderer,
	log: &'a mut dyn EventLog,
	persist: PersistOptions,
}

impl<'a> EditSession<'a> {
	pub fn new(renderer: &'a mut dyn Renderer, log: &'a mut dyn EventLog) -> Self {
		Self {
			renderer,
			log,
			persist: PersistOptions::default(),
		}
	}

	#[must_use]
	pub fn with_persist_options(mut self, persist: PersistOptions) -> Self {
		self.persist = persist;
		self
	}

	/// Rewrite `path` unchanged and render it. See [`EditSession::run`].
	pub fn show(&mut self, path: &Path, tag: Option<&str>) -> EditResult<SessionReport> {
		self.run(path, tag, |_| Ok(()))
	}

	/// Load `path`, let `script` transform it, write it back with a
	/// modification time later than before the session, and render it.
	///
	/// Only lines between `START:tag` and `END:tag` are rendered when `tag`
	/// is given. Lines inside highlight spans or absent from the original
	/// file are rendered as [`LineStyle::Highlighted`].
	///
	/// A failing script doesn't abort the session: the buffer is still
	/// written, the error is traced and the whole file is rendered. Failing
	/// to write is returned as an error, after rendering.
	pub fn run<F>(&mut self, path: &Path, tag: Option<&str>, script: F) -> EditResult<SessionReport>
	where
		F: FnOnce(&mut Buffer) -> AnyEmptyResult,
	{
		let display = path.display().to_string();
		self.renderer.line(&format!("edit {display}"), LineStyle::Command);

		let prior = fs::metadata(path)
			.and_then(|metadata| metadata.modified())
			.unwrap_or_else(|_| SystemTime::now() - STALE_MARGIN);
		let original = fs::read_to_string(path).unwrap_or_else(|e| {
			tracing::debug!(path = %path.display(), error = %e, "starting from empty content");
			String::new()
		});
		let snapshot = LineSnapshot::new(&original);

		let mut buffer = Buffer::new(original);
		let script_failure = script(&mut buffer).err().map(|e| {
			EditError::Script {
				path: display.clone(),
				message: e.to_string(),
			}
		});
		let persisted = persist(path, &buffer, prior, self.persist);

		let mut tag = tag;
		if let Some(error) = &script_failure {
			self.renderer.trace(error);
			tag = None;
		}
		if let Err(error) = &persisted {
			self.renderer.trace(error);
			tag = None;
		}

		let rendered_lines = render_buffer(&buffer, &snapshot, tag, &mut *self.renderer);
		self.log.event(EventKind::Edit, &display);

		Ok(SessionReport {
			path: path.to_path_buf(),
			rendered_lines,
			modified: persisted?,
			script_failure,
		})
	}
}

/// Stream `content` to `renderer`, dropping sentinel lines, keeping only the
/// lines inside `tag` when one is given, and classifying each line against
/// `snapshot`. Returns the number of lines rendered.
pub fn render_buffer(
	content: &str,
	snapshot: &LineSnapshot,
	tag: Option<&str>,
	renderer: &mut dyn Renderer,
) -> usize {
	let mut include = tag.is_none();
	let mut highlighting = false;
	let mut rendered = 0;

	for line in content.lines() {
		match Sentinel::parse(line) {
			Some(Sentinel::TagStart(name)) => {
				if tag == Some(name.as_str()) {
					include = true;
				}
			}
			Some(Sentinel::TagEnd(name)) => {
				if tag == Some(name.as_str()) {
					include = false;
				}
			}
			Some(Sentinel::HighlightStart) => highlighting = true,
			Some(Sentinel::HighlightEnd) => highlighting = false,
			None if include => {
				let style = if highlighting || !snapshot.contains(line) {
					LineStyle::Highlighted
				} else {
					LineStyle::Unchanged
				};
				renderer.line(if line.is_empty() { " " } else { line }, style);
				rendered += 1;
			}
			None => {}
		}
	}

	rendered
}

/// Write `content` until the file's modification time is later than `prior`
/// and not in the future. When polling runs out the timestamp is set
/// explicitly.
fn persist(
	path: &Path,
	content: &str,
	prior: SystemTime,
	options: PersistOptions,
) -> EditResult<SystemTime> {
	let attempts = options.max_attempts.max(1);

	for attempt in 1..=attempts {
		write_file(path, content)?;
		let modified = fs::metadata(path)?.modified()?;

		if modified > prior && SystemTime::now() >= modified {
			tracing::debug!(path = %path.display(), attempt, "persisted");
			return Ok(modified);
		}

		if attempt < attempts {
			thread::sleep(options.poll_interval);
		}
	}

	File::options()
		.write(true)
		.open(path)?
		.set_modified(prior + FORCED_ADVANCE)?;
	let modified = fs::metadata(path)?.modified()?;

	if modified > prior {
		tracing::warn!(path = %path.display(), "forced modification time forward");
		return Ok(modified);
	}

	Err(EditError::TimestampStalled {
		path: path.display().to_string(),
		attempts,
	})
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
	let mut file = File::create(path)?;
	file.write_all(content.as_bytes())?;
	file.sync_all()
}
