use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Apply scripted, annotated edits to tutorial source files.",
	long_about = "tagedit edits one file at a time and prints the result with its changes \
	              highlighted.\n\nRegions are located by literal text, by pattern, or by a named \
	              `class`/`def`/`test` block. They can be wrapped in START/END tag comments so that \
	              later runs show only that excerpt, and in START_HIGHLIGHT/END_HIGHLIGHT comments \
	              so that they are emphasized.\n\nQuick start:\n  tagedit show app.rb --tag \
	              index\n  tagedit edit app.rb 'def index' --highlight\n  tagedit clear app.rb"
)]
pub struct TageditCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Config and data files are
	/// resolved against it, and so are relative file arguments.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Output format for the rendered file.
	#[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a file without changing its content.
	///
	/// Sentinel comments are hidden. With `--tag`, only the lines between
	/// `START:<tag>` and `END:<tag>` are shown.
	Show {
		/// The file to render.
		file: PathBuf,

		#[command(flatten)]
		render: RenderArgs,
	},
	/// Edit the first line containing some text, or the first match of a
	/// pattern.
	///
	/// The located region can be replaced, highlighted and wrapped in a named
	/// tag. A missing match is reported after the whole file is shown.
	Edit {
		/// The file to edit.
		file: PathBuf,

		/// The literal text to find. Use `--pattern` to treat it as a regular
		/// expression.
		target: String,

		/// Treat the target as a regular expression.
		#[arg(long, default_value_t = false)]
		pattern: bool,

		#[command(flatten)]
		region: RegionArgs,

		#[command(flatten)]
		render: RenderArgs,
	},
	/// Edit the `class`, `def` or `test` block with the given name.
	///
	/// The block runs from its opening line to the first `end` line at the
	/// same indentation.
	Declaration {
		/// The file to edit.
		file: PathBuf,

		/// The declared name, without quotes.
		name: String,

		#[command(flatten)]
		region: RegionArgs,

		#[command(flatten)]
		render: RenderArgs,
	},
	/// Replace the first capture group of a pattern.
	///
	/// `\1` to `\9` in the replacement insert the text of the corresponding
	/// group.
	Sub {
		/// The file to edit.
		file: PathBuf,

		/// A regular expression with at least one capture group.
		pattern: String,

		/// The replacement for the first capture group.
		replacement: String,

		/// Do nothing if the pattern does not match.
		#[arg(long, default_value_t = false, conflicts_with_all = ["highlight", "mark"])]
		optional: bool,

		/// Highlight the replacement.
		#[arg(long, default_value_t = false, conflicts_with = "mark")]
		highlight: bool,

		/// Wrap the replacement in a tag with this name.
		#[arg(long)]
		mark: Option<String>,

		#[command(flatten)]
		render: RenderArgs,
	},
	/// Remove sentinel comments from a file.
	///
	/// Removes every tag and highlight comment line, or only the highlight
	/// lines with `--highlights-only`.
	Clear {
		/// The file to clean.
		file: PathBuf,

		/// Keep tag comments and remove only highlight comments.
		#[arg(long, default_value_t = false)]
		highlights_only: bool,
	},
}

/// What to do with a located region.
#[derive(Args, Debug, Clone, Default)]
pub struct RegionArgs {
	/// Replace the region with this text.
	#[arg(long, conflicts_with = "from_data")]
	pub replace: Option<String>,

	/// Replace the region with the content of this file from the data
	/// directory.
	#[arg(long)]
	pub from_data: Option<String>,

	/// Highlight the region.
	#[arg(long, default_value_t = false)]
	pub highlight: bool,

	/// Wrap the region in a tag with this name.
	#[arg(long)]
	pub mark: Option<String>,
}

/// How the edited file is shown.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
	/// Only show lines inside this tag.
	#[arg(long)]
	pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text. Highlighted lines start with `>`.
	Text,
	/// JSON with every rendered line and its style.
	Json,
}
