use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use globset::GlobBuilder;
use ignore::WalkBuilder;
use miette::Diagnostic;
use owo_colors::OwoColorize;
use tagedit_cli::Commands;
use tagedit_cli::OutputFormat;
use tagedit_cli::RegionArgs;
use tagedit_cli::TageditCli;
use tagedit_core::AnyEmptyResult;
use tagedit_core::AnyResult;
use tagedit_core::Buffer;
use tagedit_core::DataDir;
use tagedit_core::DataReader;
use tagedit_core::EditConfig;
use tagedit_core::EditError;
use tagedit_core::EditOptions;
use tagedit_core::EditSession;
use tagedit_core::LineStyle;
use tagedit_core::RecordingRenderer;
use tagedit_core::Renderer;
use tagedit_core::SubstituteMode;
use tagedit_core::Target;
use tagedit_core::TracingLog;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Crates whose log level `TAGEDIT_LOG=<level>` sets.
const LOG_TARGETS: [&str; 2] = ["tagedit_core", "tagedit_cli"];

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = TageditCli::parse();

	// Respect NO_COLOR env var, --no-color flag and non-terminal output.
	let use_color = !args.no_color
		&& env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let Some(command) = &args.command else {
		eprintln!("No subcommand specified. Run `tagedit --help` for usage.");
		process::exit(1);
	};

	let result = Workspace::load(&args).and_then(|workspace| run(&args, &workspace, command));

	match result {
		Ok(true) => {}
		// The script failed but the file was written and rendered.
		Ok(false) => process::exit(1),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<EditError>() {
				Ok(edit_err) => {
					let report: miette::Report = (*edit_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `TAGEDIT_LOG` takes either a bare level, applied to the
/// tagedit crates, or a full filter. `RUST_LOG` is used as-is.
fn init_tracing(verbose: bool) {
	let filter = if let Ok(tagedit_log) = env::var("TAGEDIT_LOG") {
		expand_tagedit_log(&tagedit_log)
	} else if let Ok(rust_log) = env::var("RUST_LOG") {
		EnvFilter::new(rust_log)
	} else if verbose {
		expand_tagedit_log("debug")
	} else {
		EnvFilter::new("warn")
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init()
		.ok();
}

fn expand_tagedit_log(tagedit_log: &str) -> EnvFilter {
	if tagedit_log.contains(['=', ',', ':']) {
		return EnvFilter::new(tagedit_log);
	}

	let targets = LOG_TARGETS
		.iter()
		.map(|target| format!("{target}={tagedit_log}"))
		.collect::<Vec<_>>()
		.join(",");
	EnvFilter::new(format!("warn,{targets}"))
}

fn resolve_root(args: &TageditCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The project root with its configuration.
struct Workspace {
	root: PathBuf,
	config: EditConfig,
}

impl Workspace {
	fn load(args: &TageditCli) -> AnyResult<Self> {
		let root = resolve_root(args);
		let config = EditConfig::load(&root)?.unwrap_or_default();
		Ok(Self { root, config })
	}

	fn data(&self) -> DataDir {
		self.config.data_dir(&self.root)
	}
}

/// Prints rendered lines to the terminal as they arrive. Highlighted lines
/// are prefixed with `>` so they stand out without color.
struct TerminalRenderer;

impl Renderer for TerminalRenderer {
	fn line(&mut self, text: &str, style: LineStyle) {
		match style {
			LineStyle::Command => println!("{}", colored!(format!("$ {text}"), bold)),
			LineStyle::Unchanged => println!("  {text}"),
			LineStyle::Highlighted => println!("{}", colored!(format!("> {text}"), green)),
		}
	}

	fn trace(&mut self, error: &EditError) {
		eprintln!("{} {error}", colored!("error:", red));
		if let Some(help) = error.help() {
			eprintln!("  {} {help}", colored!("help:", yellow));
		}
	}
}

fn run(args: &TageditCli, workspace: &Workspace, command: &Commands) -> AnyResult<bool> {
	match command {
		Commands::Show { file, render } => {
			run_session(args, workspace, file, render.tag.as_deref(), |_| Ok(()))
		}
		Commands::Edit {
			file,
			target,
			pattern,
			region,
			render,
		} => run_edit(args, workspace, file, target, *pattern, region, render.tag.as_deref()),
		Commands::Declaration {
			file,
			name,
			region,
			render,
		} => run_declaration(args, workspace, file, name, region, render.tag.as_deref()),
		Commands::Sub {
			file,
			pattern,
			replacement,
			optional,
			highlight,
			mark,
			render,
		} => {
			let mode = if *optional {
				SubstituteMode::Optional
			} else if *highlight {
				SubstituteMode::Highlight
			} else if let Some(name) = mark {
				SubstituteMode::Mark(name.clone())
			} else {
				SubstituteMode::Required
			};
			run_session(args, workspace, file, render.tag.as_deref(), |buffer| {
				buffer.substitute(pattern, replacement, &mode)?;
				Ok(())
			})
		}
		Commands::Clear {
			file,
			highlights_only,
		} => {
			run_session(args, workspace, file, None, |buffer| {
				if *highlights_only {
					buffer.clear_highlights();
				} else {
					buffer.clear_all_marks();
				}
				Ok(())
			})
		}
	}
}

/// Resolve `file` against `root`. A file argument containing `*` is expanded
/// to its first match in path order, or used literally when nothing matches.
fn resolve_file(root: &Path, file: &Path) -> AnyResult<PathBuf> {
	let path = root.join(file);
	let Some(pattern) = file.to_str().filter(|pattern| pattern.contains('*')) else {
		return Ok(path);
	};

	let matcher = GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()?
		.compile_matcher();
	let base = path
		.components()
		.take_while(|component| !component.as_os_str().to_string_lossy().contains('*'))
		.collect::<PathBuf>();

	let mut matches = WalkBuilder::new(&base)
		.standard_filters(false)
		.build()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
		.map(ignore::DirEntry::into_path)
		.filter(|candidate| {
			let relative = if file.is_absolute() {
				candidate.as_path()
			} else {
				candidate.strip_prefix(root).unwrap_or(candidate)
			};
			matcher.is_match(relative)
		})
		.collect::<Vec<_>>();
	matches.sort();

	Ok(matches.into_iter().next().unwrap_or(path))
}

/// Run `script` on `file` and render the result in the requested format.
/// Returns whether the script succeeded.
fn run_session<F>(
	args: &TageditCli,
	workspace: &Workspace,
	file: &Path,
	tag: Option<&str>,
	script: F,
) -> AnyResult<bool>
where
	F: FnOnce(&mut Buffer) -> AnyEmptyResult,
{
	let path = resolve_file(&workspace.root, file)?;
	let persist = workspace.config.persist_options();
	let mut log = TracingLog;

	match args.format {
		OutputFormat::Text => {
			let mut renderer = TerminalRenderer;
			let report = EditSession::new(&mut renderer, &mut log)
				.with_persist_options(persist)
				.run(&path, tag, script)?;
			Ok(report.is_ok())
		}
		OutputFormat::Json => {
			let mut renderer = RecordingRenderer::default();
			let result = EditSession::new(&mut renderer, &mut log)
				.with_persist_options(persist)
				.run(&path, tag, script);
			let ok = result.as_ref().is_ok_and(|report| report.is_ok());
			let output = serde_json::json!({
				"file": path.display().to_string(),
				"ok": ok,
				"lines": renderer.lines,
				"errors": renderer.traces,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
			result?;
			Ok(ok)
		}
	}
}

fn run_edit(
	args: &TageditCli,
	workspace: &Workspace,
	file: &Path,
	target: &str,
	pattern: bool,
	region: &RegionArgs,
	tag: Option<&str>,
) -> AnyResult<bool> {
	let data = workspace.data();
	let options = edit_options(region);

	run_session(args, workspace, file, tag, |buffer| {
		let target = if pattern {
			Target::pattern(target)?
		} else {
			Target::from(target)
		};
		buffer.edit_with(target, &options, |part| replace_region(part, region, &data))
	})
}

fn run_declaration(
	args: &TageditCli,
	workspace: &Workspace,
	file: &Path,
	name: &str,
	region: &RegionArgs,
	tag: Option<&str>,
) -> AnyResult<bool> {
	let data = workspace.data();
	let options = edit_options(region);

	run_session(args, workspace, file, tag, |buffer| {
		buffer.declaration_with(name, &options, |part| replace_region(part, region, &data))
	})
}

fn edit_options(region: &RegionArgs) -> EditOptions {
	let mut options = EditOptions::default();
	if region.highlight {
		options = options.highlighted();
	}
	if let Some(name) = &region.mark {
		options = options.marked(name.clone());
	}
	options
}

/// Replace the located region with `--replace` text or a data file. The
/// replacement ends with a newline exactly when the region did.
fn replace_region(part: &mut Buffer, region: &RegionArgs, data: &DataDir) -> AnyEmptyResult {
	let mut replacement = match (&region.replace, &region.from_data) {
		(Some(text), _) => text.clone(),
		(None, Some(name)) => data.read(name)?,
		(None, None) => return Ok(()),
	};

	match (part.ends_with('\n'), replacement.ends_with('\n')) {
		(true, false) => replacement.push('\n'),
		(false, true) => {
			replacement.pop();
		}
		_ => {}
	}

	part.set_all(replacement);
	Ok(())
}
