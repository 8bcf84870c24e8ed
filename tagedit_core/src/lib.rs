//! `tagedit_core` is the core library for tagedit, a scripted editor for
//! tutorial source files. It locates regions of a file, lets a script rewrite
//! them, and wraps them in comment sentinels so that a renderer can later show
//! only a tagged excerpt of the file with its changes highlighted.
//!
//! ## Processing Pipeline
//!
//! ```text
//! File on disk
//!   → EditSession (load, snapshot lines)
//!   → Script (Buffer::edit / declaration / substitute, mark, highlight)
//!   → Persist (write until the modification time advances)
//!   → Render (drop sentinels, filter by tag, classify against the snapshot)
//! ```
//!
//! ## Sentinels
//!
//! Tags (`START:name` / `END:name`) and highlight spans (`START_HIGHLIGHT` /
//! `END_HIGHLIGHT`) are whole comment lines whose syntax follows the sniffed
//! dialect of the region they wrap: `<!-- START:name -->` for markup,
//! `//#START:name` for `;`-terminated code, `/* START_HIGHLIGHT */` for
//! selector blocks and `#START:name` otherwise. They stay in the file until
//! [`clear_all_marks`] or [`clear_highlights`] removes them.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `tagedit.toml`.
//! - [`dialect`]: Dialect sniffing and sentinel syntax.
//!
//! ## Key Types
//!
//! - [`Buffer`]: The text under edit, with every region operation as a
//!   method.
//! - [`Target`]: A literal or pattern to locate.
//! - [`EditSession`]: Applies one script to one file and renders the result.
//! - [`Renderer`] / [`EventLog`] / [`DataReader`]: Collaborators injected by
//!   the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use tagedit_core::EditOptions;
//! use tagedit_core::EditSession;
//! use tagedit_core::RecordingRenderer;
//! use tagedit_core::TracingLog;
//!
//! let mut renderer = RecordingRenderer::default();
//! let mut log = TracingLog;
//! let report = EditSession::new(&mut renderer, &mut log).run(
//! 	Path::new("app/models/product.rb"),
//! 	Some("validation"),
//! 	|buffer| {
//! 		buffer.declaration("Product", &EditOptions::default().marked("validation"))?;
//! 		Ok(())
//! 	},
//! )?;
//! assert!(report.is_ok());
//! # Ok::<(), tagedit_core::EditError>(())
//! ```

pub use buffer::*;
pub use cleaner::*;
pub use config::*;
pub use data::*;
pub use error::*;
pub use marker::*;
pub use matcher::*;
pub use session::*;
pub use substitute::*;

mod buffer;
mod cleaner;
pub mod config;
mod data;
pub mod dialect;
#[allow(unused_assignments)]
mod error;
mod marker;
mod matcher;
mod session;
mod substitute;
