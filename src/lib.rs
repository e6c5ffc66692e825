//! Incremental capture of new rows from a periodically refreshed CSV export
//! into an append-only originals file.
//!
//! Stages are chained through the [`RowStream`] trait:
//!
//! ```no_run
//! use originals::{existing_keys, input, schema, RowStream, Table, Window};
//! use chrono::NaiveDate;
//! use encoding::all::UTF_8;
//!
//! # fn main() -> originals::Result<()> {
//! let window = Window::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), 30);
//! let source = input::load_table("export.csv", UTF_8)?;
//! let existing = existing_keys(&input::load_table_or_empty("originals.csv", UTF_8)?, schema::KEY_FIELD);
//!
//! let written = source
//!     .select(schema::ORIGINALS_COLUMNS)?
//!     .recent(schema::DATE_FIELD, window)?
//!     .novel(schema::KEY_FIELD, existing)?
//!     .append_to("originals.csv", schema::ORIGINALS_COLUMNS)?
//!     .run()?;
//! # Ok(())
//! # }
//! ```
mod append;
mod error;
mod headers;
mod keys;
mod novel;
mod recent;
mod row_stream;
mod select;
mod table;
mod tally;

pub mod capture;
pub mod config;
pub mod date;
pub mod input;
pub mod schema;

pub use append::Append;
pub use capture::{run_capture, CaptureReport};
pub use config::{CaptureConfig, Settings};
pub use error::{Error, Result, RowResult};
pub use headers::Headers;
pub use keys::existing_keys;
pub use novel::{Novel, NoveltyTally};
pub use recent::{RecencyTally, Recent, Window};
pub use row_stream::{get_field, RowStream};
pub use select::Select;
pub use table::Table;
pub use tally::Tally;

pub type Row = csv::StringRecord;
