pub mod reporter;

pub use reporter::{format_line, BatchSummary, Reporter, EXTENDED_HEADER};
