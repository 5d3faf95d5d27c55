mod reader;
mod sniff;
mod writer;

pub use sniff::delimiter_name;
pub use reader::{SourceTable, load_consolidated, read_source_file};
pub use writer::write_table;
