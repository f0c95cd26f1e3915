pub mod bracket_table;
pub mod inputs_csv;

pub use bracket_table::{
    BracketTableError, DEFAULT_ISR_TABLE, default_bracket_table, parse_bracket_table,
    parse_bracket_table_strict,
};
pub use inputs_csv::{InputsLoadError, load_inputs_from_file, load_inputs_from_str};
