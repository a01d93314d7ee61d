//! Transaction-table reconstruction pipeline.
//!
//! Stages run left to right: tokenizer, header locator, column role
//! mapper, row merger, normalizer. [`StatementParser`] composes them.

mod header;
mod merge;
mod normalize;
mod options;
mod roles;
mod statement_parser;
mod tokenizer;

pub use header::{find_header, locate_header, HeaderSignature};
pub use merge::{fold_continuation, merge_rows, RowClass, RowMerger};
pub use normalize::{dedupe_records, Normalizer, Rejection};
pub use options::{ExtractOptions, DEFAULT_DATE_PATTERN};
pub use roles::{classify_header_cell, default_role_rules, map_columns, normalize_header_text, RoleRule};
pub use statement_parser::{StatementParser, StatementSource};
pub use tokenizer::{clean_grid_cell, is_decoration, tokenize_grid_region, tokenize_text, RowTokenizer};
