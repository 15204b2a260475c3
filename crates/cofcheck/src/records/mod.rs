//! Typed records of the curated database.

mod exceptions;
mod framework;
mod paper;
mod store;

pub use exceptions::{ExceptionList, ExceptionPair};
pub use framework::{
    DUPLICATE_COLUMN, FRAMEWORK_ID_COLUMN, FrameworkRecord, NAME_COLUMN, NO_DUPLICATE,
    PAPER_PREFIX_LEN, derive_paper_id,
};
pub use paper::{DOI_COLUMN, PAPER_ID_COLUMN, PaperRecord};
pub use store::Database;
