#[macro_use]
mod macros;

pub mod error;
pub mod seq;

pub use error::{BioError, BioResult};
pub use seq::{Seq, SeqKind, Sequence};
