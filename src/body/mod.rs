//! Request body assembly.
//!
//! This module turns the body block of a document into a [`BodySource`],
//! splicing in upload files, and applies the form-urlencoded transforms.

mod assembler;
pub(crate) mod form;
mod source;
mod stream;

pub(crate) use assembler::assemble_body;
pub use source::{BodySegment, BodySource};
pub use stream::BodyReader;
