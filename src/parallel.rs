//! Batch parsing of independent documents.
//!
//! Arenas are never shared: every document gets its own, so the batch can be
//! spread across threads when the `parallel` feature is on.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::decode::{self, Document};
use crate::{ParseOptions, Result};

#[cfg(feature = "parallel")]
pub fn parse_many<I>(inputs: &[I], options: &ParseOptions) -> Vec<Result<Document>>
where
    I: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| decode::parse(input.as_ref(), options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn parse_many<I>(inputs: &[I], options: &ParseOptions) -> Vec<Result<Document>>
where
    I: AsRef<[u8]> + Sync,
{
    inputs
        .iter()
        .map(|input| decode::parse(input.as_ref(), options))
        .collect()
}
