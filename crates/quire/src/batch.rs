//! Conversion of many independent documents at once.

use rayon::prelude::*;

use crate::Result;
use crate::common::Format;
use crate::export::{ExportFile, export};
use crate::options::ConvertOptions;

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub markup: String,
    pub title: String,
    pub format: Format,
}

/// Exports every job on the rayon pool. Results are in input order.
pub fn convert_all(jobs: &[ExportJob], options: &ConvertOptions) -> Vec<Result<ExportFile>> {
    jobs.par_iter()
        .map(|job| export(&job.markup, &job.title, job.format, options))
        .collect()
}
