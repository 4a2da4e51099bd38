//! File-level helpers behind the `target_assess` binary.
//!
//! Everything here deals with paths: decoding photos from disk, running the
//! library on them and writing preprocessed grids and reports back out.

pub mod cli_config;
pub mod report;
