#![doc = include_str!("../README.md")]

pub mod annotate;
pub mod cli;
pub mod join;
pub mod normalize;
pub mod output;
pub mod report;
pub mod smart_reader;
pub mod table;
pub mod vendor;

pub use annotate::{annotate_file, AnnotateConfig};
pub use report::MatchSummary;
pub use vendor::VendorFormat;
