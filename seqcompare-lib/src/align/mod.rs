pub mod aligners;
pub mod alignment;
pub mod io;
pub mod pairwise;
pub mod scoring;
pub mod traceback;

pub use aligners::{constants::MoveKind, Builder, GlobalAligner};
pub use alignment::Alignment;
pub use io::{ReportFormat, ReportWriter};
pub use pairwise::{PairReport, PairwiseDriver};
