pub mod canview;
pub mod filter;
pub mod trace;

pub use canview::CanViewLog;
pub use filter::FilterRule;
pub use trace::TraceSpec;
