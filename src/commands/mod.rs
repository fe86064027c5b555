pub mod baseline;
pub mod check;
pub mod init;
pub mod thresholds;

pub use check::{run_check, CheckConfig, CheckStatus};
