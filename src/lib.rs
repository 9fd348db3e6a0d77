//! Read-only chain inspection: connect a wallet, read chain state, print a report.

pub mod core;
pub mod screens;
pub mod utils;
