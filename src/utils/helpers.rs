/// Helper utilities for formatting report values

use chrono::{SecondsFormat, Utc};
use ethers::types::U256;

use crate::utils::NATIVE_DECIMALS;

/// Format a base-unit amount as a decimal string of the native asset.
///
/// Integer arithmetic only: `10^18` wei is `"1"`, `1` wei is
/// `"0.000000000000000001"`. Trailing fractional zeros are dropped.
pub fn format_native(wei: U256) -> String {
    format_units_exact(wei, NATIVE_DECIMALS)
}

pub fn format_units_exact(amount: U256, decimals: usize) -> String {
    let unit = U256::exp10(decimals);
    let (whole, fraction) = amount.div_mod(unit);

    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Current UTC time as ISO-8601 with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
