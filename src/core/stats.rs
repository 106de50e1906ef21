//! Aggregate statistics over the filtered set

use serde::{Deserialize, Serialize};

/// Sums over every record matching the filters, independent of paging
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesStats {
    pub total_quantity: i64,
    /// Sum of final amounts, rounded to 2 decimals
    pub total_amount: f64,
    /// Sum of (total amount - final amount), rounded to 2 decimals
    pub total_discount: f64,
}

impl SalesStats {
    /// Build from raw sums, rounding the monetary ones
    pub fn from_sums(total_quantity: i64, total_amount: f64, total_discount: f64) -> Self {
        Self {
            total_quantity,
            total_amount: round_decimals(total_amount, 2),
            total_discount: round_decimals(total_discount, 2),
        }
    }
}

/// Round to the given number of decimal places (half away from zero)
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
