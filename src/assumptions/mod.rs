//! Annual rate assumptions and their monthly equivalents
//!
//! Every rate in the model is quoted annually and compounded monthly. The
//! conversion here is the equivalent-rate form `(1 + r)^(1/12) - 1`, never a
//! linear division by twelve.

mod rates;
mod horizon;

pub use rates::{equivalent_monthly_rate, net_annual_return, MonthlyRates};
pub use horizon::{month_offset, months_between};

/// Number of compounding periods per year
pub const MONTHS_PER_YEAR: u32 = 12;
