//! State carried from one projection month to the next

/// Balances after the most recent completed month
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionState {
    /// Months completed so far (0 before the first step)
    pub month: u32,
    pub balance_no_withdrawal: f64,
    pub balance_with_withdrawal: f64,
    /// First month at which the zero floor engaged
    pub depletion_month: Option<u32>,
}

impl ProjectionState {
    pub fn new(initial_wealth: f64) -> Self {
        Self {
            month: 0,
            balance_no_withdrawal: initial_wealth,
            balance_with_withdrawal: initial_wealth,
            depletion_month: None,
        }
    }

    /// Advance one month: grow both balances, then take the withdrawal
    ///
    /// The with-withdrawal balance is floored at zero. The overdraft is
    /// discarded, so later months compound from zero. Returns `true` when the
    /// floor engaged this month.
    pub fn advance(&mut self, growth_factor: f64, withdrawal: f64) -> bool {
        self.month += 1;
        self.balance_no_withdrawal *= growth_factor;

        let next = self.balance_with_withdrawal * growth_factor - withdrawal;
        let floored = next < 0.0;
        self.balance_with_withdrawal = if floored { 0.0 } else { next };

        if floored && self.depletion_month.is_none() {
            self.depletion_month = Some(self.month);
        }
        floored
    }
}
