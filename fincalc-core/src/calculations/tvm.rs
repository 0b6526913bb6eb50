//! Time-value-of-money solvers.
//!
//! Each solver reads four of the five registers and returns the fifth. All
//! share the periodic rate `r = I/YR / 100 / P/YR`, and begin-mode payments
//! are weighted by one extra period of growth `(1 + r)`.
//!
//! | Target | Method                                                        |
//! |--------|---------------------------------------------------------------|
//! | PMT    | closed form (linear when `r = 0`)                             |
//! | PV     | closed form                                                   |
//! | FV     | closed form                                                   |
//! | N      | logarithmic form, exact for end-mode annuities                |
//! | I/YR   | Newton-Raphson, seeded at 10% per period, 20 iterations max   |
//!
//! # Example
//!
//! ```
//! use fincalc_core::calculations::TvmSolver;
//! use fincalc_core::TvmRegisters;
//!
//! let registers = TvmRegisters {
//!     n: 12.0,
//!     iyr: 12.0,
//!     pv: -1000.0,
//!     fv: 0.0,
//!     ..TvmRegisters::default()
//! };
//!
//! let payment = TvmSolver::new(&registers).payment().unwrap();
//! assert!((payment - 88.8488).abs() < 1e-4);
//! ```

use thiserror::Error;
use tracing::debug;

use crate::calculations::common::finite;
use crate::models::{PaymentTiming, Register, TvmRegisters};

/// Starting periodic rate for the interest-rate search.
const RATE_SEED: f64 = 0.1;

/// Iteration cap for the interest-rate search.
const RATE_MAX_ITERATIONS: u32 = 20;

/// Successive rates closer than this are considered converged.
const RATE_TOLERANCE: f64 = 1e-7;

/// Errors that can occur while solving a TVM register.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TvmError {
    /// The number of periods is zero, so the payment is undefined.
    #[error("cannot solve with zero periods")]
    ZeroPeriods,

    /// With no interest and no payment, the number of periods is undefined.
    #[error("cannot solve periods with zero payment at zero interest")]
    ZeroPayment,

    /// With no payment, compounding from a zero present value is undefined.
    #[error("cannot solve periods with zero payment and zero present value")]
    ZeroPresentValue,

    /// The interest-rate search did not settle within the iteration cap.
    #[error("interest rate did not converge within {iterations} iterations")]
    NoConvergence { iterations: u32 },

    /// The computation produced NaN or infinity.
    #[error("result is not a finite number")]
    NonFinite,
}

/// Solver over a snapshot of the TVM registers.
#[derive(Debug, Clone, Copy)]
pub struct TvmSolver<'a> {
    registers: &'a TvmRegisters,
}

impl<'a> TvmSolver<'a> {
    pub fn new(registers: &'a TvmRegisters) -> Self {
        Self { registers }
    }

    /// Solves for `target` from the other four registers.
    ///
    /// The registers are not modified; the caller stores the result.
    pub fn solve(
        &self,
        target: Register,
    ) -> Result<f64, TvmError> {
        debug!(register = target.label(), "solving TVM register");
        match target {
            Register::Periods => self.periods(),
            Register::InterestRate => self.interest_rate(),
            Register::PresentValue => self.present_value(),
            Register::Payment => self.payment(),
            Register::FutureValue => self.future_value(),
        }
    }

    /// Solves for the periodic payment.
    pub fn payment(&self) -> Result<f64, TvmError> {
        let TvmRegisters { n, pv, fv, .. } = *self.registers;
        let rate = self.registers.periodic_rate();

        if n == 0.0 {
            return Err(TvmError::ZeroPeriods);
        }

        let payment = if rate == 0.0 {
            -(pv + fv) / n
        } else {
            let growth = (1.0 + rate).powf(n);
            let payment = -(pv * rate * growth + fv * rate) / (growth - 1.0);
            payment / self.timing_factor(rate)
        };

        finite(payment).ok_or(TvmError::NonFinite)
    }

    /// Solves for the present value.
    pub fn present_value(&self) -> Result<f64, TvmError> {
        let TvmRegisters { n, pmt, fv, .. } = *self.registers;
        let rate = self.registers.periodic_rate();

        let present_value = if rate == 0.0 {
            -(fv + pmt * n)
        } else {
            let growth = (1.0 + rate).powf(n);
            let payments = pmt * (1.0 - 1.0 / growth) / rate * self.timing_factor(rate);
            -(fv / growth + payments)
        };

        finite(present_value).ok_or(TvmError::NonFinite)
    }

    /// Solves for the future value.
    pub fn future_value(&self) -> Result<f64, TvmError> {
        let TvmRegisters { n, pv, pmt, .. } = *self.registers;
        let rate = self.registers.periodic_rate();

        let future_value = if rate == 0.0 {
            -(pv + pmt * n)
        } else {
            let growth = (1.0 + rate).powf(n);
            let payments = pmt * (growth - 1.0) / rate * self.timing_factor(rate);
            -(pv * growth + payments)
        };

        finite(future_value).ok_or(TvmError::NonFinite)
    }

    /// Solves for the number of periods.
    ///
    /// With a nonzero payment this uses the end-mode logarithmic form for
    /// both timings, so begin-mode results are approximate.
    pub fn periods(&self) -> Result<f64, TvmError> {
        let TvmRegisters { pv, pmt, fv, .. } = *self.registers;
        let rate = self.registers.periodic_rate();

        let periods = if rate == 0.0 {
            if pmt == 0.0 {
                return Err(TvmError::ZeroPayment);
            }
            -(pv + fv) / pmt
        } else if pmt == 0.0 {
            if pv == 0.0 {
                return Err(TvmError::ZeroPresentValue);
            }
            (-fv / pv).ln() / (1.0 + rate).ln()
        } else {
            let annuity = pmt / rate;
            ((annuity - fv) / (annuity + pv)).ln() / (1.0 + rate).ln()
        };

        finite(periods).ok_or(TvmError::NonFinite)
    }

    /// Solves for the nominal annual interest rate, in percent.
    ///
    /// Runs Newton-Raphson on the present-value equation
    /// `PV + FV/(1+r)^N + PMT·k·(1 - (1+r)^-N)/r = 0`.
    pub fn interest_rate(&self) -> Result<f64, TvmError> {
        let mut rate = RATE_SEED;

        for iteration in 0..RATE_MAX_ITERATIONS {
            let (value, slope) = self.rate_equation(rate);
            let next = rate - value / slope;

            if !next.is_finite() {
                return Err(TvmError::NonFinite);
            }
            if (next - rate).abs() < RATE_TOLERANCE {
                debug!(iteration, rate = next, "interest rate converged");
                let annual = next * 100.0 * f64::from(self.registers.payments_per_year);
                return finite(annual).ok_or(TvmError::NonFinite);
            }

            rate = next;
        }

        Err(TvmError::NoConvergence {
            iterations: RATE_MAX_ITERATIONS,
        })
    }

    /// Extra growth applied to payments: `1 + r` in begin mode, 1 otherwise.
    fn timing_factor(
        &self,
        rate: f64,
    ) -> f64 {
        match self.registers.timing {
            PaymentTiming::Begin => 1.0 + rate,
            PaymentTiming::End => 1.0,
        }
    }

    /// Value and derivative of the present-value equation at `rate`.
    fn rate_equation(
        &self,
        rate: f64,
    ) -> (f64, f64) {
        let TvmRegisters { n, pv, pmt, fv, .. } = *self.registers;
        let growth = (1.0 + rate).powf(n);

        // a(r) = (1 - (1+r)^-n) / r
        let annuity = (1.0 - 1.0 / growth) / rate;
        let annuity_slope = n / (rate * growth * (1.0 + rate)) - annuity / rate;
        let future_slope = -n * fv / (growth * (1.0 + rate));

        match self.registers.timing {
            PaymentTiming::End => (
                pv + fv / growth + pmt * annuity,
                future_slope + pmt * annuity_slope,
            ),
            PaymentTiming::Begin => (
                pv + fv / growth + pmt * (1.0 + rate) * annuity,
                future_slope + pmt * (annuity + (1.0 + rate) * annuity_slope),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};

    use super::*;

    fn loan() -> TvmRegisters {
        TvmRegisters {
            n: 12.0,
            iyr: 12.0,
            pv: -1000.0,
            pmt: 0.0,
            fv: 0.0,
            ..TvmRegisters::default()
        }
    }

    fn close(
        actual: f64,
        expected: f64,
        tolerance: f64,
    ) -> bool {
        (actual - expected).abs() <= tolerance * expected.abs().max(1.0)
    }

    // =========================================================================
    // payment tests
    // =========================================================================

    #[test]
    fn payment_matches_standard_loan_formula() {
        let registers = loan();

        let result = TvmSolver::new(&registers).payment().unwrap();

        assert!(close(result, 88.848788, 1e-7), "got {result}");
    }

    #[test]
    fn payment_in_begin_mode_is_discounted_one_period() {
        let registers = TvmRegisters {
            timing: PaymentTiming::Begin,
            ..loan()
        };

        let result = TvmSolver::new(&registers).payment().unwrap();

        assert!(close(result, 88.848788 / 1.01, 1e-7), "got {result}");
    }

    #[test]
    fn payment_is_linear_at_zero_rate() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pv: -1200.0,
            fv: 0.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).payment().unwrap();

        assert_eq!(result, 100.0);
    }

    #[test]
    fn payment_rejects_zero_periods() {
        let registers = TvmRegisters { n: 0.0, ..loan() };

        let result = TvmSolver::new(&registers).payment();

        assert_eq!(result, Err(TvmError::ZeroPeriods));
    }

    // =========================================================================
    // present_value / future_value tests
    // =========================================================================

    #[test]
    fn present_value_discounts_payments_and_future_value() {
        let registers = TvmRegisters {
            pv: 0.0,
            pmt: 88.848788,
            ..loan()
        };

        let result = TvmSolver::new(&registers).present_value().unwrap();

        assert!(close(result, -1000.0, 1e-6), "got {result}");
    }

    #[test]
    fn present_value_is_linear_at_zero_rate() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pmt: 50.0,
            fv: 100.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).present_value().unwrap();

        assert_eq!(result, -700.0);
    }

    #[test]
    fn future_value_compounds_a_lump_sum() {
        let registers = TvmRegisters {
            n: 10.0,
            iyr: 10.0,
            pv: -100.0,
            payments_per_year: 1,
            ..TvmRegisters::default()
        };

        let result = TvmSolver::new(&registers).future_value().unwrap();

        assert!(close(result, 259.374246, 1e-8), "got {result}");
    }

    #[test]
    fn future_value_is_linear_at_zero_rate() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pv: -100.0,
            pmt: -10.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).future_value().unwrap();

        assert_eq!(result, 220.0);
    }

    // =========================================================================
    // periods tests
    // =========================================================================

    #[test]
    fn periods_inverts_the_loan_payment() {
        let registers = TvmRegisters {
            n: 0.0,
            pmt: 88.84878867834166,
            ..loan()
        };

        let result = TvmSolver::new(&registers).periods().unwrap();

        assert!(close(result, 12.0, 1e-9), "got {result}");
    }

    #[test]
    fn periods_uses_compounding_when_payment_is_zero() {
        let registers = TvmRegisters {
            iyr: 10.0,
            pv: -100.0,
            pmt: 0.0,
            fv: 259.374246,
            payments_per_year: 1,
            ..TvmRegisters::default()
        };

        let result = TvmSolver::new(&registers).periods().unwrap();

        assert!(close(result, 10.0, 1e-7), "got {result}");
    }

    #[test]
    fn periods_is_linear_at_zero_rate() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pv: -1000.0,
            pmt: 100.0,
            fv: 0.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).periods().unwrap();

        assert_eq!(result, 10.0);
    }

    #[test]
    fn periods_rejects_zero_payment_at_zero_rate() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pmt: 0.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).periods();

        assert_eq!(result, Err(TvmError::ZeroPayment));
    }

    #[test]
    fn periods_rejects_zero_payment_and_zero_present_value() {
        let registers = TvmRegisters {
            pv: 0.0,
            pmt: 0.0,
            fv: 500.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).periods();

        assert_eq!(result, Err(TvmError::ZeroPresentValue));
    }

    #[test]
    fn periods_reports_non_finite_for_impossible_growth() {
        // A positive PV cannot grow into a positive FV.
        let registers = TvmRegisters {
            pv: 100.0,
            pmt: 0.0,
            fv: 200.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).periods();

        assert_eq!(result, Err(TvmError::NonFinite));
    }

    // =========================================================================
    // interest_rate tests
    // =========================================================================

    #[test]
    fn interest_rate_recovers_loan_rate_in_end_mode() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pmt: 88.84878867834166,
            ..loan()
        };

        let result = TvmSolver::new(&registers).interest_rate().unwrap();

        assert!(close(result, 12.0, 1e-5), "got {result}");
    }

    #[test]
    fn interest_rate_recovers_loan_rate_in_begin_mode() {
        let registers = TvmRegisters {
            iyr: 0.0,
            pmt: 88.84878867834166 / 1.01,
            timing: PaymentTiming::Begin,
            ..loan()
        };

        let result = TvmSolver::new(&registers).interest_rate().unwrap();

        assert!(close(result, 12.0, 1e-5), "got {result}");
    }

    #[test]
    fn interest_rate_fails_when_no_rate_balances_the_cash_flows() {
        // Every cash flow is an outflow, so the equation has no root.
        let registers = TvmRegisters {
            iyr: 0.0,
            pv: -1000.0,
            pmt: -100.0,
            fv: -50.0,
            ..loan()
        };

        let result = TvmSolver::new(&registers).interest_rate();

        assert_eq!(result, Err(TvmError::NonFinite));
    }

    #[test]
    fn interest_rate_gives_up_after_iteration_cap() {
        let registers = TvmRegisters {
            n: 360.0,
            iyr: 0.0,
            pv: 100.0,
            pmt: -1.0,
            fv: -100.0,
            ..TvmRegisters::default()
        };

        let result = TvmSolver::new(&registers).interest_rate();

        assert_eq!(
            result,
            Err(TvmError::NoConvergence {
                iterations: RATE_MAX_ITERATIONS
            })
        );
    }

    // =========================================================================
    // solve tests
    // =========================================================================

    #[test]
    fn solve_dispatches_to_the_requested_register() {
        let registers = loan();
        let solver = TvmSolver::new(&registers);

        assert_eq!(solver.solve(Register::Payment), solver.payment());
        assert_eq!(solver.solve(Register::FutureValue), solver.future_value());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_payment_round_trips_through_present_and_future_value(
            n in 1u32..360,
            annual_rate_bp in 25u32..2000,
            pv in -100_000.0f64..-100.0,
            fv in -10_000.0f64..10_000.0,
            begin in proptest::bool::ANY,
        ) {
            let original = TvmRegisters {
                n: f64::from(n),
                iyr: f64::from(annual_rate_bp) / 100.0,
                pv,
                pmt: 0.0,
                fv,
                payments_per_year: 12,
                timing: if begin { PaymentTiming::Begin } else { PaymentTiming::End },
            };
            let pmt = TvmSolver::new(&original).payment().unwrap();
            let solved = TvmRegisters { pmt, ..original };

            let present_value = TvmSolver::new(&TvmRegisters { pv: 0.0, ..solved })
                .present_value()
                .unwrap();
            let future_value = TvmSolver::new(&TvmRegisters { fv: 0.0, ..solved })
                .future_value()
                .unwrap();

            let scale = pv.abs().max(fv.abs());
            prop_assert!((present_value - pv).abs() <= 1e-6 * scale, "pv {present_value} vs {pv}");
            prop_assert!((future_value - fv).abs() <= 1e-6 * scale, "fv {future_value} vs {fv}");
        }

        #[test]
        fn prop_periods_round_trip_in_end_mode(
            n in 1u32..360,
            annual_rate_bp in 25u32..2000,
            pv in -100_000.0f64..-100.0,
        ) {
            let original = TvmRegisters {
                n: f64::from(n),
                iyr: f64::from(annual_rate_bp) / 100.0,
                pv,
                pmt: 0.0,
                fv: 0.0,
                payments_per_year: 12,
                timing: PaymentTiming::End,
            };
            let pmt = TvmSolver::new(&original).payment().unwrap();

            let periods = TvmSolver::new(&TvmRegisters { n: 0.0, pmt, ..original })
                .periods()
                .unwrap();

            prop_assert!((periods - f64::from(n)).abs() < 1e-6, "n {periods} vs {n}");
        }
    }
}
