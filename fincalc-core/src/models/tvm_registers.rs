use serde::{Deserialize, Serialize};

/// Whether payments fall at the start or the end of each period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    Begin,
    #[default]
    End,
}

/// One of the five time-value-of-money registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    Periods,
    InterestRate,
    PresentValue,
    Payment,
    FutureValue,
}

impl Register {
    pub const ALL: [Register; 5] = [
        Self::Periods,
        Self::InterestRate,
        Self::PresentValue,
        Self::Payment,
        Self::FutureValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Periods => "N",
            Self::InterestRate => "I/YR",
            Self::PresentValue => "PV",
            Self::Payment => "PMT",
            Self::FutureValue => "FV",
        }
    }
}

/// The TVM register file plus the two settings that shape every solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvmRegisters {
    /// Number of payment periods.
    pub n: f64,
    /// Nominal annual interest rate, in percent.
    pub iyr: f64,
    pub pv: f64,
    pub pmt: f64,
    pub fv: f64,
    pub payments_per_year: u32,
    pub timing: PaymentTiming,
}

impl Default for TvmRegisters {
    fn default() -> Self {
        Self {
            n: 0.0,
            iyr: 0.0,
            pv: 0.0,
            pmt: 0.0,
            fv: 0.0,
            payments_per_year: 12,
            timing: PaymentTiming::End,
        }
    }
}

impl TvmRegisters {
    /// Interest rate per payment period as a fraction (`I/YR / 100 / P/YR`).
    pub fn periodic_rate(&self) -> f64 {
        self.iyr / 100.0 / f64::from(self.payments_per_year)
    }

    pub fn get(
        &self,
        register: Register,
    ) -> f64 {
        match register {
            Register::Periods => self.n,
            Register::InterestRate => self.iyr,
            Register::PresentValue => self.pv,
            Register::Payment => self.pmt,
            Register::FutureValue => self.fv,
        }
    }

    pub fn set(
        &mut self,
        register: Register,
        value: f64,
    ) {
        match register {
            Register::Periods => self.n = value,
            Register::InterestRate => self.iyr = value,
            Register::PresentValue => self.pv = value,
            Register::Payment => self.pmt = value,
            Register::FutureValue => self.fv = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_registers_use_monthly_end_of_period_payments() {
        let registers = TvmRegisters::default();

        assert_eq!(registers.payments_per_year, 12);
        assert_eq!(registers.timing, PaymentTiming::End);
        assert_eq!(registers.n, 0.0);
    }

    #[test]
    fn periodic_rate_divides_annual_percent_by_payments_per_year() {
        let registers = TvmRegisters {
            iyr: 12.0,
            ..TvmRegisters::default()
        };

        assert!((registers.periodic_rate() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn set_then_get_addresses_the_same_register() {
        let mut registers = TvmRegisters::default();

        for (i, register) in Register::ALL.into_iter().enumerate() {
            registers.set(register, i as f64 + 1.0);
        }

        assert_eq!(registers.n, 1.0);
        assert_eq!(registers.iyr, 2.0);
        assert_eq!(registers.pv, 3.0);
        assert_eq!(registers.pmt, 4.0);
        assert_eq!(registers.get(Register::FutureValue), 5.0);
    }

    #[test]
    fn timing_deserializes_from_lowercase_names() {
        let timing: PaymentTiming = serde_json::from_str("\"begin\"").unwrap();

        assert_eq!(timing, PaymentTiming::Begin);
    }
}
