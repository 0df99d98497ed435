//! Income tax slab tables for both regimes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::record::Regime;

/// Health and education cess, percent of slab tax.
pub const CESS_PERCENT: i64 = 4;

/// A slab: income above `floor` is taxed at `rate_percent` on top of `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub floor: i64,
    pub base: i64,
    pub rate_percent: i64,
}

/// Slab table and rebate threshold of one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slabs {
    /// Brackets in ascending order of `floor`.
    pub brackets: &'static [Bracket],
    /// Income at or below this pays no tax.
    pub rebate_limit: i64,
}

const fn bracket(floor: i64, base: i64, rate_percent: i64) -> Bracket {
    Bracket { floor, base, rate_percent }
}

pub const OLD_REGIME: Slabs = Slabs {
    brackets: &[
        bracket(0, 0, 0),
        bracket(250_000, 0, 5),
        bracket(500_000, 62_500, 20),
        bracket(1_000_000, 162_500, 30),
    ],
    rebate_limit: 500_000,
};

pub const NEW_REGIME: Slabs = Slabs {
    brackets: &[
        bracket(0, 0, 0),
        bracket(300_000, 0, 5),
        bracket(700_000, 20_000, 10),
        bracket(1_000_000, 50_000, 15),
        bracket(1_200_000, 80_000, 20),
        bracket(1_500_000, 140_000, 30),
    ],
    rebate_limit: 700_000,
};

impl Slabs {
    /// Slab table for a regime.
    pub fn for_regime(regime: Regime) -> &'static Slabs {
        match regime {
            Regime::Old => &OLD_REGIME,
            Regime::New => &NEW_REGIME,
        }
    }

    /// Slab tax before cess. Negative income is treated as zero.
    pub fn slab_tax(&self, income: Decimal) -> Decimal {
        let income = income.max(Decimal::ZERO);
        if income <= Decimal::from(self.rebate_limit) {
            return Decimal::ZERO;
        }

        self.brackets
            .iter()
            .rev()
            .find(|b| income > Decimal::from(b.floor))
            .map(|b| {
                Decimal::from(b.base)
                    + (income - Decimal::from(b.floor)) * Decimal::new(b.rate_percent, 2)
            })
            .unwrap_or(Decimal::ZERO)
    }

    /// Final liability: slab tax plus cess, rounded half to even.
    pub fn tax(&self, income: Decimal) -> i64 {
        let slab_tax = self.slab_tax(income);
        let with_cess = slab_tax + slab_tax * Decimal::new(CESS_PERCENT, 2);
        with_cess
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .unwrap_or(i64::MAX)
    }
}

/// Old (default) regime liability including cess.
pub fn old_regime_tax(income: impl Into<Decimal>) -> i64 {
    OLD_REGIME.tax(income.into())
}

/// New (alternate) regime liability including cess.
pub fn new_regime_tax(income: impl Into<Decimal>) -> i64 {
    NEW_REGIME.tax(income.into())
}

/// Liability under `regime`.
pub fn regime_tax(regime: Regime, income: impl Into<Decimal>) -> i64 {
    Slabs::for_regime(regime).tax(income.into())
}
