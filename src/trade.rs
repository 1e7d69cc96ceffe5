//! Trades through a triad and their slippage bounds
//!
//! A trade has two input legs and one output leg. Bounds are computed with
//! multiply-then-divide on `U256`, never floats.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::constants::BPS_DENOMINATOR;
use crate::error::{Result, SdkError};
use crate::tokens::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    /// Both inputs are fixed; the output is a quote
    ExactInput,
    /// The output is fixed; the inputs are quotes
    ExactOutput,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::ExactInput => write!(f, "EXACT_INPUT"),
            TradeType::ExactOutput => write!(f, "EXACT_OUTPUT"),
        }
    }
}

/// One quoted swap: `input1 + input2 -> output`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    input1: TokenAmount,
    input2: TokenAmount,
    output: TokenAmount,
    trade_type: TradeType,
}

/// Checked `value * numerator / BPS_DENOMINATOR`, rounded down or up
fn scale_bps(value: U256, numerator: u64, round_up: bool) -> Result<U256> {
    let denominator = U256::from(BPS_DENOMINATOR);
    let product = value
        .checked_mul(U256::from(numerator))
        .ok_or(SdkError::AmountOverflow)?;
    let quotient = product / denominator;
    if round_up && !(product % denominator).is_zero() {
        return quotient.checked_add(U256::from(1u64)).ok_or(SdkError::AmountOverflow);
    }
    Ok(quotient)
}

fn ensure_slippage(slippage_bps: i64) -> Result<u64> {
    u64::try_from(slippage_bps).map_err(|_| SdkError::InvalidSlippage(slippage_bps))
}

impl Trade {
    /// All three legs must be on the same chain
    pub fn new(input1: TokenAmount, input2: TokenAmount, output: TokenAmount, trade_type: TradeType) -> Result<Self> {
        let chain = input1.token().chain_id();
        for leg in [&input2, &output] {
            if leg.token().chain_id() != chain {
                return Err(SdkError::ChainMismatch {
                    left: chain.id(),
                    right: leg.token().chain_id().id(),
                });
            }
        }
        Ok(Self { input1, input2, output, trade_type })
    }

    pub fn input1(&self) -> &TokenAmount {
        &self.input1
    }

    pub fn input2(&self) -> &TokenAmount {
        &self.input2
    }

    pub fn output(&self) -> &TokenAmount {
        &self.output
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_amounts(&self) -> [&TokenAmount; 2] {
        [&self.input1, &self.input2]
    }

    /// `[input1, input2, output]` tokens in the trade's own leg order
    pub fn path(&self) -> [&Token; 3] {
        [self.input1.token(), self.input2.token(), self.output.token()]
    }

    /// Worst-case output the caller accepts at `slippage_bps`.
    ///
    /// Exact-output trades return the fixed output unchanged. Exact-input
    /// trades return `floor(output * (10000 - bps) / 10000)`, which is 0 from
    /// 10000 bps up.
    pub fn min_amount_out(&self, slippage_bps: i64) -> Result<TokenAmount> {
        let bps = ensure_slippage(slippage_bps)?;
        match self.trade_type {
            TradeType::ExactOutput => Ok(self.output.clone()),
            TradeType::ExactInput => {
                let bounded = scale_bps(self.output.raw(), BPS_DENOMINATOR.saturating_sub(bps), false)?;
                Ok(TokenAmount::new(bounded, self.output.token().clone()))
            }
        }
    }

    /// Worst-case inputs the caller accepts at `slippage_bps`.
    ///
    /// Exact-input trades return the fixed inputs unchanged. Exact-output
    /// trades scale the combined input up by `(10000 + bps) / 10000`, rounded
    /// up, and split the added margin evenly between the legs. An odd unit of
    /// margin goes to `input1`.
    pub fn max_amounts_in(&self, slippage_bps: i64) -> Result<[TokenAmount; 2]> {
        let bps = ensure_slippage(slippage_bps)?;
        match self.trade_type {
            TradeType::ExactInput => Ok([self.input1.clone(), self.input2.clone()]),
            TradeType::ExactOutput => {
                let total = self
                    .input1
                    .raw()
                    .checked_add(self.input2.raw())
                    .ok_or(SdkError::AmountOverflow)?;
                let numerator = BPS_DENOMINATOR.checked_add(bps).ok_or(SdkError::AmountOverflow)?;
                let bounded = scale_bps(total, numerator, true)?;
                let margin = bounded - total;
                let half = margin / U256::from(2u64);

                let first = self
                    .input1
                    .raw()
                    .checked_add(margin - half)
                    .ok_or(SdkError::AmountOverflow)?;
                let second = self
                    .input2
                    .raw()
                    .checked_add(half)
                    .ok_or(SdkError::AmountOverflow)?;

                Ok([
                    TokenAmount::new(first, self.input1.token().clone()),
                    TokenAmount::new(second, self.input2.token().clone()),
                ])
            }
        }
    }
}

// ============================================
// TESTS
// ============================================
