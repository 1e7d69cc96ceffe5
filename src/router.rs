//! Router call assembly
//!
//! Turns a quoted `Trade` into the method name, hex arguments, attached value
//! and ABI calldata for the 3Swap router. Nothing here touches the network.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::ChainId;
use crate::error::{Result, SdkError};
use crate::tokens::wrapped_native;
use crate::trade::Trade;
use crate::utils::{number_to_hex, validate_and_parse_address};

// ============================================
// SOLIDITY INTERFACES
// ============================================

sol! {
    /// 3Swap router entry points for two-input triad swaps
    interface I3SwapRouter {
        function swapExactETHForTokens(
            uint256 amountIn2,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);

        function swapExactTokensForETH(
            uint256 amountIn1,
            uint256 amountIn2,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function swapExactTokensForTokens(
            uint256 amountIn1,
            uint256 amountIn2,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    }
}

// ============================================
// TYPES
// ============================================

/// Caller options for a swap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOptions {
    /// Tolerated price movement in basis points
    pub slippage_bps: i64,
    /// Seconds from now until the transaction is invalid
    pub deadline_seconds: i64,
    /// Account receiving the swap output
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMethod {
    ExactEthForTokens,
    ExactTokensForEth,
    ExactTokensForTokens,
}

impl SwapMethod {
    pub fn name(self) -> &'static str {
        match self {
            SwapMethod::ExactEthForTokens => "swapExactETHForTokens",
            SwapMethod::ExactTokensForEth => "swapExactTokensForETH",
            SwapMethod::ExactTokensForTokens => "swapExactTokensForTokens",
        }
    }
}

impl std::fmt::Display for SwapMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single hex value or the hex address path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArg {
    Value(String),
    List(Vec<String>),
}

/// Payload for a transaction-submission layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCallParams {
    pub method_name: String,
    /// Arguments in call order, all hex-encoded
    pub args: Vec<CallArg>,
    /// Native currency to attach, in hex wei
    pub value: String,
    /// ABI-encoded call for `method_name(args)`
    pub calldata: Bytes,
}

// ============================================
// ROUTER
// ============================================

pub struct Router;

impl Router {
    /// Build swap call parameters with a deadline relative to the current time
    pub fn swap_call_parameters(trade: &Trade, chain_id: ChainId, options: &TradeOptions) -> Result<SwapCallParams> {
        Self::swap_call_parameters_at(trade, chain_id, options, chrono::Utc::now().timestamp())
    }

    /// Build swap call parameters with the deadline counted from `now_unix`
    pub fn swap_call_parameters_at(
        trade: &Trade,
        chain_id: ChainId,
        options: &TradeOptions,
        now_unix: i64,
    ) -> Result<SwapCallParams> {
        let path = trade.path();

        for token in path {
            if token.chain_id() != chain_id {
                return Err(SdkError::ChainMismatch {
                    left: chain_id.id(),
                    right: token.chain_id().id(),
                });
            }
        }
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            if path[i] == path[j] {
                return Err(SdkError::IdenticalToken(path[i].address()));
            }
        }
        if options.deadline_seconds <= 0 {
            return Err(SdkError::InvalidDeadline(options.deadline_seconds));
        }

        let wrapped = wrapped_native(chain_id).ok_or(SdkError::UnsupportedChain(chain_id.id()))?;
        let to = validate_and_parse_address(&options.recipient)?;

        let [amount_in1, amount_in2] = trade.max_amounts_in(options.slippage_bps)?;
        let amount_out = trade.min_amount_out(options.slippage_bps)?;

        let deadline = now_unix
            .checked_add(options.deadline_seconds)
            .and_then(|d| u64::try_from(d).ok())
            .ok_or(SdkError::InvalidDeadline(options.deadline_seconds))?;

        let ether_in = *path[0] == wrapped || *path[1] == wrapped;
        let ether_out = *path[2] == wrapped;
        if ether_in && *path[0] != wrapped {
            return Err(SdkError::InvalidPath(format!(
                "{} input must be the first path entry",
                wrapped.symbol()
            )));
        }

        let method = if ether_in {
            SwapMethod::ExactEthForTokens
        } else if ether_out {
            SwapMethod::ExactTokensForEth
        } else {
            SwapMethod::ExactTokensForTokens
        };

        let path_addresses: Vec<Address> = path.iter().map(|t| t.address()).collect();
        let path_arg = CallArg::List(path_addresses.iter().map(|a| a.to_checksum(None)).collect());
        let to_arg = CallArg::Value(to.to_checksum(None));
        let deadline_arg = CallArg::Value(number_to_hex(deadline));
        let deadline_u256 = U256::from(deadline);

        let (args, value, calldata) = match method {
            SwapMethod::ExactEthForTokens => {
                let call = I3SwapRouter::swapExactETHForTokensCall {
                    amountIn2: amount_in2.raw(),
                    amountOutMin: amount_out.raw(),
                    path: path_addresses,
                    to,
                    deadline: deadline_u256,
                };
                (
                    vec![
                        CallArg::Value(amount_in2.to_hex()),
                        CallArg::Value(amount_out.to_hex()),
                        path_arg,
                        to_arg,
                        deadline_arg,
                    ],
                    amount_in1.to_hex(),
                    call.abi_encode(),
                )
            }
            SwapMethod::ExactTokensForEth | SwapMethod::ExactTokensForTokens => {
                let calldata = if method == SwapMethod::ExactTokensForEth {
                    I3SwapRouter::swapExactTokensForETHCall {
                        amountIn1: amount_in1.raw(),
                        amountIn2: amount_in2.raw(),
                        amountOutMin: amount_out.raw(),
                        path: path_addresses,
                        to,
                        deadline: deadline_u256,
                    }
                    .abi_encode()
                } else {
                    I3SwapRouter::swapExactTokensForTokensCall {
                        amountIn1: amount_in1.raw(),
                        amountIn2: amount_in2.raw(),
                        amountOutMin: amount_out.raw(),
                        path: path_addresses,
                        to,
                        deadline: deadline_u256,
                    }
                    .abi_encode()
                };
                (
                    vec![
                        CallArg::Value(amount_in1.to_hex()),
                        CallArg::Value(amount_in2.to_hex()),
                        CallArg::Value(amount_out.to_hex()),
                        path_arg,
                        to_arg,
                        deadline_arg,
                    ],
                    "0x0".to_string(),
                    calldata,
                )
            }
        };

        debug!(
            "Router: {} on {} ({} -> {}), value {}",
            method,
            chain_id,
            trade.trade_type(),
            path.iter().map(|t| t.symbol()).collect::<Vec<_>>().join(" + "),
            value
        );

        Ok(SwapCallParams {
            method_name: method.name().to_string(),
            args,
            value,
            calldata: Bytes::from(calldata),
        })
    }
}

// ============================================
// TESTS
// ============================================
