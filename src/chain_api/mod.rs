//! Typed REST client for a chain's LCD API nodes.

mod client;
mod types;

pub use client::{ChainApiClient, ChainApiError};
pub use types::{
    ClientState, DecCoin, DenomTrace, IbcChannel, Proposal, ProposalContent, StakingParams,
    Validator, ValidatorDescription,
};
