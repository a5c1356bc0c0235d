//! Response shapes for the LCD REST endpoints the fetcher consumes.
//!
//! Only the fields the pipeline reads are modeled; everything else in the
//! responses is ignored.

use serde::Deserialize;

/// A decimal coin as returned by distribution endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecCoin {
    /// Base denom.
    pub denom: String,
    /// Decimal string value in base units.
    pub amount: String,
}

/// Envelope for `/cosmos/staking/v1beta1/validators/{address}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ValidatorResponse {
    pub validator: Validator,
}

/// Validator description block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorDescription {
    /// Display moniker.
    #[serde(default)]
    pub moniker: String,
}

/// A staking validator.
#[derive(Debug, Clone, Deserialize)]
pub struct Validator {
    /// Operator (valoper) address.
    pub operator_address: String,
    /// Description block with the moniker.
    #[serde(default)]
    pub description: ValidatorDescription,
    /// Whether the validator is jailed.
    #[serde(default)]
    pub jailed: bool,
    /// Bond status string.
    #[serde(default)]
    pub status: String,
}

/// Envelope for delegator rewards.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RewardsResponse {
    #[serde(default)]
    pub rewards: Vec<DecCoin>,
}

/// Envelope for validator commission.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommissionResponse {
    pub commission: Commission,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Commission {
    #[serde(default)]
    pub commission: Vec<DecCoin>,
}

/// Envelope for `/cosmos/gov/v1beta1/proposals/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProposalResponse {
    pub proposal: Proposal,
}

/// Governance proposal content block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalContent {
    /// Proposal title.
    #[serde(default)]
    pub title: String,
    /// Proposal description.
    #[serde(default)]
    pub description: String,
}

/// A governance proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct Proposal {
    /// Proposal id as a decimal string.
    pub proposal_id: String,
    /// Content block, absent on some chains' legacy proposals.
    #[serde(default)]
    pub content: Option<ProposalContent>,
    /// Status string.
    #[serde(default)]
    pub status: String,
}

/// Envelope for `/cosmos/staking/v1beta1/params`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StakingParamsResponse {
    pub params: StakingParams,
}

/// Staking module parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StakingParams {
    /// Unbonding period, e.g. `"1814400s"`.
    #[serde(default)]
    pub unbonding_time: String,
    /// The staking bond denom.
    #[serde(default)]
    pub bond_denom: String,
}

/// Envelope for `/ibc/core/channel/v1/channels/{channel}/ports/{port}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChannelResponse {
    pub channel: IbcChannel,
}

/// An IBC channel end.
#[derive(Debug, Clone, Deserialize)]
pub struct IbcChannel {
    /// Channel state string.
    #[serde(default)]
    pub state: String,
    /// The connections this channel rides on. Resolution supports exactly
    /// one hop.
    #[serde(default)]
    pub connection_hops: Vec<String>,
}

/// Envelope for `/ibc/core/connection/v1/connections/{id}/client_state`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectionClientStateResponse {
    pub identified_client_state: IdentifiedClientState,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdentifiedClientState {
    pub client_state: ClientState,
}

/// The counterparty client state of an IBC connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientState {
    /// Chain id of the chain on the other end of the connection.
    #[serde(default)]
    pub chain_id: String,
}

/// Envelope for `/ibc/apps/transfer/v1/denom_traces/{hash}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DenomTraceResponse {
    pub denom_trace: DenomTrace,
}

/// An IBC denom trace: the hops an asset traveled plus its base denom on
/// the chain where it originated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenomTrace {
    /// `port/channel` pairs, slash-joined, newest hop first.
    pub path: String,
    /// The denom exactly as minted on its chain of origin.
    pub base_denom: String,
}
