//! Governance vote messages.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::gov::v1beta1::{MsgVote as MsgVoteProto, VoteOption};
use prost::Message as _;

use super::registry::{MessageRegistry, ParseError};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Link, Message},
};

/// The type URL this parser is registered under.
pub const TYPE_URL: &str = "/cosmos.gov.v1beta1.MsgVote";

/// A parsed `MsgVote`.
#[derive(Debug)]
pub struct MsgVote {
    chain: String,
    /// Voting wallet.
    pub voter: Link,
    /// Proposal being voted on.
    pub proposal: Link,
    /// Human-readable vote option.
    pub option: String,
}

/// Decodes a `MsgVote` payload.
pub fn parse(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgVoteProto::decode(data)?;
    Ok(Some(Box::new(MsgVote {
        chain: chain.name.clone(),
        voter: Link::new(msg.voter),
        proposal: Link::new(msg.proposal_id.to_string()),
        option: option_label(msg.option),
    })))
}

fn option_label(option: i32) -> String {
    match VoteOption::try_from(option) {
        Ok(VoteOption::Yes) => "Yes".to_string(),
        Ok(VoteOption::Abstain) => "Abstain".to_string(),
        Ok(VoteOption::No) => "No".to_string(),
        Ok(VoteOption::NoWithVeto) => "No with veto".to_string(),
        Ok(VoteOption::Unspecified) | Err(_) => format!("Unknown ({option})"),
    }
}

#[async_trait]
impl Message for MsgVote {
    fn message_type(&self) -> &'static str {
        TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), TYPE_URL.to_string()),
            ("proposal_vote.voter".to_string(), self.voter.value.clone()),
            ("proposal_vote.proposal_id".to_string(), self.proposal.value.clone()),
            ("proposal_vote.option".to_string(), self.option.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.voter);
        fetcher.enrich_proposal_link(&self.chain, &mut self.proposal).await;
    }
}
