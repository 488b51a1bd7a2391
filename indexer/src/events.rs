//! Typed program events.
//!
//! Input layouts per transition function:
//!
//! | function | inputs |
//! |---|---|
//! | `cast_vote`, `deposit` | `[account, balance u64, salt field?, encrypted_salt?]` |
//! | `create_proposal` | `[description field, options [field; N], end_block u32, quorum u64, admin?]` |
//! | `cancel_proposal`, `close_proposal`, `tally_proposal` | `[proposal_id u64]` |
//!
//! A required input without a visible value makes the event malformed.

use shadow_chain::literal::{parse_address, parse_field, parse_options, parse_u32, parse_u64};
use shadow_chain::{LiteralError, Transition};
use shadow_crypto::FieldElement;
use shadow_types::{AccountId, ProposalId};

pub const FN_CAST_VOTE: &str = "cast_vote";
pub const FN_DEPOSIT: &str = "deposit";
pub const FN_CREATE_PROPOSAL: &str = "create_proposal";
pub const FN_CANCEL_PROPOSAL: &str = "cancel_proposal";
pub const FN_CLOSE_PROPOSAL: &str = "close_proposal";
pub const FN_TALLY_PROPOSAL: &str = "tally_proposal";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramEvent {
    BalanceChanged {
        account: AccountId,
        balance: u64,
        salt: FieldElement,
        encrypted_salt: String,
    },
    ProposalCreated {
        description: FieldElement,
        options: Vec<FieldElement>,
        end_block: u32,
        quorum: u64,
        admin: Option<AccountId>,
    },
    ProposalCancelled(ProposalId),
    ProposalClosed(ProposalId),
    ProposalTallied(ProposalId),
}

fn required(t: &Transition, i: usize) -> Result<&str, LiteralError> {
    t.input_value(i).ok_or(LiteralError::MissingInput(i))
}

impl ProgramEvent {
    /// Parse a transition of the tracked program. `Ok(None)` for functions
    /// the indexer does not track.
    pub fn from_transition(t: &Transition) -> Result<Option<Self>, LiteralError> {
        let event = match t.function.as_str() {
            FN_CAST_VOTE | FN_DEPOSIT => ProgramEvent::BalanceChanged {
                account: parse_address(required(t, 0)?)?,
                balance: parse_u64(required(t, 1)?)?,
                salt: match t.input_value(2) {
                    Some(v) => parse_field(v)?,
                    None => FieldElement::zero(),
                },
                encrypted_salt: t.input_value(3).unwrap_or_default().to_string(),
            },
            FN_CREATE_PROPOSAL => ProgramEvent::ProposalCreated {
                description: parse_field(required(t, 0)?)?,
                options: parse_options(required(t, 1)?)?,
                end_block: parse_u32(required(t, 2)?)?,
                quorum: parse_u64(required(t, 3)?)?,
                admin: t.input_value(4).map(parse_address).transpose()?,
            },
            FN_CANCEL_PROPOSAL => ProgramEvent::ProposalCancelled(proposal_id(t)?),
            FN_CLOSE_PROPOSAL => ProgramEvent::ProposalClosed(proposal_id(t)?),
            FN_TALLY_PROPOSAL => ProgramEvent::ProposalTallied(proposal_id(t)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProgramEvent::BalanceChanged { .. } => "balance_changed",
            ProgramEvent::ProposalCreated { .. } => "proposal_created",
            ProgramEvent::ProposalCancelled(_) => "proposal_cancelled",
            ProgramEvent::ProposalClosed(_) => "proposal_closed",
            ProgramEvent::ProposalTallied(_) => "proposal_tallied",
        }
    }
}

fn proposal_id(t: &Transition) -> Result<ProposalId, LiteralError> {
    Ok(ProposalId::new(parse_u64(required(t, 0)?)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadow_chain::TransitionInput;

    fn transition(function: &str, values: &[Option<&str>]) -> Transition {
        Transition {
            id: "au1test".into(),
            program: "shadow_vote_v3.aleo".into(),
            function: function.into(),
            inputs: values
                .iter()
                .enumerate()
                .map(|(i, v)| TransitionInput {
                    kind: if v.is_some() { "public" } else { "private" }.into(),
                    id: format!("in{i}"),
                    value: v.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn cast_vote_full() {
        let t = transition(
            "cast_vote",
            &[Some("aleo1voter"), Some("100u64"), Some("42field"), Some("ciphertext1")],
        );
        assert_eq!(
            ProgramEvent::from_transition(&t).unwrap(),
            Some(ProgramEvent::BalanceChanged {
                account: AccountId::new("aleo1voter").unwrap(),
                balance: 100,
                salt: FieldElement::from_u64(42),
                encrypted_salt: "ciphertext1".into(),
            })
        );
    }

    #[test]
    fn deposit_defaults_salt() {
        let t = transition("deposit", &[Some("aleo1voter"), Some("7u64")]);
        match ProgramEvent::from_transition(&t).unwrap() {
            Some(ProgramEvent::BalanceChanged { salt, encrypted_salt, .. }) => {
                assert!(salt.is_zero());
                assert_eq!(encrypted_salt, "");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_balance() {
        let t = transition("cast_vote", &[Some("aleo1voter"), Some("abc")]);
        assert!(ProgramEvent::from_transition(&t).is_err());
        let private = transition("cast_vote", &[Some("aleo1voter"), None]);
        assert_eq!(
            ProgramEvent::from_transition(&private),
            Err(LiteralError::MissingInput(1))
        );
    }

    #[test]
    fn create_proposal() {
        let t = transition(
            "create_proposal",
            &[
                Some("555field"),
                Some("[1field, 2field, 3field, 0field, 0field]"),
                Some("2000u32"),
                Some("10u64"),
            ],
        );
        assert_eq!(
            ProgramEvent::from_transition(&t).unwrap(),
            Some(ProgramEvent::ProposalCreated {
                description: FieldElement::from_u64(555),
                options: (1..=3).map(FieldElement::from_u64).collect(),
                end_block: 2000,
                quorum: 10,
                admin: None,
            })
        );
    }

    #[test]
    fn lifecycle_functions() {
        let ok = |f: &str| ProgramEvent::from_transition(&transition(f, &[Some("3u64")])).unwrap();
        assert_eq!(ok("cancel_proposal"), Some(ProgramEvent::ProposalCancelled(ProposalId::new(3))));
        assert_eq!(ok("close_proposal"), Some(ProgramEvent::ProposalClosed(ProposalId::new(3))));
        assert_eq!(ok("tally_proposal"), Some(ProgramEvent::ProposalTallied(ProposalId::new(3))));
        assert!(ProgramEvent::from_transition(&transition("tally_proposal", &[Some("3")])).is_err());
    }

    #[test]
    fn unknown_function_ignored() {
        let t = transition("transfer_public", &[Some("x")]);
        assert_eq!(ProgramEvent::from_transition(&t).unwrap(), None);
    }
}
