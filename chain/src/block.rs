//! Block JSON as served by the Aleo explorer API.
//!
//! Only the fields the indexer reads are modelled; everything else is
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Transaction status of a transaction that made it into state.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Transaction type of a program call.
pub const TYPE_EXECUTE: &str = "execute";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub transactions: Vec<ConfirmedTransaction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub height: u64,
}

/// A transaction as it appears inside a block, wrapped with its outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub index: u64,
    pub transaction: Transaction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub execution: Option<Execution>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub program: String,
    pub function: String,
    #[serde(default)]
    pub inputs: Vec<TransitionInput>,
}

/// One transition input. `value` is absent for private and record inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Block {
    pub fn height(&self) -> u64 {
        self.header.metadata.height
    }

    /// Transitions of `program` from accepted executions, in block order.
    pub fn program_transitions<'a>(
        &'a self,
        program: &'a str,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transactions
            .iter()
            .filter(|tx| tx.status == STATUS_ACCEPTED && tx.kind == TYPE_EXECUTE)
            .filter_map(|tx| tx.transaction.execution.as_ref())
            .flat_map(|execution| execution.transitions.iter())
            .filter(move |transition| transition.program == program)
    }
}

impl Transition {
    /// Visible value of input `i`, if any.
    pub fn input_value(&self, i: usize) -> Option<&str> {
        self.inputs.get(i)?.value.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"{
        "block_hash": "ab1xyz",
        "previous_hash": "ab1prev",
        "header": { "metadata": { "height": 1200, "round": 5 } },
        "transactions": [
            {
                "status": "accepted",
                "type": "execute",
                "index": 0,
                "transaction": {
                    "type": "execute",
                    "id": "at1one",
                    "execution": {
                        "transitions": [
                            {
                                "id": "au1a",
                                "program": "shadow_vote_v3.aleo",
                                "function": "cast_vote",
                                "inputs": [
                                    { "type": "public", "id": "1", "value": "aleo1voter" },
                                    { "type": "public", "id": "2", "value": "100u64" },
                                    { "type": "private", "id": "3" }
                                ],
                                "outputs": []
                            },
                            {
                                "id": "au1b",
                                "program": "credits.aleo",
                                "function": "fee_public",
                                "inputs": []
                            }
                        ]
                    }
                }
            },
            {
                "status": "rejected",
                "type": "execute",
                "index": 1,
                "transaction": {
                    "id": "at1two",
                    "execution": {
                        "transitions": [
                            { "id": "au1c", "program": "shadow_vote_v3.aleo", "function": "cast_vote", "inputs": [] }
                        ]
                    }
                }
            },
            {
                "status": "accepted",
                "type": "deploy",
                "index": 2,
                "transaction": { "id": "at1three" }
            }
        ]
    }"#;

    #[test]
    fn parses_explorer_block() {
        let block: Block = serde_json::from_str(BLOCK).unwrap();
        assert_eq!(block.height(), 1200);
        assert_eq!(block.transactions.len(), 3);
    }

    #[test]
    fn filters_to_accepted_program_executions() {
        let block: Block = serde_json::from_str(BLOCK).unwrap();
        let ids: Vec<&str> = block
            .program_transitions("shadow_vote_v3.aleo")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["au1a"]);
    }

    #[test]
    fn private_inputs_have_no_value() {
        let block: Block = serde_json::from_str(BLOCK).unwrap();
        let t = block.program_transitions("shadow_vote_v3.aleo").next().unwrap();
        assert_eq!(t.input_value(0), Some("aleo1voter"));
        assert_eq!(t.input_value(1), Some("100u64"));
        assert_eq!(t.input_value(2), None);
        assert_eq!(t.input_value(9), None);
    }

    #[test]
    fn empty_block() {
        let block: Block = serde_json::from_str(r#"{"header":{"metadata":{"height":3}}}"#).unwrap();
        assert_eq!(block.program_transitions("x.aleo").count(), 0);
    }
}
