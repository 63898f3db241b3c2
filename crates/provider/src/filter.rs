use ethers::types::{Address, BlockNumber, Filter, Topic, ValueOrArray, H256};
use rustc_hex::FromHexError;
use std::str::FromStr;
use thiserror::Error;
use userop_primitives::{constants::entry_point::USER_OPERATION_EVENT, UserOperationHash};

/// Indexed topics an event can carry after its signature topic
pub const MAX_TOPICS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("at most 3 topic sets follow the event signature")]
    TooManyTopics,
}

/// Log query for the `UserOperationEvent` of a single user operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperationEventFilter {
    /// Entry point emitting the event
    pub address: Address,
    /// Event signature, hashed into topic 0
    pub event: String,
    pub from_block: Option<BlockNumber>,
    pub to_block: Option<BlockNumber>,
    /// Topic sets following topic 0, at most [MAX_TOPICS]
    topics: Vec<Vec<H256>>,
}

impl UserOperationEventFilter {
    /// Creates filter from a user operation hash string
    ///
    /// An empty string matches any user operation.
    pub fn new(entry_point: Address, hash: &str) -> Result<Self, FromHexError> {
        let topics = if hash.is_empty() { vec![] } else { vec![vec![H256::from_str(hash)?]] };
        Ok(Self {
            address: entry_point,
            event: USER_OPERATION_EVENT.into(),
            from_block: None,
            to_block: None,
            topics,
        })
    }

    pub fn from_hash(entry_point: Address, hash: &UserOperationHash) -> Self {
        Self {
            address: entry_point,
            event: USER_OPERATION_EVENT.into(),
            from_block: None,
            to_block: None,
            topics: vec![vec![hash.0]],
        }
    }

    pub fn from_block<T: Into<BlockNumber>>(mut self, block: T) -> Self {
        self.from_block = Some(block.into());
        self
    }

    pub fn to_block<T: Into<BlockNumber>>(mut self, block: T) -> Self {
        self.to_block = Some(block.into());
        self
    }

    /// Appends the set of hashes matched at the next topic position
    pub fn topic(mut self, hashes: Vec<H256>) -> Result<Self, FilterError> {
        if self.topics.len() == MAX_TOPICS {
            return Err(FilterError::TooManyTopics);
        }
        self.topics.push(hashes);
        Ok(self)
    }

    pub fn topics(&self) -> &[Vec<H256>] {
        &self.topics
    }

    /// Converts into the `eth_getLogs` filter
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new().address(self.address);
        if let Some(block) = self.from_block {
            filter = filter.from_block(block);
        }
        if let Some(block) = self.to_block {
            filter = filter.to_block(block);
        }
        if !self.event.is_empty() {
            filter = filter.event(&self.event);
        }
        for (i, hashes) in self.topics.iter().enumerate() {
            filter.topics[i + 1] = to_topic(hashes);
        }
        filter
    }
}

impl From<&UserOperationEventFilter> for Filter {
    fn from(value: &UserOperationEventFilter) -> Self {
        value.to_filter()
    }
}

fn to_topic(hashes: &[H256]) -> Option<Topic> {
    match hashes {
        [] => None,
        [hash] => Some(ValueOrArray::Value(Some(*hash))),
        _ => Some(ValueOrArray::Array(hashes.iter().copied().map(Some).collect())),
    }
}
