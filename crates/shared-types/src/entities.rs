//! # Core Domain Entities
//!
//! Defines the ledger entities exchanged between the intake pipeline and
//! the block application protocol.
//!
//! ## Clusters
//!
//! - **Identity**: `AccountId`, `AssetId`, `PublicKey`, `ClientId`
//! - **Transactions**: `Command`, `Transaction`, `TransactionSignature`
//! - **Chain**: `BlockHeader`, `Block`, `EmptyBlock`, `BlockVariant`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte SHA-256 content hash.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Hash of the (virtual) block preceding the first committed block.
pub const GENESIS_PARENT_HASH: Hash = [0u8; 32];

/// Account identifier in `name@domain` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id has a non-empty name and domain around a single `@`.
    pub fn is_well_formed(&self) -> bool {
        is_qualified(&self.0, '@')
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asset identifier in `name#domain` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id has a non-empty name and domain around a single `#`.
    pub fn is_well_formed(&self) -> bool {
        is_qualified(&self.0, '#')
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_qualified(id: &str, separator: char) -> bool {
    let mut parts = id.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(domain), None) => {
            !name.is_empty()
                && !domain.is_empty()
                && !id.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

/// Identity of the client connection a transaction arrived on.
///
/// Opaque to the core; the transport layer uses it to route responses back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// A single world-state mutation carried by a transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Register a new account with its first signatory.
    CreateAccount {
        account_id: AccountId,
        #[serde_as(as = "Bytes")]
        public_key: PublicKey,
    },
    /// Mint `amount` of an asset into an account.
    AddAssetQuantity {
        account_id: AccountId,
        asset_id: AssetId,
        amount: u128,
    },
    /// Burn `amount` of an asset from an account.
    SubtractAssetQuantity {
        account_id: AccountId,
        asset_id: AssetId,
        amount: u128,
    },
    /// Move `amount` of an asset between two accounts.
    TransferAsset {
        src_account_id: AccountId,
        dest_account_id: AccountId,
        asset_id: AssetId,
        amount: u128,
    },
    /// Upsert a key/value detail on an account.
    SetAccountDetail {
        account_id: AccountId,
        key: String,
        value: String,
    },
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAccount { .. } => "create_account",
            Self::AddAssetQuantity { .. } => "add_asset_quantity",
            Self::SubtractAssetQuantity { .. } => "subtract_asset_quantity",
            Self::TransferAsset { .. } => "transfer_asset",
            Self::SetAccountDetail { .. } => "set_account_detail",
        }
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        match self {
            Self::CreateAccount {
                account_id,
                public_key,
            } => {
                hasher.update([0u8]);
                update_str(hasher, account_id.as_str());
                hasher.update(public_key);
            }
            Self::AddAssetQuantity {
                account_id,
                asset_id,
                amount,
            } => {
                hasher.update([1u8]);
                update_str(hasher, account_id.as_str());
                update_str(hasher, asset_id.as_str());
                hasher.update(amount.to_le_bytes());
            }
            Self::SubtractAssetQuantity {
                account_id,
                asset_id,
                amount,
            } => {
                hasher.update([2u8]);
                update_str(hasher, account_id.as_str());
                update_str(hasher, asset_id.as_str());
                hasher.update(amount.to_le_bytes());
            }
            Self::TransferAsset {
                src_account_id,
                dest_account_id,
                asset_id,
                amount,
            } => {
                hasher.update([3u8]);
                update_str(hasher, src_account_id.as_str());
                update_str(hasher, dest_account_id.as_str());
                update_str(hasher, asset_id.as_str());
                hasher.update(amount.to_le_bytes());
            }
            Self::SetAccountDetail {
                account_id,
                key,
                value,
            } => {
                hasher.update([4u8]);
                update_str(hasher, account_id.as_str());
                update_str(hasher, key);
                update_str(hasher, value);
            }
        }
    }
}

/// Length-prefixed so that adjacent fields cannot be shifted into each other.
fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// A signatory's signature over the transaction payload.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    #[serde_as(as = "Bytes")]
    pub public_key: PublicKey,
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

/// A client transaction: an ordered list of commands issued by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Account on whose behalf the commands run.
    pub creator_account_id: AccountId,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_time: u64,
    /// Commands, executed in order.
    pub commands: Vec<Command>,
    /// Signatures collected so far.
    pub signatures: Vec<TransactionSignature>,
}

impl Transaction {
    pub fn new(creator_account_id: AccountId, created_time: u64, commands: Vec<Command>) -> Self {
        Self {
            creator_account_id,
            created_time,
            commands,
            signatures: Vec::new(),
        }
    }

    /// Payload hash. Signatures are excluded so that attaching them does not
    /// change the transaction's identity.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        update_str(&mut hasher, self.creator_account_id.as_str());
        hasher.update(self.created_time.to_le_bytes());
        hasher.update((self.commands.len() as u64).to_le_bytes());
        for command in &self.commands {
            command.hash_into(&mut hasher);
        }
        hasher.finalize().into()
    }

    /// Attach a signature. A second signature from the same key replaces the first.
    pub fn add_signature(&mut self, signature: TransactionSignature) {
        self.signatures
            .retain(|existing| existing.public_key != signature.public_key);
        self.signatures.push(signature);
    }

    /// Remove the signature made by `public_key`. Returns whether one was removed.
    pub fn remove_signature(&mut self, public_key: &PublicKey) -> bool {
        let before = self.signatures.len();
        self.signatures
            .retain(|existing| &existing.public_key != public_key);
        self.signatures.len() != before
    }
}

// =============================================================================
// CLUSTER C: THE CHAIN
// =============================================================================

/// Block metadata shared by every block representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Block height in the chain (first block is 1).
    pub height: u64,
    /// Hash of the previous block (creates the chain linkage).
    pub prev_hash: Hash,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_time: u64,
    /// Number of transactions the block carries.
    pub tx_count: u32,
}

impl BlockHeader {
    fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.prev_hash);
        hasher.update(self.created_time.to_le_bytes());
        hasher.update(self.tx_count.to_le_bytes());
    }
}

/// A fully signed block carrying transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    /// Peer signatures over the block hash.
    pub signatures: Vec<TransactionSignature>,
}

impl Block {
    /// Build a block on top of `prev_hash`. `tx_count` is derived.
    pub fn new(
        height: u64,
        prev_hash: Hash,
        created_time: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            header: BlockHeader {
                height,
                prev_hash,
                created_time,
                tx_count: transactions.len() as u32,
            },
            transactions,
            signatures: Vec::new(),
        }
    }

    /// Content hash over the header and the transaction hashes.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([0u8]);
        self.header.hash_into(&mut hasher);
        for tx in &self.transactions {
            hasher.update(tx.hash());
        }
        hasher.finalize().into()
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn prev_hash(&self) -> &Hash {
        &self.header.prev_hash
    }
}

/// A block produced by a round that ordered no transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyBlock {
    pub header: BlockHeader,
}

impl EmptyBlock {
    pub fn new(height: u64, prev_hash: Hash, created_time: u64) -> Self {
        Self {
            header: BlockHeader {
                height,
                prev_hash,
                created_time,
                tx_count: 0,
            },
        }
    }

    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([1u8]);
        self.header.hash_into(&mut hasher);
        hasher.finalize().into()
    }
}

/// The block representations accepted at the application boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockVariant {
    Block(Block),
    Empty(EmptyBlock),
}

impl BlockVariant {
    pub fn hash(&self) -> Hash {
        match self {
            Self::Block(block) => block.hash(),
            Self::Empty(block) => block.hash(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        match self {
            Self::Block(block) => &block.header,
            Self::Empty(block) => &block.header,
        }
    }

    pub fn height(&self) -> u64 {
        self.header().height
    }

    pub fn prev_hash(&self) -> &Hash {
        &self.header().prev_hash
    }

    /// Transactions carried by the block; empty for `Empty`.
    pub fn transactions(&self) -> &[Transaction] {
        match self {
            Self::Block(block) => &block.transactions,
            Self::Empty(_) => &[],
        }
    }
}

impl From<Block> for BlockVariant {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<EmptyBlock> for BlockVariant {
    fn from(block: EmptyBlock) -> Self {
        Self::Empty(block)
    }
}
