//! Chain container
//!
//! A chain file is every block encoded back to back, genesis first. This
//! module decodes that container and checks that the blocks actually form a
//! chain: linkage through `prev_id`, a `tx_root` matching each body, a
//! header satisfying the proof-of-work predicate, and transactions that only
//! spend what earlier ones created.

use crate::core::block::decode_block_stream;
use crate::core::codec::Encode;
use crate::core::{Block, Difficulty, ProofOfWork, Transaction, GENESIS_PREV_ID};
use crate::error::{BlockchainError, CodecError, Result};
use crate::storage::UTXOSet;
use crate::utils::{ContentHasher, Digest};
use data_encoding::HEXLOWER;
use log::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Chain {
        Chain { blocks: Vec::new() }
    }

    /// Decodes a chain container. Only the byte structure is checked here;
    /// call `validate` before trusting the blocks.
    pub fn decode(bytes: &[u8]) -> std::result::Result<Chain, CodecError> {
        let blocks = decode_block_stream(bytes)?;
        Ok(Chain { blocks })
    }

    pub fn encode(&self) -> Vec<u8> {
        let len = self.blocks.iter().map(Encode::encoded_len).sum();
        let mut out = Vec::with_capacity(len);
        for block in &self.blocks {
            block.encode_into(&mut out);
        }
        out
    }

    pub fn get_blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `prev_id` the next block must carry
    pub fn next_prev_id(&self) -> Digest {
        self.tip().map(Block::id).unwrap_or(GENESIS_PREV_ID)
    }

    /// Appends a block that links to the current tip
    pub fn push(&mut self, block: Block) -> Result<()> {
        let expected = self.next_prev_id();
        if *block.get_prev_id() != expected {
            return Err(BlockchainError::InvalidChain(format!(
                "Block at height {} links to {} instead of {}",
                self.blocks.len(),
                HEXLOWER.encode(block.get_prev_id()),
                HEXLOWER.encode(&expected)
            )));
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Every transaction in chain order
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks
            .iter()
            .flat_map(|block| block.get_transactions().iter())
    }

    pub fn find_transaction(&self, tx_id: &Digest) -> Option<&Transaction> {
        self.transactions().find(|tx| tx.id() == *tx_id)
    }

    /// Checks every block in order: linkage, transaction root, proof of work,
    /// a single coinbase, and inputs that spend unspent outputs without
    /// creating value. Signatures are not verified.
    pub fn validate<H: ContentHasher>(
        &self,
        pow: &ProofOfWork<H>,
        difficulty: Difficulty,
    ) -> Result<()> {
        let hasher = pow.hasher();
        let mut expected_prev = GENESIS_PREV_ID;
        let mut utxo_set = UTXOSet::new();

        for (height, block) in self.blocks.iter().enumerate() {
            if *block.get_prev_id() != expected_prev {
                warn!("Rejecting chain: broken link at height {height}");
                return Err(BlockchainError::InvalidChain(format!(
                    "Block at height {height} does not link to its predecessor"
                )));
            }

            if !block.verify_tx_root_with(hasher) {
                warn!("Rejecting chain: tx_root mismatch at height {height}");
                return Err(BlockchainError::InvalidChain(format!(
                    "Block at height {height} has a tx_root that does not match its transactions"
                )));
            }

            if !pow.validate(block, difficulty) {
                warn!("Rejecting chain: insufficient proof of work at height {height}");
                return Err(BlockchainError::InvalidChain(format!(
                    "Block at height {height} does not satisfy difficulty {difficulty}"
                )));
            }

            let spent = block.check_coinbase().and_then(|_| {
                block
                    .get_transactions()
                    .iter()
                    .try_for_each(|tx| utxo_set.spend_with(hasher, tx))
            });
            if let Err(e) = spent {
                warn!("Rejecting chain: invalid transactions at height {height}: {e}");
                return Err(BlockchainError::InvalidChain(format!(
                    "Block at height {height} is invalid: {e}"
                )));
            }

            expected_prev = block.id_with(hasher);
        }

        info!(
            "Validated chain of {} blocks at difficulty {difficulty}",
            self.blocks.len()
        );
        Ok(())
    }
}

impl From<Vec<Block>> for Chain {
    fn from(blocks: Vec<Block>) -> Self {
        Chain { blocks }
    }
}
