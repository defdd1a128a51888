use crate::core::codec::{
    check_count, put_i64, read_group, write_group, Decode, Encode, Reader, COUNT_LEN,
};
use crate::core::merkle::compute_tx_root_with;
use crate::core::transaction::{Transaction, COINBASE_REWARD, TX_MIN_LEN};
use crate::error::{BlockchainError, CodecError};
use crate::utils::{ContentHasher, Digest, Sha256Hasher, DIGEST_LEN};
use log::debug;

/// Bytes covered by the block id and the proof-of-work check:
/// `prev_id[32] tx_root[32] time[8] nonce[8]`
pub const HEADER_LEN: usize = 2 * DIGEST_LEN + 8 + 8;

/// Size of a block with no transactions
pub const BLOCK_MIN_LEN: usize = HEADER_LEN + COUNT_LEN;

/// `prev_id` of the first block in a chain
pub const GENESIS_PREV_ID: Digest = [0u8; DIGEST_LEN];

/// Block := prev_id[32] tx_root[32] time[8] nonce[8] tx_c[2] Tx{tx_c}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    prev_id: Digest,
    tx_root: Digest,
    time: i64,
    nonce: i64,
    transactions: Vec<Transaction>,
}

impl Block {
    /// Builds a block on top of `prev_id` with `tx_root` derived from the
    /// transactions and the nonce starting at zero.
    pub fn new_block(
        prev_id: Digest,
        transactions: Vec<Transaction>,
        time: i64,
    ) -> Result<Block, CodecError> {
        Self::new_block_with(&Sha256Hasher, prev_id, transactions, time)
    }

    pub fn new_block_with<H: ContentHasher + ?Sized>(
        hasher: &H,
        prev_id: Digest,
        transactions: Vec<Transaction>,
        time: i64,
    ) -> Result<Block, CodecError> {
        check_count(transactions.len(), TX_MIN_LEN)?;
        let tx_root = compute_tx_root_with(hasher, &transactions);
        Ok(Block {
            prev_id,
            tx_root,
            time,
            nonce: 0,
            transactions,
        })
    }

    /// First block of a chain
    pub fn new_genesis_block(
        transactions: Vec<Transaction>,
        time: i64,
    ) -> Result<Block, CodecError> {
        Self::new_block(GENESIS_PREV_ID, transactions, time)
    }

    /// Assembles a block from raw field values without recomputing `tx_root`
    pub fn from_parts(
        prev_id: Digest,
        tx_root: Digest,
        time: i64,
        nonce: i64,
        transactions: Vec<Transaction>,
    ) -> Result<Block, CodecError> {
        check_count(transactions.len(), TX_MIN_LEN)?;
        Ok(Block {
            prev_id,
            tx_root,
            time,
            nonce,
            transactions,
        })
    }

    pub fn get_prev_id(&self) -> &Digest {
        &self.prev_id
    }

    pub fn get_tx_root(&self) -> &Digest {
        &self.tx_root
    }

    pub fn get_time(&self) -> i64 {
        self.time
    }

    pub fn get_nonce(&self) -> i64 {
        self.nonce
    }

    /// Only meaningful before the block is accepted; the mining search is the
    /// one caller that varies it.
    pub fn set_nonce(&mut self, nonce: i64) {
        self.nonce = nonce;
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_id == GENESIS_PREV_ID
    }

    /// The 80 header bytes hashed for the block id and proof of work
    pub fn header_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[..32].copy_from_slice(&self.prev_id);
        header[32..64].copy_from_slice(&self.tx_root);
        header[64..72].copy_from_slice(&self.time.to_be_bytes());
        header[72..80].copy_from_slice(&self.nonce.to_be_bytes());
        header
    }

    /// Header bytes with a different nonce, leaving the block untouched
    pub fn header_bytes_with_nonce(&self, nonce: i64) -> [u8; HEADER_LEN] {
        let mut header = self.header_bytes();
        header[72..80].copy_from_slice(&nonce.to_be_bytes());
        header
    }

    pub fn id(&self) -> Digest {
        self.id_with(&Sha256Hasher)
    }

    pub fn id_with<H: ContentHasher + ?Sized>(&self, hasher: &H) -> Digest {
        hasher.digest(&self.header_bytes())
    }

    /// A block pays exactly one coinbase transaction worth `COINBASE_REWARD`
    pub fn check_coinbase(&self) -> crate::error::Result<()> {
        let mut coinbases = self.transactions.iter().filter(|tx| tx.is_coinbase());
        let coinbase = match (coinbases.next(), coinbases.next()) {
            (Some(coinbase), None) => coinbase,
            (None, _) => {
                return Err(BlockchainError::InvalidBlock(
                    "no coinbase transaction".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(BlockchainError::InvalidBlock(format!(
                    "{} coinbase transactions",
                    2 + coinbases.count()
                )))
            }
        };

        let reward = coinbase.get_outputs()[0].get_amt();
        if reward.to_bits() != COINBASE_REWARD.to_bits() {
            return Err(BlockchainError::InvalidBlock(format!(
                "coinbase pays {reward} instead of {COINBASE_REWARD}"
            )));
        }
        Ok(())
    }

    /// Verify that the stored root matches the transactions in the body
    pub fn verify_tx_root(&self) -> bool {
        self.verify_tx_root_with(&Sha256Hasher)
    }

    pub fn verify_tx_root_with<H: ContentHasher + ?Sized>(&self, hasher: &H) -> bool {
        let calculated = compute_tx_root_with(hasher, &self.transactions);
        let matches = calculated == self.tx_root;
        if !matches {
            debug!(
                "Stored tx_root does not match the {} transactions in the block",
                self.transactions.len()
            );
        }
        matches
    }
}

impl Encode for Block {
    fn encoded_len(&self) -> usize {
        BLOCK_MIN_LEN
            + self
                .transactions
                .iter()
                .map(Encode::encoded_len)
                .sum::<usize>()
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.prev_id);
        out.extend_from_slice(&self.tx_root);
        put_i64(out, self.time);
        put_i64(out, self.nonce);
        write_group(out, &self.transactions);
    }
}

impl Decode for Block {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let prev_id = reader.read_array()?;
        let tx_root = reader.read_array()?;
        let time = reader.read_i64()?;
        let nonce = reader.read_i64()?;
        let transactions = read_group(reader, TX_MIN_LEN)?;
        Ok(Block {
            prev_id,
            tx_root,
            time,
            nonce,
            transactions,
        })
    }
}

pub fn encode_block(block: &Block) -> Vec<u8> {
    block.encode()
}

/// Strictly decodes a single block
pub fn decode_block(bytes: &[u8]) -> Result<Block, CodecError> {
    Block::decode(bytes)
}

/// Decodes a buffer of back-to-back blocks, such as a chain file
pub fn decode_block_stream(bytes: &[u8]) -> Result<Vec<Block>, CodecError> {
    crate::core::codec::decode_stream(bytes)
}
