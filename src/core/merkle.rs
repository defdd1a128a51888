use crate::core::Transaction;
use crate::utils::{sha256_digest, ContentHasher, Digest, Sha256Hasher};
use once_cell::sync::Lazy;

/// Root of a block with no transactions under the default hasher: the
/// SHA-256 digest of the empty byte string.
pub static EMPTY_TX_ROOT: Lazy<Digest> = Lazy::new(|| sha256_digest(&[]));

/// Derive `tx_root` from the ordered transactions of a block
pub fn compute_tx_root(transactions: &[Transaction]) -> Digest {
    compute_tx_root_with(&Sha256Hasher, transactions)
}

pub fn compute_tx_root_with<H: ContentHasher + ?Sized>(
    hasher: &H,
    transactions: &[Transaction],
) -> Digest {
    let leaves: Vec<Digest> = transactions.iter().map(|tx| tx.id_with(hasher)).collect();
    MerkleTree::calculate_merkle_root(hasher, &leaves)
}

/// Pairwise Merkle aggregation over transaction ids.
///
/// Each level hashes `left || right` pairs. An odd level is padded with an
/// empty byte string, so the last node is hashed alone. One leaf is its own
/// root and no leaves give `digest([])`.
pub struct MerkleTree;

impl MerkleTree {
    pub fn calculate_merkle_root<H: ContentHasher + ?Sized>(
        hasher: &H,
        leaves: &[Digest],
    ) -> Digest {
        if leaves.is_empty() {
            return hasher.digest(&[]);
        }

        let mut current_level = leaves.to_vec();

        while current_level.len() > 1 {
            current_level = current_level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => Self::hash_pair(hasher, left, right),
                    // Odd number of nodes - the empty padding leaves the last one alone
                    [last] => hasher.digest(last),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
        }

        current_level[0]
    }

    /// Verify that a list of transactions produces the expected root
    pub fn verify_transactions(transactions: &[Transaction], expected_root: &Digest) -> bool {
        compute_tx_root(transactions) == *expected_root
    }

    fn hash_pair<H: ContentHasher + ?Sized>(hasher: &H, left: &Digest, right: &Digest) -> Digest {
        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(left);
        combined[32..].copy_from_slice(right);
        hasher.digest(&combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::sample_transaction;

    #[test]
    fn test_empty_root_is_constant() {
        assert_eq!(compute_tx_root(&[]), *EMPTY_TX_ROOT);
        assert_eq!(compute_tx_root(&[]), compute_tx_root(&[]));
        assert_eq!(*EMPTY_TX_ROOT, sha256_digest(b""));
    }

    #[test]
    fn test_single_transaction_root_is_its_id() {
        let tx = sample_transaction(1, 1, 0);
        assert_eq!(compute_tx_root(std::slice::from_ref(&tx)), tx.id());
    }

    #[test]
    fn test_two_transactions() {
        let a = sample_transaction(1, 1, 0);
        let b = sample_transaction(2, 1, 0);

        let mut combined = a.id().to_vec();
        combined.extend_from_slice(&b.id());
        assert_eq!(compute_tx_root(&[a, b]), sha256_digest(&combined));
    }

    #[test]
    fn test_odd_level_hashes_last_node_alone() {
        let txs = vec![
            sample_transaction(1, 1, 0),
            sample_transaction(2, 1, 0),
            sample_transaction(3, 1, 0),
        ];
        let ids: Vec<Digest> = txs.iter().map(Transaction::id).collect();

        let mut left = ids[0].to_vec();
        left.extend_from_slice(&ids[1]);
        let left = sha256_digest(&left);
        let right = sha256_digest(&ids[2]);
        let mut top = left.to_vec();
        top.extend_from_slice(&right);

        assert_eq!(compute_tx_root(&txs), sha256_digest(&top));
    }

    #[test]
    fn test_root_is_deterministic() {
        let txs: Vec<Transaction> = (0..5).map(|i| sample_transaction(i, 1, 0)).collect();
        assert_eq!(compute_tx_root(&txs), compute_tx_root(&txs));
        assert!(MerkleTree::verify_transactions(&txs, &compute_tx_root(&txs)));
    }

    #[test]
    fn test_root_is_order_sensitive() {
        let txs: Vec<Transaction> = (0..4).map(|i| sample_transaction(i, 1, 0)).collect();
        let mut swapped = txs.clone();
        swapped.swap(1, 2);
        assert_ne!(compute_tx_root(&txs), compute_tx_root(&swapped));
    }

    #[test]
    fn test_root_changes_with_transaction_bytes() {
        let txs: Vec<Transaction> = (0..3).map(|i| sample_transaction(i, 1, 0)).collect();
        let mut changed = txs.clone();
        changed[2] = sample_transaction(7, 1, 0);
        assert_ne!(compute_tx_root(&txs), compute_tx_root(&changed));
    }
}
