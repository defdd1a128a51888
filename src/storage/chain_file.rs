// Flat-file persistence: the chain file holds encoded blocks back to back,
// the mempool file holds encoded transactions back to back.
use crate::core::{decode_tx_stream, Chain, Difficulty, Encode, ProofOfWork, Transaction};
use crate::error::Result;
use crate::utils::ContentHasher;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Reads a file, treating a missing file as empty
fn read_or_empty(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Load the chain, or `None` when nothing has been stored yet
pub fn load_chain(path: &Path) -> Result<Option<Chain>> {
    let bytes = read_or_empty(path)?;
    if bytes.is_empty() {
        debug!("No chain stored at {}", path.display());
        return Ok(None);
    }
    let chain = Chain::decode(&bytes)?;
    info!("Loaded {} blocks from {}", chain.len(), path.display());
    Ok(Some(chain))
}

/// Load the chain and refuse it unless it validates at `difficulty`
pub fn load_valid_chain<H: ContentHasher>(
    path: &Path,
    pow: &ProofOfWork<H>,
    difficulty: Difficulty,
) -> Result<Option<Chain>> {
    match load_chain(path)? {
        Some(chain) => {
            chain.validate(pow, difficulty)?;
            Ok(Some(chain))
        }
        None => Ok(None),
    }
}

/// Overwrite the chain file with every block of `chain`
pub fn save_chain(path: &Path, chain: &Chain) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, chain.encode())?;
    info!("Saved {} blocks to {}", chain.len(), path.display());
    Ok(())
}

/// Transactions waiting to be included in a block, in file order
pub fn load_mempool(path: &Path) -> Result<Vec<Transaction>> {
    let bytes = read_or_empty(path)?;
    let transactions = decode_tx_stream(&bytes)?;
    debug!(
        "Loaded {} waiting transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

pub fn append_to_mempool(path: &Path, tx: &Transaction) -> Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&tx.encode())?;
    Ok(())
}

/// Overwrite the mempool with `transactions`
pub fn save_mempool(path: &Path, transactions: &[Transaction]) -> Result<()> {
    ensure_parent(path)?;
    let mut bytes = Vec::with_capacity(transactions.iter().map(Encode::encoded_len).sum());
    for tx in transactions {
        tx.encode_into(&mut bytes);
    }
    fs::write(path, bytes)?;
    Ok(())
}
