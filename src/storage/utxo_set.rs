use crate::core::{Address, Chain, OutPoint, Transaction, TxOut};
use crate::error::{BlockchainError, Result};
use crate::utils::{ContentHasher, Digest, Sha256Hasher};
use data_encoding::HEXLOWER;
use log::debug;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Unspent transaction outputs, rebuilt by replaying a chain
#[derive(Debug, Clone, Default)]
pub struct UTXOSet {
    outputs: HashMap<OutPoint, TxOut>,
}

impl UTXOSet {
    pub fn new() -> UTXOSet {
        UTXOSet {
            outputs: HashMap::new(),
        }
    }

    pub fn from_chain(chain: &Chain) -> UTXOSet {
        let mut utxo_set = UTXOSet::new();
        for tx in chain.transactions() {
            utxo_set.apply(tx);
        }
        debug!(
            "Rebuilt UTXO set with {} outputs from {} blocks",
            utxo_set.len(),
            chain.len()
        );
        utxo_set
    }

    /// Spend the outputs `tx` references and add the ones it creates.
    /// Nothing is checked; use `spend` for transactions not yet validated.
    pub fn apply(&mut self, tx: &Transaction) {
        // Inputs pointing at unknown outputs are left to `spend`
        for input in tx.get_inputs() {
            self.outputs.remove(&input.outpoint());
        }
        self.add_outputs(tx.id(), tx);
    }

    /// Applies `tx` after checking that every input names an unspent
    /// output, no output is spent twice and the outputs do not exceed the
    /// inputs. A coinbase creates its reward without inputs.
    pub fn spend(&mut self, tx: &Transaction) -> Result<()> {
        self.spend_with(&Sha256Hasher, tx)
    }

    pub fn spend_with<H: ContentHasher + ?Sized>(
        &mut self,
        hasher: &H,
        tx: &Transaction,
    ) -> Result<()> {
        if !tx.is_coinbase() {
            let mut spent = HashSet::new();
            let mut available = 0.0f64;
            for input in tx.get_inputs() {
                let outpoint = input.outpoint();
                let output = match self.outputs.get(&outpoint) {
                    Some(output) if spent.insert(outpoint) => output,
                    _ => {
                        return Err(BlockchainError::InvalidBlock(format!(
                            "input {}:{} spends an unknown or already spent output",
                            HEXLOWER.encode(input.get_tx_id()),
                            input.get_out_i()
                        )))
                    }
                };
                available += output.get_amt() as f64;
            }

            let total_spent = tx.total_output();
            // NaN amounts never balance
            if matches!(
                available.partial_cmp(&total_spent),
                None | Some(Ordering::Less)
            ) {
                return Err(BlockchainError::InvalidBlock(format!(
                    "outputs of {total_spent} exceed the {available} available"
                )));
            }
            for outpoint in spent {
                self.outputs.remove(&outpoint);
            }
        }

        self.add_outputs(tx.id_with(hasher), tx);
        Ok(())
    }

    fn add_outputs(&mut self, tx_id: Digest, tx: &Transaction) {
        for (out_i, output) in tx.get_outputs().iter().enumerate() {
            let outpoint = OutPoint {
                tx_id,
                out_i: out_i as u16,
            };
            self.outputs.insert(outpoint, *output);
        }
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOut> {
        self.outputs.get(outpoint)
    }

    /// Unspent outputs, optionally limited to the given addresses
    pub fn unspent(&self, addresses: Option<&[Address]>) -> HashMap<OutPoint, TxOut> {
        self.outputs
            .iter()
            .filter(|(_, output)| match addresses {
                Some(addresses) => addresses.contains(output.get_addr()),
                None => true,
            })
            .map(|(outpoint, output)| (*outpoint, *output))
            .collect()
    }

    pub fn balances(&self) -> HashMap<Address, f64> {
        let mut balances = HashMap::new();
        for output in self.outputs.values() {
            *balances.entry(*output.get_addr()).or_insert(0.0) += output.get_amt() as f64;
        }
        balances
    }

    pub fn balance(&self, address: &Address) -> f64 {
        self.outputs
            .values()
            .filter(|output| output.is_locked_with(address))
            .map(|output| output.get_amt() as f64)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
