// Transaction records and their wire layout.
//
//   Tx     := time[8] in_c[2] TxIn{in_c} out_c[2] TxOut{out_c} sig_c[2] TxSig{sig_c}
//   TxIn   := tx_id[32] out_i[2]
//   TxOut  := addr[8] amt[4]
//   TxSig  := scr[526] sig[32]
//
// Inputs point at an output of an earlier transaction, outputs pay an amount
// to an 8-byte address, and signatures carry an unlock script plus a
// signature that this crate treats as opaque bytes.

use crate::core::codec::{
    check_count, put_f32, put_i64, put_u16, read_group, write_group, Decode, Encode, Reader,
    COUNT_LEN,
};
use crate::error::CodecError;
use crate::utils::{ContentHasher, Digest, Sha256Hasher, DIGEST_LEN};
use std::hash::{Hash, Hasher};

/// Width of an address
pub const ADDRESS_LEN: usize = 8;
/// Width of an unlock script
pub const SCRIPT_LEN: usize = 526;
/// Width of a signature
pub const SIGNATURE_LEN: usize = 32;

pub const TX_IN_LEN: usize = DIGEST_LEN + 2;
pub const TX_OUT_LEN: usize = ADDRESS_LEN + 4;
pub const TX_SIG_LEN: usize = SCRIPT_LEN + SIGNATURE_LEN;
/// Size of a transaction with no inputs, outputs or signatures
pub const TX_MIN_LEN: usize = 8 + 3 * COUNT_LEN;

/// Reward paid by the coinbase transaction of every block
pub const COINBASE_REWARD: f32 = 10.0;

pub type Address = [u8; ADDRESS_LEN];

/// One output of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    pub tx_id: Digest,
    pub out_i: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxIn {
    tx_id: Digest,
    out_i: u16,
}

impl TxIn {
    pub fn new(tx_id: Digest, out_i: u16) -> TxIn {
        TxIn { tx_id, out_i }
    }

    pub fn get_tx_id(&self) -> &Digest {
        &self.tx_id
    }

    pub fn get_out_i(&self) -> u16 {
        self.out_i
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            tx_id: self.tx_id,
            out_i: self.out_i,
        }
    }
}

impl From<OutPoint> for TxIn {
    fn from(outpoint: OutPoint) -> Self {
        TxIn::new(outpoint.tx_id, outpoint.out_i)
    }
}

impl Encode for TxIn {
    fn encoded_len(&self) -> usize {
        TX_IN_LEN
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tx_id);
        put_u16(out, self.out_i);
    }
}

impl Decode for TxIn {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tx_id = reader.read_array()?;
        let out_i = reader.read_u16()?;
        Ok(TxIn { tx_id, out_i })
    }
}

/// Transfer of `amt` to `addr`.
///
/// Equality and hashing use the bit pattern of the amount, so two outputs are
/// equal exactly when their encodings are.
#[derive(Debug, Clone, Copy)]
pub struct TxOut {
    addr: Address,
    amt: f32,
}

impl TxOut {
    pub fn new(addr: Address, amt: f32) -> TxOut {
        TxOut { addr, amt }
    }

    pub fn get_addr(&self) -> &Address {
        &self.addr
    }

    pub fn get_amt(&self) -> f32 {
        self.amt
    }

    pub fn is_locked_with(&self, addr: &Address) -> bool {
        self.addr == *addr
    }
}

impl PartialEq for TxOut {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr && self.amt.to_bits() == other.amt.to_bits()
    }
}

impl Eq for TxOut {}

impl Hash for TxOut {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.addr.hash(state);
        self.amt.to_bits().hash(state);
    }
}

impl Encode for TxOut {
    fn encoded_len(&self) -> usize {
        TX_OUT_LEN
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.addr);
        put_f32(out, self.amt);
    }
}

impl Decode for TxOut {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let addr = reader.read_array()?;
        let amt = reader.read_f32()?;
        Ok(TxOut { addr, amt })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxSig {
    scr: [u8; SCRIPT_LEN],
    sig: [u8; SIGNATURE_LEN],
}

impl TxSig {
    pub fn new(scr: [u8; SCRIPT_LEN], sig: [u8; SIGNATURE_LEN]) -> TxSig {
        TxSig { scr, sig }
    }

    pub fn get_scr(&self) -> &[u8; SCRIPT_LEN] {
        &self.scr
    }

    pub fn get_sig(&self) -> &[u8; SIGNATURE_LEN] {
        &self.sig
    }
}

impl Encode for TxSig {
    fn encoded_len(&self) -> usize {
        TX_SIG_LEN
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.scr);
        out.extend_from_slice(&self.sig);
    }
}

impl Decode for TxSig {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let scr = reader.read_array()?;
        let sig = reader.read_array()?;
        Ok(TxSig { scr, sig })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    time: i64,
    inputs: Vec<TxIn>,
    outputs: Vec<TxOut>,
    signatures: Vec<TxSig>,
}

/// Short name used by the wire format
pub type Tx = Transaction;

impl Transaction {
    /// Assembles a transaction, rejecting groups that overflow their 16-bit count
    pub fn new(
        time: i64,
        inputs: Vec<TxIn>,
        outputs: Vec<TxOut>,
        signatures: Vec<TxSig>,
    ) -> Result<Transaction, CodecError> {
        check_count(inputs.len(), TX_IN_LEN)?;
        check_count(outputs.len(), TX_OUT_LEN)?;
        check_count(signatures.len(), TX_SIG_LEN)?;
        Ok(Transaction {
            time,
            inputs,
            outputs,
            signatures,
        })
    }

    /// The block reward: no inputs and a single output to the miner
    pub fn new_coinbase(addr: Address, time: i64) -> Transaction {
        Transaction {
            time,
            inputs: vec![],
            outputs: vec![TxOut::new(addr, COINBASE_REWARD)],
            signatures: vec![],
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty() && self.outputs.len() == 1
    }

    /// Attaches a signature. Signatures are part of the encoding, so this
    /// changes the transaction id.
    pub fn sign(&mut self, signature: TxSig) -> Result<(), CodecError> {
        check_count(self.signatures.len() + 1, TX_SIG_LEN)?;
        self.signatures.push(signature);
        Ok(())
    }

    pub fn get_time(&self) -> i64 {
        self.time
    }

    pub fn get_inputs(&self) -> &[TxIn] {
        self.inputs.as_slice()
    }

    pub fn get_outputs(&self) -> &[TxOut] {
        self.outputs.as_slice()
    }

    pub fn get_signatures(&self) -> &[TxSig] {
        self.signatures.as_slice()
    }

    /// Sum of all output amounts
    pub fn total_output(&self) -> f64 {
        self.outputs.iter().map(|out| out.amt as f64).sum()
    }

    /// Content hash of the encoded transaction using the default hasher
    pub fn id(&self) -> Digest {
        self.id_with(&Sha256Hasher)
    }

    pub fn id_with<H: ContentHasher + ?Sized>(&self, hasher: &H) -> Digest {
        hasher.digest(&self.encode())
    }
}

impl Encode for Transaction {
    fn encoded_len(&self) -> usize {
        TX_MIN_LEN
            + TX_IN_LEN * self.inputs.len()
            + TX_OUT_LEN * self.outputs.len()
            + TX_SIG_LEN * self.signatures.len()
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        put_i64(out, self.time);
        write_group(out, &self.inputs);
        write_group(out, &self.outputs);
        write_group(out, &self.signatures);
    }
}

impl Decode for Transaction {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let time = reader.read_i64()?;
        let inputs = read_group(reader, TX_IN_LEN)?;
        let outputs = read_group(reader, TX_OUT_LEN)?;
        let signatures = read_group(reader, TX_SIG_LEN)?;
        Ok(Transaction {
            time,
            inputs,
            outputs,
            signatures,
        })
    }
}

pub fn encode_tx(tx: &Transaction) -> Vec<u8> {
    tx.encode()
}

/// Strictly decodes a single transaction
pub fn decode_tx(bytes: &[u8]) -> Result<Transaction, CodecError> {
    Transaction::decode(bytes)
}

/// Decodes a buffer of back-to-back transactions, such as a mempool file
pub fn decode_tx_stream(bytes: &[u8]) -> Result<Vec<Transaction>, CodecError> {
    crate::core::codec::decode_stream(bytes)
}
