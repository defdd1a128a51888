// JSON export of records, for inspection tools and data dumps.
// Byte strings are written as lowercase hex.
use crate::core::{Address, Block, Transaction, ADDRESS_LEN};
use crate::error::{BlockchainError, Result};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use serde_json::{json, Value};

pub fn tx_to_json(tx: &Transaction) -> Value {
    json!({
        "inputs": tx.get_inputs().iter().map(|input| json!({
            "outpoint": {
                "transaction_id": HEXLOWER.encode(input.get_tx_id()),
                "output_index": input.get_out_i(),
            }
        })).collect::<Vec<_>>(),
        "outputs": tx.get_outputs().iter().map(|output| json!({
            "address": HEXLOWER.encode(output.get_addr()),
            "amount": output.get_amt(),
        })).collect::<Vec<_>>(),
        "signatures": tx.get_signatures().iter().map(|signature| json!({
            "script": HEXLOWER.encode(signature.get_scr()),
            "signature": HEXLOWER.encode(signature.get_sig()),
        })).collect::<Vec<_>>(),
        "timestamp": tx.get_time(),
    })
}

/// A genesis block has no predecessor, so its `previous_block_id` is null
pub fn block_to_json(block: &Block) -> Value {
    let previous_block_id = if block.is_genesis() {
        Value::Null
    } else {
        json!(HEXLOWER.encode(block.get_prev_id()))
    };
    json!({
        "previous_block_id": previous_block_id,
        "transactions_root": HEXLOWER.encode(block.get_tx_root()),
        "timestamp": block.get_time(),
        "nonce": block.get_nonce(),
        "transactions": block.get_transactions().iter().map(tx_to_json).collect::<Vec<_>>(),
    })
}

pub fn to_json_string(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(BlockchainError::from)
}

/// Decode hex input, accepting either case
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    HEXLOWER_PERMISSIVE
        .decode(input.trim().as_bytes())
        .map_err(|e| BlockchainError::Serialization(format!("Invalid hex: {e}")))
}

pub fn parse_address(input: &str) -> Result<Address> {
    let bytes = parse_hex(input)
        .map_err(|_| BlockchainError::InvalidAddress(input.to_string()))?;
    if bytes.len() != ADDRESS_LEN {
        return Err(BlockchainError::InvalidAddress(format!(
            "{input} (expected {ADDRESS_LEN} bytes, got {})",
            bytes.len()
        )));
    }
    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&bytes);
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::{sample_block, sample_transaction};

    #[test]
    fn test_tx_json_fields() {
        let tx = sample_transaction(1, 1, 1);
        let value = tx_to_json(&tx);

        assert_eq!(value["timestamp"], json!(tx.get_time()));
        assert_eq!(value["inputs"][0]["outpoint"]["output_index"], json!(0));
        assert_eq!(
            value["inputs"][0]["outpoint"]["transaction_id"],
            json!(HEXLOWER.encode(&[1u8; 32]))
        );
        assert_eq!(value["outputs"][0]["address"], json!("1010101010101010"));
        assert_eq!(value["outputs"][0]["amount"], json!(1.5));
        assert_eq!(
            value["signatures"][0]["script"].as_str().unwrap().len(),
            526 * 2
        );
    }

    #[test]
    fn test_block_json_fields() {
        let block = sample_block(&[(1, 1, 0), (0, 1, 0)]);
        let value = block_to_json(&block);

        assert_eq!(
            value["previous_block_id"],
            json!(HEXLOWER.encode(&[0x42u8; 32]))
        );
        assert_eq!(
            value["transactions_root"],
            json!(HEXLOWER.encode(block.get_tx_root()))
        );
        assert_eq!(value["nonce"], json!(0));
        assert_eq!(value["transactions"].as_array().unwrap().len(), 2);
        assert!(to_json_string(&value).unwrap().contains("transactions_root"));
    }

    #[test]
    fn test_genesis_block_json_has_no_predecessor() {
        let genesis = Block::new_genesis_block(vec![Transaction::new_coinbase([1u8; 8], 1)], 1)
            .unwrap();
        let value = block_to_json(&genesis);
        assert!(value["previous_block_id"].is_null());
        assert_eq!(value["transactions"][0]["outputs"][0]["amount"], json!(10.0));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("0102030405060708").unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(parse_address("ABCDEFABCDEFABCD").unwrap()[0], 0xab);
        assert!(matches!(
            parse_address("0102"),
            Err(BlockchainError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_address("zz"),
            Err(BlockchainError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_hex_rejects_odd_length() {
        assert!(parse_hex("abc").is_err());
        assert_eq!(parse_hex(" 00ff ").unwrap(), vec![0, 255]);
    }
}
