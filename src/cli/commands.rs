use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chain-codec")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
    #[arg(
        long = "difficulty",
        global = true,
        help = "Override the required number of leading zero bytes (0-32)"
    )]
    pub difficulty: Option<u32>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "inspect-block", about = "Decode a single encoded block")]
    InspectBlock {
        #[arg(help = "File holding exactly one encoded block")]
        file: PathBuf,
    },
    #[command(name = "inspect-tx", about = "Decode a single encoded transaction")]
    InspectTx {
        #[arg(help = "File holding exactly one encoded transaction")]
        file: PathBuf,
    },
    #[command(name = "verify-chain", about = "Validate the stored blockchain")]
    VerifyChain {
        #[arg(long = "json", help = "Print every block as JSON")]
        json: bool,
    },
    #[command(
        name = "waiting-transactions",
        about = "List transactions waiting in the mempool"
    )]
    WaitingTransactions,
    #[command(
        name = "tx-root",
        about = "Compute the transaction root of the mempool in file order"
    )]
    TxRoot,
    #[command(name = "balance", about = "Get the balance of an address")]
    Balance {
        #[arg(help = "8-byte address in hex")]
        address: String,
    },
    #[command(
        name = "check-proof",
        about = "Check raw header bytes against the difficulty"
    )]
    CheckProof {
        #[arg(help = "Header bytes in hex")]
        header: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_difficulty() {
        let opt = Opt::parse_from(["chain-codec", "--difficulty", "3", "check-proof", "00ff"]);
        assert_eq!(opt.difficulty, Some(3));
        assert!(matches!(opt.command, Command::CheckProof { ref header } if header == "00ff"));
    }

    #[test]
    fn test_parse_verify_chain() {
        let opt = Opt::parse_from(["chain-codec", "verify-chain", "--json"]);
        assert!(matches!(opt.command, Command::VerifyChain { json: true }));
        assert!(opt.config.is_none());
    }
}
