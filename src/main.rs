// Entry point for the chain-codec command-line tool
// Every command reads the data files described by the configuration and never writes them
use chain_codec::storage::{load_mempool, load_valid_chain};
use chain_codec::utils::{block_to_json, parse_address, parse_hex, to_json_string, tx_to_json};
use chain_codec::{
    compute_tx_root, decode_block, decode_tx, is_valid_proof, Command, Config, Difficulty, Opt,
    ProofOfWork, UTXOSet,
};
use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, warn, LevelFilter};
use std::fs;
use std::process;

fn main() {
    // Info level shows what was loaded and validated without being too verbose
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(opt.config.as_deref())?;
    // A difficulty given on the command line wins over the file and the environment
    if let Some(difficulty) = opt.difficulty {
        config.set_difficulty(Difficulty::new(difficulty)?);
    }
    run_command(opt.command, &config)
}

fn run_command(command: Command, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::InspectBlock { file } => {
            let block = decode_block(&fs::read(&file)?)?;
            if !block.verify_tx_root() {
                warn!("tx_root of {} does not match its transactions", file.display());
            }
            println!("{}", to_json_string(&block_to_json(&block))?);
            println!("Block id: {}", HEXLOWER.encode(&block.id()));
        }
        Command::InspectTx { file } => {
            let tx = decode_tx(&fs::read(&file)?)?;
            println!("{}", to_json_string(&tx_to_json(&tx))?);
            println!("Transaction id: {}", HEXLOWER.encode(&tx.id()));
        }
        Command::VerifyChain { json } => {
            let path = config.chain_path();
            let pow = ProofOfWork::new_proof_of_work();
            let chain = match load_valid_chain(&path, &pow, config.get_difficulty())? {
                Some(chain) => chain,
                None => return Err(format!("No blockchain found at {}", path.display()).into()),
            };

            for (height, block) in chain.get_blocks().iter().enumerate() {
                if json {
                    println!("{}", to_json_string(&block_to_json(block))?);
                } else {
                    println!(
                        "{height}: {} ({} transactions)",
                        HEXLOWER.encode(&block.id()),
                        block.get_transactions().len()
                    );
                }
            }
            println!("Chain is valid: {} blocks", chain.len());
        }
        Command::WaitingTransactions => {
            let transactions = load_mempool(&config.mempool_path())?;
            for tx in &transactions {
                println!("{}", HEXLOWER.encode(&tx.id()));
            }
            println!("{} transactions waiting", transactions.len());
        }
        Command::TxRoot => {
            let transactions = load_mempool(&config.mempool_path())?;
            println!("{}", HEXLOWER.encode(&compute_tx_root(&transactions)));
        }
        Command::Balance { address } => {
            let addr = parse_address(&address)?;
            let pow = ProofOfWork::new_proof_of_work();
            // Balances are only read from a chain that validates
            let chain = load_valid_chain(&config.chain_path(), &pow, config.get_difficulty())?;
            let balance = match chain {
                Some(chain) => UTXOSet::from_chain(&chain).balance(&addr),
                None => 0.0,
            };
            println!("Balance of {}: {balance}", HEXLOWER.encode(&addr));
        }
        Command::CheckProof { header } => {
            let header = parse_hex(&header)?;
            let difficulty = config.get_difficulty();
            let valid = is_valid_proof(&header, difficulty.leading_zero_bytes() as u32)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                process::exit(2);
            }
        }
    }
    Ok(())
}
