//! Sluice CLI
//!
//! Command-line interface for driving Sluice revenue-sharing tokens:
//! replay a JSON operation script against a token and inspect the
//! resulting state and event log.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use sluice_core::{AccountId, Amount, CheckpointId};
use sluice_distribution::{DepositShareToken, MeteredShareToken};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(author = "Datachain Foundation")]
#[command(version = "0.1.0")]
#[command(about = "Sluice - snapshot-gated revenue-sharing token ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON operation script against a token
    Run {
        /// Script file path
        script: PathBuf,

        /// Print the full event log after the run
        #[arg(long)]
        events: bool,
    },

    /// Run the built-in two-holder demo scenario
    Demo,

    /// Version information
    Version,
}

/// Token construction parameters, chosen by variant
#[derive(Debug, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
enum TokenSpec {
    /// Per-deposit checkpoints, deposits fully claim-attributed
    Instant {
        name: String,
        symbol: String,
        initial_supply: u64,
        content_uri: String,
        owner: String,
    },

    /// Cooldown-gated snapshots with a claimable/redemption split
    Metered {
        name: String,
        symbol: String,
        initial_supply: u64,
        claimable_percent: u8,
        cooldown_blocks: u64,
        owner: String,
    },
}

/// One scripted operation. Accounts are referenced by handle; ids are
/// derived from the handle bytes.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptOp {
    Deposit { amount: u64 },
    AdvanceBlocks { blocks: u64 },
    Snapshot,
    Transfer { from: String, to: String, amount: u64 },
    Claim { account: String, checkpoint: CheckpointId },
    Burn { account: String, amount: u64 },
}

#[derive(Debug, Deserialize)]
struct Script {
    token: TokenSpec,
    ops: Vec<ScriptOp>,
}

/// Either token variant behind one driver interface
enum Token {
    Instant(DepositShareToken),
    Metered(MeteredShareToken),
}

impl Token {
    fn deploy(spec: &TokenSpec) -> anyhow::Result<Self> {
        Ok(match spec {
            TokenSpec::Instant {
                name,
                symbol,
                initial_supply,
                content_uri,
                owner,
            } => Self::Instant(DepositShareToken::new(
                name.clone(),
                symbol.clone(),
                *initial_supply as Amount,
                content_uri,
                &account(owner),
            )?),
            TokenSpec::Metered {
                name,
                symbol,
                initial_supply,
                claimable_percent,
                cooldown_blocks,
                owner,
            } => Self::Metered(MeteredShareToken::new(
                name.clone(),
                symbol.clone(),
                *initial_supply as Amount,
                *claimable_percent,
                *cooldown_blocks,
                &account(owner),
            )?),
        })
    }

    fn apply(&mut self, op: &ScriptOp) -> anyhow::Result<String> {
        Ok(match (self, op) {
            (Token::Instant(token), ScriptOp::Deposit { amount }) => {
                let id = token.deposit(*amount as Amount)?;
                format!("deposit {amount} -> checkpoint {id}")
            }
            (Token::Metered(token), ScriptOp::Deposit { amount }) => {
                token.deposit(*amount as Amount);
                format!("deposit {amount} -> pool {}", token.pool_balance())
            }
            (Token::Instant(token), ScriptOp::AdvanceBlocks { blocks }) => {
                format!("advanced to block {}", token.advance_blocks(*blocks))
            }
            (Token::Metered(token), ScriptOp::AdvanceBlocks { blocks }) => {
                format!("advanced to block {}", token.advance_blocks(*blocks))
            }
            (Token::Instant(_), ScriptOp::Snapshot) => {
                bail!("snapshot requires the metered variant")
            }
            (Token::Metered(token), ScriptOp::Snapshot) => {
                let id = token.snapshot()?;
                format!("snapshot -> checkpoint {id}")
            }
            (Token::Instant(token), ScriptOp::Transfer { from, to, amount }) => {
                token.transfer(&account(from), &account(to), *amount as Amount)?;
                format!("transfer {amount}: {from} -> {to}")
            }
            (Token::Metered(token), ScriptOp::Transfer { from, to, amount }) => {
                token.transfer(&account(from), &account(to), *amount as Amount)?;
                format!("transfer {amount}: {from} -> {to}")
            }
            (Token::Instant(token), ScriptOp::Claim { account: handle, checkpoint }) => {
                let paid = token.claim(&account(handle), *checkpoint)?;
                format!("claim by {handle} for checkpoint {checkpoint} -> {paid}")
            }
            (Token::Metered(token), ScriptOp::Claim { account: handle, checkpoint }) => {
                let paid = token.claim(&account(handle), *checkpoint)?;
                format!("claim by {handle} for checkpoint {checkpoint} -> {paid}")
            }
            (Token::Instant(token), ScriptOp::Burn { account: handle, amount }) => {
                token.burn(&account(handle), *amount as Amount)?;
                format!("burn {amount} by {handle}")
            }
            (Token::Metered(token), ScriptOp::Burn { account: handle, amount }) => {
                let redeemed = token.burn(&account(handle), *amount as Amount)?;
                format!("burn {amount} by {handle} -> redeemed {redeemed}")
            }
        })
    }

    fn summary(&self, handles: &BTreeSet<String>) -> serde_json::Value {
        let accounts: serde_json::Map<String, serde_json::Value> = handles
            .iter()
            .map(|handle| {
                let id = account(handle);
                let (balance, payouts) = match self {
                    Token::Instant(token) => {
                        (token.balance_of(&id), token.payouts_to(&id))
                    }
                    Token::Metered(token) => {
                        (token.balance_of(&id), token.payouts_to(&id))
                    }
                };
                (
                    handle.clone(),
                    json!({ "balance": balance, "payouts": payouts }),
                )
            })
            .collect();

        match self {
            Token::Instant(token) => json!({
                "name": token.name(),
                "symbol": token.symbol(),
                "content_id": token.content_id().to_hex(),
                "total_supply": token.total_supply(),
                "pool_balance": token.pool_balance(),
                "checkpoints": token.checkpoint_count(),
                "accounts": accounts,
            }),
            Token::Metered(token) => json!({
                "name": token.name(),
                "symbol": token.symbol(),
                "claimable_percent": token.claimable_percent(),
                "total_supply": token.total_supply(),
                "pool_balance": token.pool_balance(),
                "outstanding_claims": token.outstanding_claims(),
                "checkpoints": token.checkpoint_count(),
                "accounts": accounts,
            }),
        }
    }

    fn events_json(&self) -> anyhow::Result<String> {
        let records = match self {
            Token::Instant(token) => token.events(),
            Token::Metered(token) => token.events(),
        };
        Ok(serde_json::to_string_pretty(records)?)
    }
}

/// Derive an account id from a script handle
fn account(handle: &str) -> AccountId {
    AccountId::from_seed(handle.as_bytes())
}

/// Every account handle a script mentions
fn handles(script: &Script) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    match &script.token {
        TokenSpec::Instant { owner, .. } | TokenSpec::Metered { owner, .. } => {
            set.insert(owner.clone());
        }
    }
    for op in &script.ops {
        match op {
            ScriptOp::Transfer { from, to, .. } => {
                set.insert(from.clone());
                set.insert(to.clone());
            }
            ScriptOp::Claim { account, .. } | ScriptOp::Burn { account, .. } => {
                set.insert(account.clone());
            }
            _ => {}
        }
    }
    set
}

fn run_script(path: &PathBuf, print_events: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let script: Script =
        serde_json::from_str(&content).context("failed to parse script JSON")?;

    let mut token = Token::deploy(&script.token)?;
    tracing::info!("token deployed");

    for (index, op) in script.ops.iter().enumerate() {
        let outcome = token
            .apply(op)
            .with_context(|| format!("op #{index} failed: {op:?}"))?;
        println!("[{index:>3}] {outcome}");
    }

    println!("{}", serde_json::to_string_pretty(&token.summary(&handles(&script)))?);
    if print_events {
        println!("{}", token.events_json()?);
    }
    Ok(())
}

fn run_demo() -> anyhow::Result<()> {
    let alice = account("alice");
    let bob = account("bob");

    let mut token =
        DepositShareToken::new("Harbor Share", "HBR", 1_000_000, "ipfs://bafkreidemo", &alice)?;

    println!("deployed {} ({}), supply {}", token.name(), token.symbol(), token.total_supply());
    println!("content id: {}", token.content_id());

    token.deposit(1_000)?;
    println!("deposit 1000 -> checkpoint 1 (alice holds 100%)");

    token.transfer(&alice, &bob, 400_000)?;
    println!("transfer 400000: alice -> bob");

    token.deposit(1_000)?;
    println!("deposit 1000 -> checkpoint 2 (alice 60%, bob 40%)");

    println!("claimable(alice, 2) = {}", token.claimable(&alice, 2)?);
    println!("claimable(bob, 2)   = {}", token.claimable(&bob, 2)?);

    token.claim(&alice, 1)?;
    token.claim(&alice, 2)?;
    token.claim(&bob, 2)?;
    println!(
        "after claims: pool {}, alice paid {}, bob paid {}",
        token.pool_balance(),
        token.payouts_to(&alice),
        token.payouts_to(&bob),
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { script, events } => run_script(&script, events)?,
        Commands::Demo => run_demo()?,
        Commands::Version => {
            println!("sluice {}", env!("CARGO_PKG_VERSION"));
        }
    }
    Ok(())
}
