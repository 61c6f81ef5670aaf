//! # 交易层演示程序
//!
//! 创建两个钱包和一个账本，演示奖励、转账、签名、验证和提交的完整流程。
//! 日志级别通过 `RUST_LOG` 配置。

use anyhow::{bail, Context};
use log::info;

use utxo_ledger::{new_reward_transaction, new_transfer_transaction, Ledger, WalletStore, Wallets};

fn print_balances(ledger: &Ledger, wallets: &Wallets) -> anyhow::Result<()> {
    for address in wallets.addresses() {
        let wallet = wallets
            .get_wallet(&address)
            .context("wallet disappeared from keystore")?;
        println!("  '{}' 的余额是: {}", address, ledger.balance(&wallet.pub_key_hash()));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // 初始化日志
    env_logger::init();

    let mut wallets = Wallets::new();
    let miner = wallets.create_wallet();
    let user = wallets.create_wallet();
    println!("矿工钱包地址: {}", miner);
    println!("用户钱包地址: {}", user);

    let mut ledger = Ledger::new(&miner).context("creating ledger")?;
    ledger.commit(new_reward_transaction(&miner, "second reward")?)?;
    println!("\n创世及奖励交易后:");
    print_balances(&ledger, &wallets)?;

    let mut tx = new_transfer_transaction(&miner, &user, 13, &wallets, &ledger)?;
    let (_, secret_key) = wallets.resolve(&miner)?;
    ledger.sign_transaction(&mut tx, &secret_key)?;

    if !ledger.verify_transaction(&tx)? {
        bail!("freshly signed transaction {} failed verification", tx.id_hex());
    }
    info!("transfer {} verified", tx.id_hex());

    println!("\n{}", tx);
    println!("\n{}", serde_json::to_string_pretty(&tx)?);

    ledger.commit(tx)?;
    println!("\n转账13后:");
    print_balances(&ledger, &wallets)?;

    Ok(())
}
