//! # 交易工厂模块
//!
//! 构建两种交易：没有真实输入的奖励交易，以及花费UTXO的转账交易。

use log::info;

use crate::config::SUBSIDY;
use crate::error::{Result, TxError};
use crate::hash::hash_pub_key;
use crate::input::{TxInput, REWARD_OUTPUT_INDEX};
use crate::output::TxOutput;
use crate::transaction::Transaction;
use crate::utxo::{find_spendable, UtxoQuery};
use crate::wallet::WalletStore;

/// 创建奖励交易，新价值进入系统的唯一途径
///
/// # 参数
///
/// * `to` - 奖励接收地址
/// * `memo` - 备注，为空时自动生成；没有共识含义
pub fn new_reward_transaction(to: &str, memo: &str) -> Result<Transaction> {
    let memo = if memo.is_empty() {
        format!("Reward to '{}'", to)
    } else {
        memo.to_string()
    };

    let input = TxInput::new(Vec::new(), REWARD_OUTPUT_INDEX, memo.into_bytes());
    let output = TxOutput::new(SUBSIDY, to)?;
    let tx = Transaction::new(vec![input], vec![output]);

    info!("built reward transaction {} for {}", tx.id_hex(), to);
    Ok(tx)
}

/// 创建资金转移交易
///
/// 选出发送者足够的UTXO作为输入，输出一笔付款，多余部分找零给发送者。
/// 返回的交易尚未签名。
///
/// # 参数
///
/// * `from` - 发送者地址，必须能被 `wallets` 解析
/// * `to` - 接收者地址
/// * `amount` - 转账金额，必须大于零
/// * `wallets` - 钥匙库
/// * `utxos` - 未花费输出索引
pub fn new_transfer_transaction<W, Q>(
    from: &str,
    to: &str,
    amount: u64,
    wallets: &W,
    utxos: &Q,
) -> Result<Transaction>
where
    W: WalletStore + ?Sized,
    Q: UtxoQuery + ?Sized,
{
    if amount == 0 {
        return Err(TxError::InvalidAmount);
    }
    let payment = TxOutput::new(amount, to)?;

    let (pub_key, _) = wallets.resolve(from)?;
    let pub_key_hash = hash_pub_key(&pub_key);

    let (accumulated, chosen) = find_spendable(&pub_key_hash, amount, utxos);
    if accumulated < amount {
        return Err(TxError::InsufficientFunds {
            required: amount,
            available: accumulated,
        });
    }

    let inputs = chosen
        .into_iter()
        .map(|outpoint| TxInput::new(outpoint.txid, outpoint.index as i64, pub_key.clone()))
        .collect();

    let mut outputs = vec![payment];
    // 找零，退给发送者
    if accumulated > amount {
        outputs.push(TxOutput::with_pub_key_hash(accumulated - amount, pub_key_hash));
    }

    let tx = Transaction::new(inputs, outputs);
    info!(
        "built transfer {} of {} from {} to {} using {} inputs",
        tx.id_hex(),
        amount,
        from,
        to,
        tx.inputs.len()
    );
    Ok(tx)
}
