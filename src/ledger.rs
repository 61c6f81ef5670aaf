//! # 账本模块
//!
//! 内存账本：按提交顺序保存交易并维护UTXO集合。
//! 提供签名和验证所需的前序交易查找；挖矿和持久化不在这里。

use std::collections::HashMap;

use log::{info, warn};
use secp256k1::SecretKey;

use crate::config::GENESIS_MEMO;
use crate::error::{Result, TxError};
use crate::factory::new_reward_transaction;
use crate::transaction::Transaction;
use crate::utxo::{OutPoint, UnspentOutput, UtxoQuery, UtxoSet};

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    positions: HashMap<String, usize>, // tx_id -> 在 transactions 中的位置
    utxo_set: UtxoSet,
}

impl Ledger {
    /// 创建账本，创世奖励交易给 `genesis_address`
    pub fn new(genesis_address: &str) -> Result<Self> {
        let mut ledger = Ledger::default();
        let genesis = new_reward_transaction(genesis_address, GENESIS_MEMO)?;
        ledger.commit(genesis)?;
        Ok(ledger)
    }

    /// 按提交顺序返回全部交易
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn utxo_set(&self) -> &UtxoSet {
        &self.utxo_set
    }

    /// 按交易ID查找交易
    pub fn find_transaction(&self, txid: &[u8]) -> Result<&Transaction> {
        let key = hex::encode(txid);
        self.positions
            .get(&key)
            .map(|position| &self.transactions[*position])
            .ok_or(TxError::MissingPriorTransaction(key))
    }

    /// 收集交易输入引用的全部前序交易，以十六进制ID为键
    pub fn prior_transactions(&self, tx: &Transaction) -> Result<HashMap<String, Transaction>> {
        let mut prev_txs = HashMap::new();
        if tx.is_reward() {
            return Ok(prev_txs);
        }

        for input in &tx.inputs {
            let prev_tx = self.find_transaction(&input.prev_tx)?;
            prev_txs.insert(prev_tx.id_hex(), prev_tx.clone());
        }
        Ok(prev_txs)
    }

    /// 用账本中的前序交易对交易签名
    pub fn sign_transaction(&self, tx: &mut Transaction, secret_key: &SecretKey) -> Result<()> {
        let prev_txs = self.prior_transactions(tx)?;
        tx.sign(secret_key, &prev_txs)
    }

    /// 用账本中的前序交易验证交易签名
    pub fn verify_transaction(&self, tx: &Transaction) -> Result<bool> {
        let prev_txs = self.prior_transactions(tx)?;
        tx.verify(&prev_txs)
    }

    /// 提交一笔已签名的交易
    ///
    /// 检查ID一致性、重复、签名、所有权、双花和金额，全部通过后更新UTXO集合。
    pub fn commit(&mut self, tx: Transaction) -> Result<()> {
        let txid = tx.id_hex();

        if !tx.has_consistent_id() {
            warn!("rejecting {}: id does not match content", txid);
            return Err(TxError::CorruptTransactionId(txid));
        }
        if self.positions.contains_key(&txid) {
            return Err(TxError::DuplicateTransaction(txid));
        }
        if tx.inputs.is_empty() || tx.outputs.is_empty() {
            return Err(TxError::EmptyTransaction);
        }
        if !self.verify_transaction(&tx)? {
            warn!("rejecting {}: signature verification failed", txid);
            return Err(TxError::VerificationFailed(txid));
        }

        let spent = if tx.is_reward() {
            Vec::new()
        } else {
            self.check_inputs_unspent(&tx)?
        };

        for outpoint in &spent {
            self.utxo_set.spend(outpoint);
        }
        self.utxo_set.insert_transaction(&tx);

        info!(
            "committed transaction {} ({} inputs, {} outputs)",
            txid,
            tx.inputs.len(),
            tx.outputs.len()
        );
        self.positions.insert(txid, self.transactions.len());
        self.transactions.push(tx);
        Ok(())
    }

    /// 确认每个输入引用的输出仍未花费、属于输入公钥的拥有者，且输出总额不超过输入总额
    fn check_inputs_unspent(&self, tx: &Transaction) -> Result<Vec<OutPoint>> {
        let mut outpoints: Vec<OutPoint> = Vec::with_capacity(tx.inputs.len());
        let mut input_total = 0u64;

        for input in &tx.inputs {
            let unspent = input.output_index().and_then(|index| {
                let outpoint = OutPoint {
                    txid: input.prev_tx.clone(),
                    index,
                };
                let output = self.utxo_set.get(&outpoint)?;
                Some((outpoint, output))
            });

            let (outpoint, output) = match unspent {
                Some((outpoint, output)) if !outpoints.contains(&outpoint) => (outpoint, output),
                _ => {
                    return Err(TxError::OutputAlreadySpent {
                        txid: hex::encode(&input.prev_tx),
                        index: input.prev_index,
                    })
                }
            };

            if !input.unlocks_with(&output.pub_key_hash) {
                return Err(TxError::UnauthorizedSpend {
                    txid: hex::encode(&input.prev_tx),
                    index: input.prev_index,
                });
            }

            input_total = input_total
                .checked_add(output.value)
                .ok_or(TxError::AmountOverflow)?;
            outpoints.push(outpoint);
        }

        let output_total = tx
            .outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.value))
            .ok_or(TxError::AmountOverflow)?;
        if output_total > input_total {
            return Err(TxError::OutputsExceedInputs {
                inputs: input_total,
                outputs: output_total,
            });
        }

        Ok(outpoints)
    }

    /// 公钥哈希拥有的余额
    pub fn balance(&self, pub_key_hash: &[u8]) -> u64 {
        crate::utxo::balance(pub_key_hash, &self.utxo_set)
    }
}

impl UtxoQuery for Ledger {
    fn unspent_outputs(&self) -> Vec<UnspentOutput> {
        self.utxo_set.unspent_outputs()
    }
}
