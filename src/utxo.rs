//! # UTXO模块
//!
//! 未花费输出的查询接口、内存索引以及资金选择算法。

use std::collections::BTreeMap;

use log::debug;

use crate::output::TxOutput;
use crate::transaction::Transaction;

/// 对某个交易输出的引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    /// 拥有该输出的交易ID
    pub txid: Vec<u8>,
    /// 输出在交易中的索引
    pub index: usize,
}

/// 一个未花费输出及其位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnspentOutput {
    pub outpoint: OutPoint,
    pub output: TxOutput,
}

/// 未花费输出索引的查询接口
pub trait UtxoQuery {
    /// 按交易ID升序、索引升序返回全部未花费输出
    fn unspent_outputs(&self) -> Vec<UnspentOutput>;

    /// 返回锁定到该公钥哈希的未花费输出
    fn unspent_outputs_by_owner(&self, pub_key_hash: &[u8]) -> Vec<UnspentOutput> {
        self.unspent_outputs()
            .into_iter()
            .filter(|utxo| utxo.output.is_locked_with(pub_key_hash))
            .collect()
    }
}

/// 内存UTXO集合：交易ID -> [(输出索引, 输出)]
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    outputs: BTreeMap<Vec<u8>, Vec<(usize, TxOutput)>>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将交易的全部输出加入集合
    pub fn insert_transaction(&mut self, tx: &Transaction) {
        if tx.outputs.is_empty() {
            return;
        }
        let outputs = tx.outputs.iter().cloned().enumerate().collect();
        self.outputs.insert(tx.id.clone(), outputs);
    }

    /// 花费一个输出，返回被移除的输出；不存在时返回 `None`
    pub fn spend(&mut self, outpoint: &OutPoint) -> Option<TxOutput> {
        let outputs = self.outputs.get_mut(&outpoint.txid)?;
        let position = outputs.iter().position(|(idx, _)| *idx == outpoint.index)?;
        let (_, output) = outputs.remove(position);

        // 如果交易的所有输出都被花费，移除整个条目
        if outputs.is_empty() {
            self.outputs.remove(&outpoint.txid);
        }
        Some(output)
    }

    /// 查找一个未花费输出
    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        self.outputs
            .get(&outpoint.txid)?
            .iter()
            .find(|(idx, _)| *idx == outpoint.index)
            .map(|(_, output)| output)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.get(outpoint).is_some()
    }

    /// 未花费输出的数量
    pub fn len(&self) -> usize {
        self.outputs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UtxoQuery for UtxoSet {
    fn unspent_outputs(&self) -> Vec<UnspentOutput> {
        self.outputs
            .iter()
            .flat_map(|(txid, outputs)| {
                outputs.iter().map(move |(index, output)| UnspentOutput {
                    outpoint: OutPoint {
                        txid: txid.clone(),
                        index: *index,
                    },
                    output: output.clone(),
                })
            })
            .collect()
    }
}

/// 查找可花费的输出
///
/// 按索引顺序遍历属于 `pub_key_hash` 的输出并累加金额，累计达到 `amount` 即停止。
/// 贪心的首次适配策略，不追求最少输入数。
///
/// # 返回值
///
/// `(累计金额, 选中的输出)`；金额不足时也原样返回，由调用方判断。
pub fn find_spendable<Q: UtxoQuery + ?Sized>(
    pub_key_hash: &[u8],
    amount: u64,
    utxos: &Q,
) -> (u64, Vec<OutPoint>) {
    let mut accumulated = 0u64;
    let mut chosen = Vec::new();

    for utxo in utxos.unspent_outputs() {
        if accumulated >= amount {
            break;
        }
        if !utxo.output.is_locked_with(pub_key_hash) {
            continue;
        }

        // 超出u64时饱和，此时必然已达到目标
        accumulated = accumulated.saturating_add(utxo.output.value);
        chosen.push(utxo.outpoint);
    }

    debug!(
        "selected {} outputs worth {} for target {}",
        chosen.len(),
        accumulated,
        amount
    );
    (accumulated, chosen)
}

/// 计算公钥哈希拥有的未花费余额
pub fn balance<Q: UtxoQuery + ?Sized>(pub_key_hash: &[u8], utxos: &Q) -> u64 {
    utxos
        .unspent_outputs_by_owner(pub_key_hash)
        .iter()
        .fold(0u64, |total, utxo| total.saturating_add(utxo.output.value))
}
