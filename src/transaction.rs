//! # 交易模块
//!
//! 交易聚合输入和输出，计算自身的身份摘要，并对每个输入分别签名和验证。
//!
//! 交易ID是规范序列化结果的SHA-256摘要，序列化时不包含 `id` 字段本身。
//! 规范序列化的字段顺序和编码一旦改变，所有交易摘要和签名都会失效。

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, Verification};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TxError};
use crate::hash::sha256;
use crate::input::{TxInput, REWARD_OUTPUT_INDEX};
use crate::output::TxOutput;

/// secp256k1 标量和坐标的字节长度
const SCALAR_LEN: usize = 32;

/// 未压缩SEC1公钥的前缀字节
const UNCOMPRESSED_TAG: u8 = 0x04;

/// 交易结构，包含交易输入和输出列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 交易ID
    #[serde(with = "hex::serde")]
    pub id: Vec<u8>,
    /// 交易输入列表，表示花费的UTXO，顺序与签名时一致
    pub inputs: Vec<TxInput>,
    /// 交易输出列表，表示创建的新UTXO
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// 创建新的交易并计算其ID
    ///
    /// # 参数
    ///
    /// * `inputs` - 交易输入列表
    /// * `outputs` - 交易输出列表
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        let mut tx = Transaction {
            id: Vec::new(),
            inputs,
            outputs,
        };
        tx.id = tx.hash();
        tx
    }

    /// 检查是否为奖励交易：只有一个输入，引用为空且索引为 -1
    pub fn is_reward(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prev_tx.is_empty()
            && self.inputs[0].prev_index == REWARD_OUTPUT_INDEX
    }

    /// 交易ID的十六进制表示
    pub fn id_hex(&self) -> String {
        hex::encode(&self.id)
    }

    /// 计算交易摘要，只依赖输入和输出，与存储的 `id` 无关
    pub fn hash(&self) -> Vec<u8> {
        sha256(&self.digest_preimage())
    }

    /// 存储的ID是否等于当前内容的摘要
    pub fn has_consistent_id(&self) -> bool {
        self.id == self.hash()
    }

    /// 规范序列化，`id` 不参与
    ///
    /// 整数一律小端；字节串带u32长度前缀。
    fn digest_preimage(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 * (self.inputs.len() + self.outputs.len()));

        write_len(&mut buf, self.inputs.len());
        for input in &self.inputs {
            write_bytes(&mut buf, &input.prev_tx);
            buf.extend_from_slice(&input.prev_index.to_le_bytes());
            write_bytes(&mut buf, &input.signature);
            write_bytes(&mut buf, &input.pub_key);
        }

        write_len(&mut buf, self.outputs.len());
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            write_bytes(&mut buf, &output.pub_key_hash);
        }

        buf
    }

    /// 创建用于签名的修剪副本
    ///
    /// 每个输入只保留引用的交易ID和输出索引，签名和公钥清空；输出保持不变。
    pub fn signing_view(&self) -> Transaction {
        let inputs = self
            .inputs
            .iter()
            .map(|input| TxInput::new(input.prev_tx.clone(), input.prev_index, Vec::new()))
            .collect();

        Transaction {
            id: Vec::new(),
            inputs,
            outputs: self.outputs.clone(),
        }
    }

    /// 计算第 `index` 个输入的签名摘要
    ///
    /// 在修剪副本的临时拷贝上只填入这一个输入的公钥字段（被引用输出的公钥哈希），
    /// 其余输入保持清空状态。
    fn signing_digest(view: &Transaction, index: usize, locking_hash: &[u8]) -> Vec<u8> {
        let mut scratch = view.clone();
        scratch.inputs[index].pub_key = locking_hash.to_vec();
        scratch.hash()
    }

    /// 对交易中的每一个输入签名
    ///
    /// 奖励交易不需要签名。所有输入完成签名后刷新 `id`，
    /// 保证存储的ID始终等于当前内容的摘要。
    ///
    /// # 参数
    ///
    /// * `secret_key` - 花费者私钥
    /// * `prev_txs` - 以十六进制交易ID为键的前序交易
    pub fn sign(
        &mut self,
        secret_key: &SecretKey,
        prev_txs: &HashMap<String, Transaction>,
    ) -> Result<()> {
        if self.is_reward() {
            return Ok(());
        }
        self.ensure_not_empty()?;

        let locking_hashes = self.referenced_locking_hashes(prev_txs)?;
        let secp = Secp256k1::signing_only();
        let view = self.signing_view();

        for (index, locking_hash) in locking_hashes.iter().enumerate() {
            let digest = Self::signing_digest(&view, index, locking_hash);
            let message = Message::from_slice(&digest)?;
            let signature = secp.sign_ecdsa(&message, secret_key);

            self.inputs[index].signature = signature.serialize_compact().to_vec();
            debug!("signed input {} over digest {}", index, hex::encode(&digest));
        }

        self.id = self.hash();
        Ok(())
    }

    /// 校验所有交易输入的签名
    ///
    /// # 返回值
    ///
    /// 奖励交易直接返回 `Ok(true)`；任一输入验证失败立即返回 `Ok(false)`。
    /// 前序交易缺失或输出索引越界时返回错误。
    pub fn verify(&self, prev_txs: &HashMap<String, Transaction>) -> Result<bool> {
        if self.is_reward() {
            return Ok(true);
        }
        self.ensure_not_empty()?;

        let locking_hashes = self.referenced_locking_hashes(prev_txs)?;
        let secp = Secp256k1::verification_only();
        let view = self.signing_view();

        for (index, (input, locking_hash)) in self.inputs.iter().zip(&locking_hashes).enumerate() {
            let digest = Self::signing_digest(&view, index, locking_hash);

            match verify_input(&secp, &digest, input) {
                Ok(true) => debug!("input {} of {} verified", index, self.id_hex()),
                Ok(false) => {
                    warn!("input {} of {} has an invalid signature", index, self.id_hex());
                    return Ok(false);
                }
                Err(e) => {
                    warn!("input {} of {} rejected: {}", index, self.id_hex(), e);
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.inputs.is_empty() || self.outputs.is_empty() {
            return Err(TxError::EmptyTransaction);
        }
        Ok(())
    }

    /// 找出每个输入引用的输出的公钥哈希
    ///
    /// 任何一个前序交易缺失都会在签名或验证开始之前失败。
    fn referenced_locking_hashes(
        &self,
        prev_txs: &HashMap<String, Transaction>,
    ) -> Result<Vec<Vec<u8>>> {
        self.inputs
            .iter()
            .map(|input| {
                let txid = hex::encode(&input.prev_tx);
                let prev_tx = prev_txs
                    .get(&txid)
                    .ok_or_else(|| TxError::MissingPriorTransaction(txid.clone()))?;

                input
                    .output_index()
                    .and_then(|index| prev_tx.outputs.get(index))
                    .map(|output| output.pub_key_hash.clone())
                    .ok_or(TxError::InvalidOutputIndex {
                        txid,
                        index: input.prev_index,
                    })
            })
            .collect()
    }
}

/// 验证单个输入的签名
///
/// 签名和公钥都按字节长度对半拆分：签名为 `(r, s)`，公钥为 `(x, y)`，均为大端无符号整数。
fn verify_input<C: Verification>(
    secp: &Secp256k1<C>,
    digest: &[u8],
    input: &TxInput,
) -> Result<bool> {
    let (r, s) = split_halves(&input.signature).ok_or_else(|| {
        TxError::MalformedSignatureOrKey(format!("signature of {} bytes", input.signature.len()))
    })?;
    let (x, y) = split_halves(&input.pub_key).ok_or_else(|| {
        TxError::MalformedSignatureOrKey(format!("public key of {} bytes", input.pub_key.len()))
    })?;

    let mut compact = Vec::with_capacity(2 * SCALAR_LEN);
    compact.extend_from_slice(&r);
    compact.extend_from_slice(&s);
    let signature = Signature::from_compact(&compact)
        .map_err(|e| TxError::MalformedSignatureOrKey(e.to_string()))?;

    let mut uncompressed = Vec::with_capacity(1 + 2 * SCALAR_LEN);
    uncompressed.push(UNCOMPRESSED_TAG);
    uncompressed.extend_from_slice(&x);
    uncompressed.extend_from_slice(&y);
    let public_key = PublicKey::from_slice(&uncompressed)
        .map_err(|e| TxError::MalformedSignatureOrKey(e.to_string()))?;

    let message = Message::from_slice(digest)?;
    Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}

/// 把字节串对半拆成两个左侧补零的32字节大端整数
///
/// 长度为零、奇数或半长超过32字节时返回 `None`。
fn split_halves(bytes: &[u8]) -> Option<([u8; SCALAR_LEN], [u8; SCALAR_LEN])> {
    if bytes.is_empty() || bytes.len() % 2 != 0 || bytes.len() / 2 > SCALAR_LEN {
        return None;
    }

    let (first, second) = bytes.split_at(bytes.len() / 2);
    Some((left_pad(first), left_pad(second)))
}

fn left_pad(half: &[u8]) -> [u8; SCALAR_LEN] {
    let mut out = [0u8; SCALAR_LEN];
    out[SCALAR_LEN - half.len()..].copy_from_slice(half);
    out
}

fn write_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u32).to_le_bytes());
}

fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_len(buf, bytes.len());
    buf.extend_from_slice(bytes);
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Transaction {}:", self.id_hex())?;

        for (i, input) in self.inputs.iter().enumerate() {
            writeln!(f, "     Input {}:", i)?;
            writeln!(f, "       TXID:      {}", hex::encode(&input.prev_tx))?;
            writeln!(f, "       Out:       {}", input.prev_index)?;
            writeln!(f, "       Signature: {}", hex::encode(&input.signature))?;
            writeln!(f, "       PubKey:    {}", hex::encode(&input.pub_key))?;
        }

        for (i, output) in self.outputs.iter().enumerate() {
            writeln!(f, "     Output {}:", i)?;
            writeln!(f, "       Value:  {}", output.value)?;
            write!(f, "       Script: {}", hex::encode(&output.pub_key_hash))?;
            if i + 1 < self.outputs.len() {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction::new(
            vec![
                TxInput::new(vec![1u8; 32], 0, vec![9u8; 64]),
                TxInput::new(vec![2u8; 32], 3, vec![9u8; 64]),
            ],
            vec![
                TxOutput::with_pub_key_hash(30, vec![5u8; 20]),
                TxOutput::with_pub_key_hash(20, vec![6u8; 20]),
            ],
        )
    }

    #[test]
    fn hash_ignores_stored_id() {
        let tx = sample_tx();
        let mut other = tx.clone();
        other.id = vec![0xff; 32];

        assert_eq!(tx.hash(), other.hash());
        assert!(tx.has_consistent_id());
        assert!(!other.has_consistent_id());
    }

    #[test]
    fn hash_depends_on_input_order() {
        let tx = sample_tx();
        let mut swapped = tx.clone();
        swapped.inputs.swap(0, 1);

        assert_ne!(tx.hash(), swapped.hash());
    }

    #[test]
    fn signing_view_clears_unlock_data() {
        let mut tx = sample_tx();
        tx.inputs[0].signature = vec![1, 2, 3];
        let view = tx.signing_view();

        assert!(view.id.is_empty());
        assert_eq!(view.outputs, tx.outputs);
        for (v, original) in view.inputs.iter().zip(&tx.inputs) {
            assert_eq!(v.prev_tx, original.prev_tx);
            assert_eq!(v.prev_index, original.prev_index);
            assert!(v.signature.is_empty());
            assert!(v.pub_key.is_empty());
        }
    }

    #[test]
    fn signing_digest_differs_per_input() {
        let view = sample_tx().signing_view();
        let lock = vec![5u8; 20];

        let first = Transaction::signing_digest(&view, 0, &lock);
        let second = Transaction::signing_digest(&view, 1, &lock);
        assert_ne!(first, second);
        // 临时拷贝不影响修剪副本本身
        assert!(view.inputs.iter().all(|input| input.pub_key.is_empty()));
    }

    #[test]
    fn split_halves_rejects_odd_and_empty() {
        assert!(split_halves(&[]).is_none());
        assert!(split_halves(&[1, 2, 3]).is_none());
        assert!(split_halves(&[0u8; 66]).is_none());

        let (r, s) = split_halves(&[1, 2]).unwrap();
        assert_eq!(r[SCALAR_LEN - 1], 1);
        assert_eq!(s[SCALAR_LEN - 1], 2);
        assert!(r[..SCALAR_LEN - 1].iter().all(|b| *b == 0));
    }

    #[test]
    fn display_lists_inputs_and_outputs() {
        let text = sample_tx().to_string();
        assert!(text.starts_with("--- Transaction "));
        assert!(text.contains("Input 1:"));
        assert!(text.contains("Value:  20"));
    }
}
