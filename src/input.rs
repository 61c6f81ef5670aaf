//! # 交易输入模块

use serde::{Deserialize, Serialize};

use crate::hash::hash_pub_key;

/// 奖励交易输入使用的输出索引哨兵值
pub const REWARD_OUTPUT_INDEX: i64 = -1;

/// 交易输入结构，引用之前交易的输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// 前一个交易的ID，奖励交易为空
    #[serde(with = "hex::serde")]
    pub prev_tx: Vec<u8>,
    /// 前一个交易中输出的索引，奖励交易为 -1
    pub prev_index: i64,
    /// 签名 `r || s`，签名前为空
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    /// 花费者的完整公钥 `x || y`；奖励交易中存放备注
    #[serde(with = "hex::serde")]
    pub pub_key: Vec<u8>,
}

impl TxInput {
    /// 创建一个未签名的输入
    pub fn new(prev_tx: Vec<u8>, prev_index: i64, pub_key: Vec<u8>) -> Self {
        TxInput {
            prev_tx,
            prev_index,
            signature: Vec::new(),
            pub_key,
        }
    }

    /// 检查输入的公钥是否能解锁该公钥哈希锁定的输出
    pub fn unlocks_with(&self, pub_key_hash: &[u8]) -> bool {
        hash_pub_key(&self.pub_key) == pub_key_hash
    }

    /// 引用的输出索引，哨兵值返回 `None`
    pub fn output_index(&self) -> Option<usize> {
        usize::try_from(self.prev_index).ok()
    }
}
