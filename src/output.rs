//! # 交易输出模块
//!
//! 交易输出表示锁定到某个公钥哈希的金额，只有持有对应公钥的人才能花费。

use serde::{Deserialize, Serialize};

use crate::address;
use crate::error::Result;

/// 交易输出结构，表示可花费的金额和接收者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// 输出金额
    pub value: u64,
    /// 锁定输出的公钥哈希
    #[serde(with = "hex::serde")]
    pub pub_key_hash: Vec<u8>,
}

impl TxOutput {
    /// 创建一个锁定到地址的输出
    ///
    /// # 参数
    ///
    /// * `value` - 输出金额
    /// * `address` - 接收者地址
    ///
    /// # 返回值
    ///
    /// 地址非法时返回 `InvalidAddress`
    pub fn new(value: u64, address: &str) -> Result<Self> {
        let mut output = TxOutput {
            value,
            pub_key_hash: Vec::new(),
        };
        output.lock(address)?;
        Ok(output)
    }

    /// 直接用已知的公钥哈希创建输出
    pub fn with_pub_key_hash(value: u64, pub_key_hash: Vec<u8>) -> Self {
        TxOutput {
            value,
            pub_key_hash,
        }
    }

    /// 将输出锁定到地址：解码后去掉版本字节和4字节校验和
    pub fn lock(&mut self, address: &str) -> Result<()> {
        self.pub_key_hash = address::pub_key_hash_of(address)?;
        Ok(())
    }

    /// 检查输出是否能被该公钥哈希的拥有者使用
    pub fn is_locked_with(&self, pub_key_hash: &[u8]) -> bool {
        self.pub_key_hash == pub_key_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TxError;

    #[test]
    fn locks_to_address_hash() {
        let hash = vec![0x11u8; 20];
        let output = TxOutput::new(42, &address::encode(&hash)).unwrap();

        assert_eq!(output.value, 42);
        assert!(output.is_locked_with(&hash));
        assert!(!output.is_locked_with(&hash[..19]));
        assert!(!output.is_locked_with(&[0x12u8; 20]));
    }

    #[test]
    fn rejects_invalid_address() {
        assert!(matches!(
            TxOutput::new(1, "not-an-address"),
            Err(TxError::InvalidAddress(_))
        ));
    }
}
