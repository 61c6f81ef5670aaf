//! # 哈希模块
//!
//! 交易摘要、公钥哈希和地址校验和使用的哈希函数。

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// 计算数据的SHA-256摘要
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// 双重SHA-256，用于地址校验和
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// 计算公钥哈希：RIPEMD160(SHA256(pub_key))
///
/// 输出锁定和输入解锁使用同一个函数，地址中间段也是它的结果。
pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let sha = sha256(pub_key);

    // 使用RIPEMD160进行二次哈希
    let mut ripemd = Ripemd160::new();
    ripemd.update(&sha);
    ripemd.finalize().to_vec()
}
