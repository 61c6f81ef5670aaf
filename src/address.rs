//! # 地址模块
//!
//! 地址编码：`base58(版本字节 || 公钥哈希 || 校验和)`，
//! 校验和取 `SHA256(SHA256(版本字节 || 公钥哈希))` 的前4个字节。

use crate::config::{ADDRESS_CHECKSUM_LEN, ADDRESS_VERSION};
use crate::error::{Result, TxError};
use crate::hash::double_sha256;

/// 计算版本化载荷的校验和
fn checksum(payload: &[u8]) -> Vec<u8> {
    double_sha256(payload)[..ADDRESS_CHECKSUM_LEN].to_vec()
}

/// 将公钥哈希编码为地址
pub fn encode(pub_key_hash: &[u8]) -> String {
    let mut payload = Vec::with_capacity(1 + pub_key_hash.len() + ADDRESS_CHECKSUM_LEN);
    payload.push(ADDRESS_VERSION);
    payload.extend_from_slice(pub_key_hash);

    let check = checksum(&payload);
    payload.extend_from_slice(&check);

    bs58::encode(payload).into_string()
}

/// 解码地址为原始字节（版本字节 + 公钥哈希 + 校验和）
///
/// 字符集非法、长度不足5字节或校验和不匹配时返回 `InvalidAddress`。
pub fn decode(address: &str) -> Result<Vec<u8>> {
    let raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| TxError::InvalidAddress(format!("{}: {}", address, e)))?;

    if raw.len() < 1 + ADDRESS_CHECKSUM_LEN {
        return Err(TxError::InvalidAddress(format!(
            "{}: decoded to {} bytes",
            address,
            raw.len()
        )));
    }

    let (payload, actual) = raw.split_at(raw.len() - ADDRESS_CHECKSUM_LEN);
    if checksum(payload) != actual {
        return Err(TxError::InvalidAddress(format!("{}: checksum mismatch", address)));
    }

    Ok(raw)
}

/// 从地址中取出公钥哈希（去掉版本字节和校验和）
pub fn pub_key_hash_of(address: &str) -> Result<Vec<u8>> {
    let raw = decode(address)?;
    Ok(raw[1..raw.len() - ADDRESS_CHECKSUM_LEN].to_vec())
}

/// 检查地址是否合法
pub fn validate(address: &str) -> bool {
    decode(address).is_ok()
}
