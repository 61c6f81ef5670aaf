//! # 钱包模块
//!
//! secp256k1 密钥对、地址派生以及内存钥匙库。

use std::collections::BTreeMap;

use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::address;
use crate::error::{Result, TxError};
use crate::hash::hash_pub_key;

/// 按地址解析公钥和私钥，交易工厂通过它找到花费者
pub trait WalletStore {
    /// 返回 `(公钥字节 x || y, 私钥)`
    fn resolve(&self, address: &str) -> Result<(Vec<u8>, SecretKey)>;
}

#[derive(Debug, Clone)]
pub struct Wallet {
    pub private_key: SecretKey,
    pub public_key: PublicKey,
}

impl Wallet {
    /// 生成随机密钥对
    pub fn new() -> Self {
        let secp = Secp256k1::new();
        let mut rng = rand::thread_rng();
        let (private_key, public_key) = secp.generate_keypair(&mut rng);

        Wallet {
            private_key,
            public_key,
        }
    }

    /// 用已知的32字节私钥创建钱包
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secp = Secp256k1::new();
        let private_key = SecretKey::from_slice(bytes)?;
        let public_key = PublicKey::from_secret_key(&secp, &private_key);

        Ok(Wallet {
            private_key,
            public_key,
        })
    }

    /// 公钥的 `x || y` 坐标，去掉未压缩编码的前缀字节
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.serialize_uncompressed()[1..].to_vec()
    }

    pub fn pub_key_hash(&self) -> Vec<u8> {
        hash_pub_key(&self.public_key_bytes())
    }

    pub fn address(&self) -> String {
        address::encode(&self.pub_key_hash())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

/// 内存钥匙库：地址 -> 钱包
#[derive(Debug, Clone, Default)]
pub struct Wallets {
    wallets: BTreeMap<String, Wallet>,
}

impl Wallets {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成新钱包并返回其地址
    pub fn create_wallet(&mut self) -> String {
        self.add_wallet(Wallet::new())
    }

    /// 加入已有钱包并返回其地址
    pub fn add_wallet(&mut self, wallet: Wallet) -> String {
        let address = wallet.address();
        self.wallets.insert(address.clone(), wallet);
        address
    }

    pub fn get_wallet(&self, address: &str) -> Option<&Wallet> {
        self.wallets.get(address)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.wallets.keys().cloned().collect()
    }
}

impl WalletStore for Wallets {
    fn resolve(&self, address: &str) -> Result<(Vec<u8>, SecretKey)> {
        let wallet = self
            .get_wallet(address)
            .ok_or_else(|| TxError::UnknownWallet(address.to_string()))?;
        Ok((wallet.public_key_bytes(), wallet.private_key))
    }
}
