//! # UTXO账本交易层
//!
//! 创建、哈希、签名和验证价值转移记录，并选择可花费的前序输出为新交易提供资金。
//!
//! ## 主要模块
//!
//! * `transaction` - 交易结构、交易ID、逐输入签名与验证
//! * `input` / `output` - 交易输入引用与输出锁定
//! * `utxo` - 未花费输出查询接口与资金选择
//! * `factory` - 奖励交易和转账交易的构建
//! * `address` - 地址编解码
//! * `wallet` - 密钥对与内存钥匙库
//! * `ledger` - 内存账本，维护UTXO集合并提交交易

pub mod address;
pub mod config;
pub mod error;
pub mod factory;
pub mod hash;
pub mod input;
pub mod ledger;
pub mod output;
pub mod transaction;
pub mod utxo;
pub mod wallet;

pub use error::{Result, TxError};
pub use factory::{new_reward_transaction, new_transfer_transaction};
pub use input::TxInput;
pub use ledger::Ledger;
pub use output::TxOutput;
pub use transaction::Transaction;
pub use utxo::{find_spendable, OutPoint, UnspentOutput, UtxoQuery, UtxoSet};
pub use wallet::{Wallet, WalletStore, Wallets};
