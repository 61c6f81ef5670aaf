//! # 错误模块
//!
//! 交易层所有可失败操作返回 [`TxError`]。
//!
//! 调用方违反契约（缺失前序交易、非法地址等）以 `Err` 返回；
//! 签名验证失败不是错误，`verify` 返回 `Ok(false)`。

use thiserror::Error;

/// 交易层错误
#[derive(Debug, Error)]
pub enum TxError {
    /// 地址字符集、长度或校验和非法
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// 签名或验证引用了查找集合中不存在的交易
    #[error("previous transaction {0} is not known")]
    MissingPriorTransaction(String),

    /// 引用的输出索引超出前序交易的输出范围
    #[error("transaction {txid} has no output at index {index}")]
    InvalidOutputIndex { txid: String, index: i64 },

    /// 可用UTXO不足以支付
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// 签名或公钥格式错误
    #[error("malformed signature or key: {0}")]
    MalformedSignatureOrKey(String),

    /// 交易没有输入或没有输出
    #[error("transaction has no inputs or no outputs")]
    EmptyTransaction,

    /// 转账金额必须大于零
    #[error("transfer amount must be greater than zero")]
    InvalidAmount,

    /// 钱包中找不到该地址
    #[error("no wallet for address {0}")]
    UnknownWallet(String),

    #[error("transaction {0} is already committed")]
    DuplicateTransaction(String),

    /// 存储的ID与重新计算的摘要不一致
    #[error("transaction id {0} does not match its content")]
    CorruptTransactionId(String),

    #[error("transaction {0} failed signature verification")]
    VerificationFailed(String),

    #[error("output {index} of transaction {txid} is already spent")]
    OutputAlreadySpent { txid: String, index: i64 },

    /// 输入的公钥不能解锁引用的输出
    #[error("input key does not unlock output {index} of transaction {txid}")]
    UnauthorizedSpend { txid: String, index: i64 },

    /// 金额累加超出u64范围
    #[error("amount total overflows u64")]
    AmountOverflow,

    #[error("outputs ({outputs}) exceed inputs ({inputs})")]
    OutputsExceedInputs { inputs: u64, outputs: u64 },

    #[error("crypto error: {0}")]
    Crypto(#[from] secp256k1::Error),
}

pub type Result<T> = std::result::Result<T, TxError>;
