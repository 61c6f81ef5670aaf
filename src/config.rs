//! # 配置模块
//!
//! 账本使用的固定常量。日志级别通过 `RUST_LOG` 环境变量配置。

/// 奖励交易的固定输出金额
pub const SUBSIDY: u64 = 10;

/// 地址版本字节
pub const ADDRESS_VERSION: u8 = 0x00;

/// 地址尾部校验和的字节数
pub const ADDRESS_CHECKSUM_LEN: usize = 4;

/// 创世奖励交易的备注
pub const GENESIS_MEMO: &str =
    "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";
