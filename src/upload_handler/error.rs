//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载处理链路中的所有失败来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! 用户取消、采集源报错、自定义按钮不是错误——它们走 `CycleOutcome` 分类，
//! 此处只收编会中止周期的真正失败。

/// 照片处理统一错误类型。
///
/// 任一变体都会中止当前周期并让挂件回到空闲态；宿主回调不会被触发。
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("配置错误：{0}")]
    InvalidOptions(String),

    #[error("变换错误：{0}")]
    Transform(String),

    #[error("回读错误：{0}")]
    Read(String),

    #[error("存储错误：{0}")]
    Storage(String),
}

impl UploadError {
    /// 稳定错误码，供宿主做分类与告警聚合。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "E_INVALID_OPTIONS",
            Self::Transform(_) => "E_TRANSFORM",
            Self::Read(_) => "E_READ",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    /// 失败发生的阶段标识。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "configure",
            Self::Transform(_) => "transform",
            Self::Read(_) => "read",
            Self::Storage(_) => "storage",
        }
    }
}
