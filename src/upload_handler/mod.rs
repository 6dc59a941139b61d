//! # 照片上传处理模块（upload_handler）
//!
//! ## 设计思路
//!
//! 该模块将“发起采集 → 结果分类 → 矫正角解析 → 归一化变换 → 交付宿主”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `widget`：宿主面向挂件（不可变配置快照、周期锁、状态观测）
//! - `handler`：编排整条处理链路
//! - `capture`：外部采集源 trait 与结果分类
//! - `orientation`：设备上报旋转 → 矫正角
//! - `pipeline`：解码、旋转、缩放、重编码、位置翻译、回读
//! - `delivery`：预览槽更新与宿主回调
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 实现思路
//!
//! 对外仅暴露必要类型，内部细节保持 `mod` 私有。
//! 宿主通过 `PhotoUploadWidget` 注入采集源与回调，提升测试隔离能力。
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 宿主点击（activate）
//!    ↓
//! widget.rs（配置快照、周期锁、状态复位）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ capture.rs（采集源适配 + 结果分类日志）
//!    ├─ orientation.rs（矫正角解析，纯函数）
//!    ├─ pipeline.rs（变换子步骤 + 回读子步骤）
//!    └─ delivery.rs（预览槽整体替换 + 回调一次）
//!    ↓
//! 返回 CycleOutcome / UploadError 给宿主
//! ```
//!
//! ## 分层职责建议
//!
//! - 宿主接入方式变更优先改 `widget.rs`
//! - 配置与默认值变更优先改 `config.rs`
//! - 处理流程顺序变更优先改 `handler.rs`
//! - 单阶段行为优化分别改 `capture/pipeline/delivery`

mod capture;
mod config;
mod delivery;
mod error;
mod handler;
mod orientation;
mod pipeline;
mod source;
mod widget;

pub use capture::CaptureSource;
pub use config::{OutputFormat, PickerOptions, StorageOptions, UploadOptions};
pub use delivery::PreviewSlot;
pub use error::UploadError;
pub use handler::{CycleOutcome, CycleState};
pub use source::{CaptureOutcome, NormalizedImage, PreviewReference};
pub use widget::PhotoUploadWidget;

/// 内部核心编排器，不直接暴露给宿主。
pub(crate) use handler::UploadHandler;
