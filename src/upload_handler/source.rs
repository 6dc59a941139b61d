//! # 采集结果与中间模型
//!
//! ## 设计思路
//!
//! 将“外部采集机制的交互结果”和“流水线中间结果”解耦：
//! - `CaptureOutcome` 表示单次交互的归一化结局
//! - `NormalizationRequest` 表示一次不可变的归一化请求
//! - `NormalizedImage` 表示可交付宿主的归一化输出
//! - `PreviewReference` 表示渲染层使用的预览引用

use super::config::{OutputFormat, UploadOptions};

/// 外部采集机制单次交互的归一化结局。
///
/// 每次用户交互恰好产生一个；被矫正角解析消费后即丢弃。
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// 用户拍照或从相册选中了图片。
    Selected {
        /// 原始图片字节。
        bytes: Vec<u8>,
        /// 设备上报的旋转元数据（可能缺失或为 0）。
        reported_rotation: Option<i32>,
    },
    /// 用户主动取消。
    Cancelled,
    /// 采集源报告错误。
    Failed { reason: String },
    /// 用户点击了宿主配置的自定义按钮。
    CustomAction { id: String },
}

/// 单次归一化请求：配置快照 + 解析后的矫正角 + 原始字节。
pub(crate) struct NormalizationRequest {
    pub(crate) bytes: Vec<u8>,
    pub(crate) target_height: u32,
    pub(crate) target_width: u32,
    pub(crate) format: OutputFormat,
    pub(crate) quality: u8,
    pub(crate) rotation_degrees: u32,
}

impl NormalizationRequest {
    /// 从配置快照构造；矫正角来自方向解析，覆盖配置中的默认旋转。
    pub(crate) fn new(options: &UploadOptions, rotation_degrees: u32, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            target_height: options.height,
            target_width: options.width,
            format: options.format,
            quality: options.quality,
            rotation_degrees,
        }
    }
}

/// 归一化输出：位置句柄 + 回读得到的 base64 载荷。
///
/// 由流水线持有，交付后所有权移交交付汇；下个周期开始前生命周期结束。
#[derive(Debug)]
pub struct NormalizedImage {
    /// 变换后图片所在位置（平台相关句柄）。
    pub location: String,
    /// base64 编码的图片字节。
    pub encoded: String,
}

/// 渲染层使用的预览引用；每次成功周期整体替换。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PreviewReference {
    pub uri: String,
}
