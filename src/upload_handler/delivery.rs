//! # 交付模块
//!
//! ## 设计思路
//!
//! 归一化结果通过两条通道交付宿主：
//! - **预览槽**：宿主创建并持有读取端的类型化占位，渲染层从中读取
//!   当前预览引用；交付汇是唯一写入方，且只做整体替换——读取方
//!   看到的要么是上一个完整结果，要么是新结果，不存在中间态。
//! - **回调**：宿主配置的 `on_photo_select`，收到 base64 字符串，
//!   仅在整个周期成功后触发恰好一次。回调内部的 panic 不做捕获。

use std::sync::{Arc, Mutex};

use super::source::{NormalizedImage, PreviewReference};
use super::UploadError;

/// 宿主照片回调：收到归一化图片的 base64 载荷。
pub(crate) type PhotoSelectCallback = Arc<dyn Fn(String) + Send + Sync>;

/// 预览槽：宿主创建、渲染层读取、交付汇写入的共享占位。
#[derive(Clone, Default)]
pub struct PreviewSlot {
    inner: Arc<Mutex<Option<PreviewReference>>>,
}

impl PreviewSlot {
    /// 创建一个空的预览槽。
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染层读取当前预览引用。
    pub fn current(&self) -> Option<PreviewReference> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => {
                log::warn!("⚠️ 预览槽锁已中毒，按空槽处理");
                None
            }
        }
    }

    /// 整体替换槽内引用；仅交付汇调用。
    pub(crate) fn replace(&self, preview: PreviewReference) -> Result<(), UploadError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| UploadError::Storage("预览槽锁已中毒".to_string()))?;
        *guard = Some(preview);
        Ok(())
    }
}

/// 交付汇：预览槽整体替换 + 宿主回调，同步终点。
pub(super) fn deliver(
    slot: &PreviewSlot,
    callback: Option<&PhotoSelectCallback>,
    image: NormalizedImage,
) -> Result<(), UploadError> {
    slot.replace(PreviewReference {
        uri: image.location.clone(),
    })?;
    log::info!("🖼️ 预览已更新 - {}", image.location);

    if let Some(callback) = callback {
        let payload_len = image.encoded.len();
        callback(image.encoded);
        log::info!("📤 已回调宿主 - base64 {} 字符", payload_len);
    }

    Ok(())
}
