//! # 采集源适配模块
//!
//! ## 设计思路
//!
//! 拍照/选图机制是外部黑盒（设备相机、相册、测试替身），核心只依赖
//! 一个挂起式 trait：发起交互，挂起，拿回单一的 `CaptureOutcome`。
//! 取消、报错、自定义按钮在此处完成分类与日志，不进入后续流水线。
//!
//! ## 实现思路
//!
//! - trait 返回 `CaptureOutcome` 而非 `Result`：采集源自身的故障属于
//!   `Failed` 结局，与会中止周期的内部错误分开建模。
//! - 适配方法只做日志与透传，不做业务判断。

use super::config::PickerOptions;
use super::source::CaptureOutcome;
use super::UploadHandler;

/// 外部采集源。
///
/// 宿主注入具体实现（设备相机、相册选择器）；测试注入脚本化替身。
/// 调用在外部机制给出结果前保持挂起，单次交互恰好产生一个结局。
pub trait CaptureSource {
    /// 发起一次拍照/选图交互。
    fn request_capture(
        &self,
        options: &PickerOptions,
    ) -> impl std::future::Future<Output = CaptureOutcome> + Send;
}

impl UploadHandler {
    /// 发起采集并记录结局分类。
    pub(super) async fn acquire_photo<S: CaptureSource>(&self, source: &S) -> CaptureOutcome {
        let picker = self.options.picker_options();
        log::info!("📸 发起拍照/选图 - title: {}", picker.title);

        let outcome = source.request_capture(&picker).await;

        match &outcome {
            CaptureOutcome::Selected {
                bytes,
                reported_rotation,
            } => {
                log::info!(
                    "🖼️ 已选择图片 - {} bytes，上报旋转角：{:?}",
                    bytes.len(),
                    reported_rotation
                );
            }
            CaptureOutcome::Cancelled => log::info!("🚪 用户取消了选图"),
            CaptureOutcome::Failed { reason } => log::warn!("⚠️ 采集源错误：{}", reason),
            CaptureOutcome::CustomAction { id } => {
                log::info!("🔘 用户点击了自定义按钮：{}", id);
            }
        }

        outcome
    }
}
