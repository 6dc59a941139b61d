//! # 宿主面向挂件层
//!
//! ## 设计思路
//!
//! `PhotoUploadWidget` 是宿主嵌入的“可点击上传区域”的核心状态：
//! 一份创建时固化的配置快照、一个注入的采集源、一个预览槽和一个可选回调。
//! `activate()` 对应一次点击：运行完整采集周期，所有结局都回到空闲态。
//!
//! ## 实现思路
//!
//! - 配置在构造时校验并固化，之后不可变，避免处理中途配置漂移。
//! - 周期锁保证同一挂件同时最多一个周期在途；后续激活排队等待。
//! - 失败统一记录 `code/stage` 便于宿主侧排障，回调绝不在失败时触发。

use tokio::sync::Mutex;

use super::capture::CaptureSource;
use super::delivery::{PhotoSelectCallback, PreviewSlot};
use super::handler::{CycleOutcome, CycleState, StateCell, UploadHandler};
use super::{UploadError, UploadOptions};

/// 照片上传挂件。
///
/// # 示例
/// ```rust,ignore
/// use photo_upload::upload_handler::{PhotoUploadWidget, UploadOptions};
///
/// # async fn demo(camera: impl photo_upload::upload_handler::CaptureSource) -> Result<(), photo_upload::upload_handler::UploadError> {
/// let widget = PhotoUploadWidget::new(UploadOptions::default(), camera)?
///     .on_photo_select(|encoded| println!("base64 长度：{}", encoded.len()));
///
/// let outcome = widget.activate().await?;
/// # Ok(())
/// # }
/// ```
pub struct PhotoUploadWidget<S: CaptureSource> {
    handler: UploadHandler,
    source: S,
    preview: PreviewSlot,
    on_photo_select: Option<PhotoSelectCallback>,
    cycle_lock: Mutex<()>,
    state: StateCell,
}

impl<S: CaptureSource> PhotoUploadWidget<S> {
    /// 校验配置并创建挂件。
    pub fn new(options: UploadOptions, source: S) -> Result<Self, UploadError> {
        Ok(Self {
            handler: UploadHandler::new(options)?,
            source,
            preview: PreviewSlot::new(),
            on_photo_select: None,
            cycle_lock: Mutex::new(()),
            state: StateCell::new(),
        })
    }

    /// 绑定宿主创建的预览槽（渲染层持有读取端）。
    pub fn with_preview_slot(mut self, slot: PreviewSlot) -> Self {
        self.preview = slot;
        self
    }

    /// 设置照片回调；仅在周期完整成功后触发，收到 base64 载荷。
    pub fn on_photo_select(
        mut self,
        callback: impl Fn(String) + Send + Sync + 'static,
    ) -> Self {
        self.on_photo_select = Some(std::sync::Arc::new(callback));
        self
    }

    /// 获取预览槽句柄，供渲染层读取当前预览引用。
    pub fn preview_slot(&self) -> PreviewSlot {
        self.preview.clone()
    }

    /// 观测当前周期状态。
    pub fn current_state(&self) -> CycleState {
        self.state.get()
    }

    /// 激活一次采集周期（对应一次点击）。
    ///
    /// 同一挂件上的并发激活按到达顺序排队；无论结局如何，
    /// 返回前挂件都会回到空闲态，可立即再次激活。
    pub async fn activate(&self) -> Result<CycleOutcome, UploadError> {
        let _cycle = self.cycle_lock.lock().await;

        let result = self
            .handler
            .run_cycle(
                &self.source,
                &self.preview,
                self.on_photo_select.as_ref(),
                &self.state,
            )
            .await;

        self.state.set(CycleState::Idle);

        if let Err(err) = &result {
            log::warn!(
                "❌ 照片处理失败（code={} stage={}）：{}",
                err.code(),
                err.stage(),
                err
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload_handler::{CaptureOutcome, PickerOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedSource {
        outcome: CaptureOutcome,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(outcome: CaptureOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CaptureSource for &FixedSource {
        async fn request_capture(&self, _options: &PickerOptions) -> CaptureOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn widget_returns_to_idle_after_silent_outcomes() {
        let source = FixedSource::new(CaptureOutcome::Cancelled);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_cb = Arc::clone(&calls);

        let widget = PhotoUploadWidget::new(UploadOptions::default(), &source)
            .expect("widget init failed")
            .on_photo_select(move |_| {
                calls_in_cb.fetch_add(1, Ordering::SeqCst);
            });

        let outcome = widget.activate().await.expect("cycle should not error");

        assert_eq!(outcome, CycleOutcome::Cancelled);
        assert_eq!(widget.current_state(), CycleState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(widget.preview_slot().current().is_none());
    }

    #[tokio::test]
    async fn custom_action_id_is_surfaced_to_the_host() {
        let source = FixedSource::new(CaptureOutcome::CustomAction {
            id: "remove-photo".to_string(),
        });
        let widget =
            PhotoUploadWidget::new(UploadOptions::default(), &source).expect("widget init failed");

        let outcome = widget.activate().await.expect("cycle should not error");

        assert_eq!(
            outcome,
            CycleOutcome::CustomAction {
                id: "remove-photo".to_string()
            }
        );
        assert_eq!(widget.current_state(), CycleState::Idle);
    }

    #[tokio::test]
    async fn each_activation_requests_capture_afresh() {
        let source = FixedSource::new(CaptureOutcome::Cancelled);
        let widget =
            PhotoUploadWidget::new(UploadOptions::default(), &source).expect("widget init failed");

        widget.activate().await.expect("first cycle failed");
        widget.activate().await.expect("second cycle failed");

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalid_options_fail_widget_creation() {
        let source = FixedSource::new(CaptureOutcome::Cancelled);
        let mut options = UploadOptions::default();
        options.quality = 200;

        assert!(matches!(
            PhotoUploadWidget::new(options, &source),
            Err(UploadError::InvalidOptions(_))
        ));
    }
}
