//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `UploadHandler` 只负责流程编排，不关心采集源与宿主的具体形态。
//! 处理链路固定为：
//! 1. 发起采集并分类结局
//! 2. 解析矫正角
//! 3. 归一化（变换 + 回读）
//! 4. 交付（预览槽 + 回调）
//!
//! ## 实现思路
//!
//! - 配置在创建时校验一次，之后作为不可变快照贯穿所有周期。
//! - 非选中结局（取消/源错误/自定义按钮）在进入流水线前短路返回。
//! - 记录 `capture/normalize/total` 阶段耗时，便于性能诊断。
//! - 周期状态写入 `StateCell`，宿主可随时观测。

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use super::capture::CaptureSource;
use super::delivery::{self, PhotoSelectCallback, PreviewSlot};
use super::source::{CaptureOutcome, NormalizationRequest};
use super::{orientation, UploadError, UploadOptions};

/// 单次采集周期的结局分类。
///
/// 只有 `Delivered` 会触发宿主回调；其余三种是静默结局，
/// 挂件保持可交互以便用户重新尝试。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 周期完整成功，预览与回调均已交付。
    Delivered { location: String },
    /// 用户主动取消。
    Cancelled,
    /// 采集源报告错误。
    SourceFailed { reason: String },
    /// 用户点击了自定义按钮，id 交宿主处置。
    CustomAction { id: String },
}

/// 采集周期状态（可观测）。
///
/// 每个周期从 `Idle` 出发，无论结局如何最终回到 `Idle`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Capturing,
    Normalizing,
    Delivered,
}

/// 周期状态存储；挂件持有，编排过程写入。
pub(super) struct StateCell(AtomicU8);

impl StateCell {
    pub(super) fn new() -> Self {
        Self(AtomicU8::new(CycleState::Idle as u8))
    }

    pub(super) fn set(&self, state: CycleState) {
        self.0.store(state as u8, Ordering::SeqCst);
        log::debug!("🔁 周期状态 → {:?}", state);
    }

    pub(super) fn get(&self) -> CycleState {
        match self.0.load(Ordering::SeqCst) {
            1 => CycleState::Capturing,
            2 => CycleState::Normalizing,
            3 => CycleState::Delivered,
            _ => CycleState::Idle,
        }
    }
}

/// 照片处理编排器。
///
/// 持有不可变配置快照，并编排各子模块实现完整周期。
pub(crate) struct UploadHandler {
    pub(super) options: UploadOptions,
}

impl UploadHandler {
    /// 校验配置并创建编排器。
    pub(crate) fn new(options: UploadOptions) -> Result<Self, UploadError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// 处理主入口：采集 → 矫正 → 归一化 → 交付。
    pub(crate) async fn run_cycle<S: CaptureSource>(
        &self,
        source: &S,
        slot: &PreviewSlot,
        callback: Option<&PhotoSelectCallback>,
        state: &StateCell,
    ) -> Result<CycleOutcome, UploadError> {
        let total_start = Instant::now();

        state.set(CycleState::Capturing);
        let capture_start = Instant::now();
        let outcome = self.acquire_photo(source).await;
        let capture_elapsed = capture_start.elapsed();

        let (bytes, reported_rotation) = match outcome {
            CaptureOutcome::Selected {
                bytes,
                reported_rotation,
            } => (bytes, reported_rotation),
            CaptureOutcome::Cancelled => return Ok(CycleOutcome::Cancelled),
            CaptureOutcome::Failed { reason } => {
                return Ok(CycleOutcome::SourceFailed { reason });
            }
            CaptureOutcome::CustomAction { id } => {
                return Ok(CycleOutcome::CustomAction { id });
            }
        };

        let rotation = orientation::resolve_rotation(reported_rotation);
        let request = NormalizationRequest::new(&self.options, rotation, bytes);

        state.set(CycleState::Normalizing);
        let normalize_start = Instant::now();
        let image = self.normalize(request).await?;
        let normalize_elapsed = normalize_start.elapsed();

        let location = image.location.clone();
        delivery::deliver(slot, callback, image)?;
        state.set(CycleState::Delivered);

        let total_elapsed = total_start.elapsed();
        log::info!(
            "✅ 照片处理完成 - capture={}ms normalize={}ms total={}ms",
            capture_elapsed.as_millis(),
            normalize_elapsed.as_millis(),
            total_elapsed.as_millis()
        );

        Ok(CycleOutcome::Delivered { location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload_handler::PickerOptions;

    struct FixedSource {
        outcome: CaptureOutcome,
    }

    impl CaptureSource for FixedSource {
        async fn request_capture(&self, _options: &PickerOptions) -> CaptureOutcome {
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn cancelled_outcome_short_circuits_before_pipeline() {
        let handler = UploadHandler::new(UploadOptions::default()).expect("handler init failed");
        let slot = PreviewSlot::new();
        let state = StateCell::new();
        let source = FixedSource {
            outcome: CaptureOutcome::Cancelled,
        };

        let outcome = handler
            .run_cycle(&source, &slot, None, &state)
            .await
            .expect("cycle should not error");

        assert_eq!(outcome, CycleOutcome::Cancelled);
        assert!(slot.current().is_none());
    }

    #[tokio::test]
    async fn source_failure_is_a_silent_outcome_not_an_error() {
        let handler = UploadHandler::new(UploadOptions::default()).expect("handler init failed");
        let slot = PreviewSlot::new();
        let state = StateCell::new();
        let source = FixedSource {
            outcome: CaptureOutcome::Failed {
                reason: "camera unavailable".to_string(),
            },
        };

        let outcome = handler
            .run_cycle(&source, &slot, None, &state)
            .await
            .expect("cycle should not error");

        assert_eq!(
            outcome,
            CycleOutcome::SourceFailed {
                reason: "camera unavailable".to_string()
            }
        );
        assert!(slot.current().is_none());
    }

    #[test]
    fn invalid_options_are_rejected_at_creation() {
        let mut options = UploadOptions::default();
        options.height = 0;

        assert!(matches!(
            UploadHandler::new(options),
            Err(UploadError::InvalidOptions(_))
        ));
    }

    #[test]
    fn state_cell_round_trips_all_states() {
        let state = StateCell::new();
        assert_eq!(state.get(), CycleState::Idle);

        for next in [
            CycleState::Capturing,
            CycleState::Normalizing,
            CycleState::Delivered,
            CycleState::Idle,
        ] {
            state.set(next);
            assert_eq!(state.get(), next);
        }
    }
}
