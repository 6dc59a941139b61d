//! # 照片上传核心 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    宿主应用（渲染层）                      │
//! │                                                          │
//! │  可点击的上传区域 ── 预览元素 ── onPhotoSelect 回调        │
//! │       │                ↑              ↑                  │
//! │   activate()      PreviewSlot     base64 字符串           │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<CycleOutcome, UploadError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            photo-upload (Rust)                   │
//! │                                                          │
//! │  ┌─ upload_handler ── 采集·矫正·归一化·交付                │
//! │  │   ├─ widget        宿主面向挂件（不可变配置 + 周期锁）   │
//! │  │   ├─ handler       固定链路编排 + 阶段耗时日志          │
//! │  │   ├─ capture       外部采集源 trait 适配                │
//! │  │   ├─ orientation   旋转矫正角解析                      │
//! │  │   ├─ pipeline      解码·旋转·缩放·重编码·回读           │
//! │  │   └─ delivery      预览槽更新 + 宿主回调                │
//! │  │                                                       │
//! │  └─ storage ───────── 归一化图片输出目录 (返回 Result)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`upload_handler`] | 一次完整采集周期：采集 → 矫正角解析 → 归一化 → 交付 |
//! | [`storage`] | 归一化图片输出目录的获取与自动创建 |

pub mod storage;
pub mod upload_handler;
