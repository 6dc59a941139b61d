//! # 方向解析模块
//!
//! ## 设计思路
//!
//! 部分平台的采集机制只把拍摄方向写进元数据而不落实到像素，
//! 流水线必须反向旋转补偿。此处把设备上报值映射为矫正角。
//!
//! 映射刻意保持非对称：除恰好 270 以外的任何非零上报值一律矫正 90 度。
//! 该行为针对实际设备表现调校，不要推广成对称的角度透传。

/// 将设备上报的旋转元数据解析为归一化时应用的矫正角。
///
/// 纯函数；返回值保证落在 {0, 90, 270} 内。
pub(crate) fn resolve_rotation(reported: Option<i32>) -> u32 {
    match reported {
        None | Some(0) => 0,
        Some(270) => 270,
        Some(_) => 90,
    }
}
