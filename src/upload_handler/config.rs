//! # 配置模块
//!
//! ## 设计思路
//!
//! 宿主在创建挂件时一次性给出全部可调项，之后整个生命周期内不可变：
//! 单次周期内不存在“配置漂移”，归一化请求总是从同一份快照构造。
//! 宿主面向字段名与原始组件的配置记录保持一致（camelCase），
//! 未识别的键（如样式类配置）直接忽略。
//!
//! ## 实现思路
//!
//! - `Default` 提供与原始组件一致的默认值（300×300 / JPEG / 80 / 0）。
//! - `OutputFormat` 负责格式字符串解析与反向输出。
//! - `validate` 在挂件创建时做范围检查，尽早失败。
//! - `picker_options` 构造传给采集源的透传子集。

use serde::{Deserialize, Serialize};

use super::UploadError;

/// 归一化输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// 有损编码，`quality` 生效。
    Jpeg,
    /// 无损编码，`quality` 忽略。
    Png,
    /// 无损编码，`quality` 忽略。
    Webp,
}

impl OutputFormat {
    /// 从外部字符串解析格式。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use photo_upload::upload_handler::OutputFormat;
    ///
    /// let format = OutputFormat::from_str("jpeg")?;
    /// assert_eq!(format.as_str(), "JPEG");
    /// # Ok::<(), photo_upload::upload_handler::UploadError>(())
    /// ```
    pub fn from_str(format: &str) -> Result<Self, UploadError> {
        match format.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(UploadError::InvalidOptions(format!(
                "未知输出格式：{}（可选：JPEG / PNG / WEBP）",
                other
            ))),
        }
    }

    /// 将格式输出为稳定字符串，供宿主展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Webp => "WEBP",
        }
    }

    /// 落盘文件扩展名。
    pub(crate) fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = UploadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

/// 采集源存储提示（原样透传，不做校验）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageOptions {
    /// 是否提示采集源跳过系统备份。
    pub skip_backup: bool,
    /// 路径提示：绝对目录，或默认输出根目录下的子目录名。
    pub path: String,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            skip_backup: true,
            path: "images".to_string(),
        }
    }
}

/// 挂件配置（宿主面向的完整配置记录）。
///
/// 字段覆盖了选图界面文案、归一化目标与存储提示三类配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    /// 选图界面标题。
    pub photo_picker_title: String,
    /// 取消按钮文案。
    pub cancel_button_title: String,
    /// 拍照按钮文案。
    pub take_photo_button_title: String,
    /// 从相册选择按钮文案。
    pub choose_from_library_button_title: String,
    /// 归一化目标高度（像素）。
    pub height: u32,
    /// 归一化目标宽度（像素）。
    pub width: u32,
    /// 重编码格式。
    pub format: OutputFormat,
    /// 编码质量（0~100，仅 JPEG 生效）。
    pub quality: u8,
    /// 宿主配置的默认旋转角；每个周期会被矫正角解析结果覆盖。
    pub rotation: u32,
    /// 采集源存储提示。
    pub storage_options: StorageOptions,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            photo_picker_title: "Select Photo".to_string(),
            cancel_button_title: "Cancel".to_string(),
            take_photo_button_title: "Take Photo".to_string(),
            choose_from_library_button_title: "Choose from Library".to_string(),
            height: 300,
            width: 300,
            format: OutputFormat::Jpeg,
            quality: 80,
            rotation: 0,
            storage_options: StorageOptions::default(),
        }
    }
}

/// 传给外部采集源的透传配置子集。
#[derive(Debug, Clone)]
pub struct PickerOptions {
    pub title: String,
    pub cancel_button_title: String,
    pub take_photo_button_title: String,
    pub choose_from_library_button_title: String,
    pub storage: StorageOptions,
}

impl UploadOptions {
    /// 从宿主传入的 JSON 配置记录构造并校验。
    ///
    /// 未识别的键（如 `containerStyle` 等样式配置）会被忽略。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use photo_upload::upload_handler::UploadOptions;
    ///
    /// let options = UploadOptions::from_json(serde_json::json!({
    ///     "photoPickerTitle": "选择照片",
    ///     "height": 512,
    ///     "format": "PNG",
    /// }))?;
    /// assert_eq!(options.width, 300);
    /// # Ok::<(), photo_upload::upload_handler::UploadError>(())
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self, UploadError> {
        let options: Self = serde_json::from_value(value)
            .map_err(|e| UploadError::InvalidOptions(format!("解析配置记录失败：{}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// 范围检查。挂件创建时调用，之后配置不再变化。
    pub(crate) fn validate(&self) -> Result<(), UploadError> {
        if self.height == 0 || self.width == 0 {
            return Err(UploadError::InvalidOptions(format!(
                "目标尺寸必须为正：{}x{}",
                self.width, self.height
            )));
        }
        if self.quality > 100 {
            return Err(UploadError::InvalidOptions(format!(
                "quality 必须在 0~100 之间：{}",
                self.quality
            )));
        }
        if !matches!(self.rotation, 0 | 90 | 180 | 270) {
            return Err(UploadError::InvalidOptions(format!(
                "rotation 必须是 0 / 90 / 180 / 270：{}",
                self.rotation
            )));
        }
        Ok(())
    }

    /// 构造传给采集源的透传子集。
    pub(crate) fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            title: self.photo_picker_title.clone(),
            cancel_button_title: self.cancel_button_title.clone(),
            take_photo_button_title: self.take_photo_button_title.clone(),
            choose_from_library_button_title: self.choose_from_library_button_title.clone(),
            storage: self.storage_options.clone(),
        }
    }
}
