//! # 归一化流水线模块
//!
//! ## 设计思路
//!
//! 将“原始字节 → 矫正方向 → 目标尺寸 → 重编码 → base64”的过程集中管理，
//! 优先做签名与尺寸检查，再进行完整解码，尽早失败。
//! 链路固定为两个挂起子步骤，之间无重试：任一步失败即中止整个周期。
//!
//! ## 实现思路
//!
//! 1. 变换子步骤（阻塞线程执行，避免占用 async 运行时）：
//!    签名校验 → 解码 → 按矫正角旋转 → 等比缩小适配目标框 →
//!    按格式/质量重编码 → 写入带时间戳的输出文件，文件路径即位置句柄
//! 2. 回读子步骤：位置句柄前缀翻译 → 异步读取 → base64 编码
//!
//! 位置翻译只处理采集工具特有的虚拟前缀（`file:/data`），
//! 其余句柄原样使用。

use base64::{Engine as _, engine::general_purpose};
use chrono::Local;
use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageBuffer, ImageFormat, Rgba,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::config::OutputFormat;
use super::source::{NormalizationRequest, NormalizedImage};
use super::{UploadError, UploadHandler};
use crate::storage;

/// 采集工具在部分平台上返回的虚拟位置前缀；真实文件系统不接受。
const VIRTUAL_LOCATION_PREFIX: &str = "file:/data";
/// 虚拟前缀对应的真实存储路径前缀。
const REAL_LOCATION_PREFIX: &str = "/data";

impl UploadHandler {
    /// 归一化主入口：变换 + 回读两个挂起子步骤组成的单一逻辑阶段。
    pub(super) async fn normalize(
        &self,
        request: NormalizationRequest,
    ) -> Result<NormalizedImage, UploadError> {
        let output_dir = storage::get_output_dir(&self.options.storage_options.path)?;
        let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
        let file_name = format!("photo_{}.{}", timestamp, request.format.extension());
        let output_path = output_dir.join(file_name);

        let location = tokio::task::spawn_blocking(move || {
            Self::transform_to_location(request, output_path)
        })
        .await
        .map_err(|e| UploadError::Transform(format!("变换任务执行失败：{}", e)))??;

        let encoded = Self::read_back_as_base64(&location).await?;

        Ok(NormalizedImage { location, encoded })
    }

    /// 变换子步骤：解码、矫正、缩放、重编码并落盘，返回位置句柄。
    pub(super) fn transform_to_location(
        request: NormalizationRequest,
        output_path: PathBuf,
    ) -> Result<String, UploadError> {
        if request.target_width == 0 || request.target_height == 0 {
            return Err(UploadError::Transform(format!(
                "目标尺寸必须为正：{}x{}",
                request.target_width, request.target_height
            )));
        }

        Self::validate_photo_signature(&request.bytes)?;

        let decoded = image::load_from_memory(&request.bytes)
            .map_err(|e| UploadError::Transform(format!("图片解码失败：{}", e)))?;
        let (raw_width, raw_height) = decoded.dimensions();

        let corrected = Self::apply_correction(decoded, request.rotation_degrees)?;
        let fitted = Self::fit_within(corrected, request.target_width, request.target_height);
        let (out_width, out_height) = fitted.dimensions();

        Self::encode_to_file(&fitted, &output_path, request.format, request.quality)?;

        log::info!(
            "🧪 变换完成 - 原始尺寸: {}x{} 矫正角: {} 输出尺寸: {}x{} 输出: {}",
            raw_width,
            raw_height,
            request.rotation_degrees,
            out_width,
            out_height,
            output_path.display()
        );

        Ok(output_path.to_string_lossy().to_string())
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_photo_signature(bytes: &[u8]) -> Result<(), UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Transform("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| UploadError::Transform("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(UploadError::Transform(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 按矫正角旋转像素。
    fn apply_correction(image: DynamicImage, degrees: u32) -> Result<DynamicImage, UploadError> {
        match degrees {
            0 => Ok(image),
            90 => Ok(image.rotate90()),
            180 => Ok(image.rotate180()),
            270 => Ok(image.rotate270()),
            other => Err(UploadError::Transform(format!("不支持的矫正角：{}", other))),
        }
    }

    /// 等比缩小适配目标框；不放大小图。
    fn fit_within(image: DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
        let (width, height) = image.dimensions();
        let scale =
            (target_width as f64 / width as f64).min(target_height as f64 / height as f64);

        if scale >= 1.0 {
            return image;
        }

        let out_width = ((width as f64 * scale).floor() as u32).max(1);
        let out_height = ((height as f64 * scale).floor() as u32).max(1);

        log::info!(
            "🧩 等比缩放：{}x{} -> {}x{}",
            width,
            height,
            out_width,
            out_height
        );

        match Self::resize_with_fast_image_resize(&image, out_width, out_height) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
                image.resize_exact(out_width, out_height, FilterType::Triangle)
            }
        }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
    ) -> Result<DynamicImage, UploadError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| UploadError::Transform(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Bilinear));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| UploadError::Transform(format!("fast_image_resize 执行失败：{}", e)))?;

        let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
            target_width,
            target_height,
            dst_image.into_vec(),
        )
        .ok_or_else(|| UploadError::Transform("fast_image_resize 输出缓冲长度异常".to_string()))?;

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    /// 按格式/质量重编码并写入输出文件。
    fn encode_to_file(
        image: &DynamicImage,
        output_path: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), UploadError> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            OutputFormat::Jpeg => {
                let rgb = image.to_rgb8();
                // JPEG 编码器质量下限为 1
                JpegEncoder::new_with_quality(&mut buffer, quality.max(1))
                    .encode_image(&rgb)
                    .map_err(|e| UploadError::Transform(format!("JPEG 编码失败：{}", e)))?;
            }
            OutputFormat::Png => {
                image
                    .write_to(&mut buffer, ImageFormat::Png)
                    .map_err(|e| UploadError::Transform(format!("PNG 编码失败：{}", e)))?;
            }
            OutputFormat::Webp => {
                let rgba = image.to_rgba8();
                let (width, height) = rgba.dimensions();
                WebPEncoder::new_lossless(&mut buffer)
                    .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| UploadError::Transform(format!("WEBP 编码失败：{}", e)))?;
            }
        }

        std::fs::write(output_path, buffer.into_inner()).map_err(|e| {
            UploadError::Transform(format!("写入输出文件 '{}' 失败：{}", output_path.display(), e))
        })
    }

    /// 位置句柄翻译：仅当虚拟前缀存在时重写为真实路径。
    pub(super) fn translate_location(location: &str) -> String {
        match location.strip_prefix(VIRTUAL_LOCATION_PREFIX) {
            Some(rest) => format!("{}{}", REAL_LOCATION_PREFIX, rest),
            None => location.to_string(),
        }
    }

    /// 回读子步骤：读取位置内容并编码为 base64。
    pub(super) async fn read_back_as_base64(location: &str) -> Result<String, UploadError> {
        let path = Self::translate_location(location);

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| UploadError::Read(format!("无法读取归一化图片 '{}'：{}", path, e)))?;

        log::debug!("📖 回读完成 - {} bytes", bytes.len());

        Ok(general_purpose::STANDARD.encode(bytes))
    }
}
