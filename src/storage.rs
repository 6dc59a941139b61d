//! 归一化图片输出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理归一化后图片的落盘路径：宿主可以通过存储选项给出绝对目录，
//! 否则回退到系统临时目录下的应用子目录，并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 存储提示为绝对路径时直接使用该目录。
//! - 相对路径（如默认的 `images`）挂载到默认输出根目录之下。
//! - 目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;

use crate::upload_handler::UploadError;

/// 默认输出根目录：系统临时目录下的应用子目录。
static DEFAULT_OUTPUT_ROOT: Lazy<PathBuf> = Lazy::new(|| std::env::temp_dir().join("photo-upload"));

/// 获取归一化图片输出目录
///
/// # 参数
/// * `path_hint` - 存储选项中的路径提示（绝对路径或默认根目录下的子目录名）
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的输出目录
/// - `Err(UploadError::Storage)` — 无法创建目录
pub fn get_output_dir(path_hint: &str) -> Result<PathBuf, UploadError> {
    let hint = if path_hint.trim().is_empty() {
        "images"
    } else {
        path_hint.trim()
    };

    let candidate = PathBuf::from(hint);
    let dir = if candidate.is_absolute() {
        candidate
    } else {
        DEFAULT_OUTPUT_ROOT.join(candidate)
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| {
            UploadError::Storage(format!("创建输出目录 '{}' 失败：{}", dir.display(), e))
        })?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_hint_is_used_and_created() {
        let scratch = tempfile::tempdir().expect("create tempdir failed");
        let target = scratch.path().join("deep").join("out");

        let dir = get_output_dir(&target.to_string_lossy()).expect("resolve absolute dir failed");

        assert_eq!(dir, target);
        assert!(dir.exists());
    }

    #[test]
    fn relative_hint_lands_under_default_root() {
        let dir = get_output_dir("images").expect("resolve default dir failed");

        assert!(dir.starts_with(std::env::temp_dir()));
        assert!(dir.ends_with("images"));
        assert!(dir.exists());
    }

    #[test]
    fn empty_hint_falls_back_to_images_subdir() {
        let dir = get_output_dir("  ").expect("resolve fallback dir failed");

        assert!(dir.ends_with("images"));
    }
}
