//! # 缩放模块
//!
//! ## 设计思路
//!
//! 缩放是纯函数：同一配置下，同样的 (图片, 目标框) 永远得到同样的结果。
//! 目标框的四种形态分别对应：
//! 1. 宽高都给：等比缩放到完全落入框内（受约束更强的一边决定比例）
//! 2. 只给宽：精确宽度，高度 `round(h * W / w)`
//! 3. 只给高：对称处理
//! 4. 都不给：返回原图副本
//!
//! 放大与缩小走同一套公式，不裁剪、不留边、不转换像素格式。
//!
//! ## 实现思路
//!
//! - 优先 `fast_image_resize` 卷积重采样，失败时回退 `image::imageops`
//! - 退化输入（空图、目标尺寸等于原尺寸、放大超出像素上限、重采样全部失败）返回原图副本
//! - 像素上限只约束放大：缩小的结果永远不比原图大，必须照常落入目标框
//! - 构造时校验配置，最近邻滤镜无法进入缩放器

use fast_image_resize as fr;
use image::imageops::FilterType;

use super::{BoundingBox, BoxConstraint, Image, ImageError, PixelFormat, ProviderConfig, Size};

/// 无状态缩放器，只持有一份配置快照。
#[derive(Debug, Clone, Default)]
pub struct Scaler {
    config: ProviderConfig,
}

/// 使用默认配置缩放。
pub fn scale(image: &Image, bounds: BoundingBox) -> Image {
    Scaler::default().scale(image, bounds)
}

/// 计算目标尺寸。无需缩放时返回 `None`。
///
/// # 示例
/// ```rust
/// use capture_provider::image_provider::{target_size, BoundingBox, Size};
///
/// let target = target_size(Size::new(1920, 1080), BoundingBox::fit(400, 400));
/// assert_eq!(target, Some(Size::new(400, 225)));
/// ```
pub fn target_size(source: Size, bounds: BoundingBox) -> Option<Size> {
    if source.is_empty() {
        return None;
    }

    let (sw, sh) = (source.width as f64, source.height as f64);

    let target = match bounds.constraint() {
        BoxConstraint::Unconstrained => return None,
        BoxConstraint::Width(w) => Size::new(w, scaled_dimension(sh, w, sw)),
        BoxConstraint::Height(h) => Size::new(scaled_dimension(sw, h, sh), h),
        BoxConstraint::Fit { width, height } => {
            let width_at_full_height = scaled_dimension(sw, height, sh);
            if width_at_full_height <= width {
                Size::new(width_at_full_height, height)
            } else {
                Size::new(width, scaled_dimension(sh, width, sw).min(height))
            }
        }
    };

    Some(target)
}

/// `round(other * requested / base)`，至少为 1。
fn scaled_dimension(other: f64, requested: u32, base: f64) -> u32 {
    let value = (other * requested as f64 / base).round();
    (value.min(u32::MAX as f64) as u32).max(1)
}

impl Scaler {
    /// 校验配置后创建缩放器。
    pub fn new(config: ProviderConfig) -> Result<Self, ImageError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 按目标框缩放，永远返回一张独立的新图。
    pub fn scale(&self, image: &Image, bounds: BoundingBox) -> Image {
        let source = Size::from(image.dimensions());

        if image.is_empty() {
            return image.clone();
        }

        let Some(target) = target_size(source, bounds) else {
            return image.clone();
        };

        if target == source {
            return image.clone();
        }

        let pixels = target.width as u64 * target.height as u64;
        let source_pixels = source.width as u64 * source.height as u64;
        if pixels > source_pixels && pixels > self.config.max_output_pixels {
            log::warn!(
                "⚠️ 放大目标过大，返回原图：{}x{} -> {}x{}（限制：{} 像素）",
                source.width,
                source.height,
                target.width,
                target.height,
                self.config.max_output_pixels
            );
            return image.clone();
        }

        match self.resize(image, target) {
            Ok(resized) => {
                log::debug!(
                    "🧩 缩放：{}x{} -> {}x{}（filter={:?}）",
                    source.width,
                    source.height,
                    target.width,
                    target.height,
                    self.config.resize_filter
                );
                resized
            }
            Err(err) => {
                log::warn!("⚠️ 缩放失败，返回原图：{}", err);
                image.clone()
            }
        }
    }

    fn resize(&self, image: &Image, target: Size) -> Result<Image, ImageError> {
        if self.config.fast_resize {
            match Self::resize_with_fast_image_resize(image, target, self.config.resize_filter) {
                Ok(resized) => return Ok(resized),
                Err(err) => {
                    log::warn!(
                        "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                        err
                    );
                }
            }
        }

        Self::resize_with_imageops(image, target, self.config.resize_filter)
    }

    fn resize_with_fast_image_resize(
        image: &Image,
        target: Size,
        filter: FilterType,
    ) -> Result<Image, ImageError> {
        let pixel_type = Self::to_fast_pixel_type(image.format());

        let src_image = fr::images::Image::from_vec_u8(
            image.width(),
            image.height(),
            image.as_bytes().to_vec(),
            pixel_type,
        )
        .map_err(|e| ImageError::Resize(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target.width, target.height, pixel_type);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(Self::to_fast_filter(filter)));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ImageError::Resize(format!("fast_image_resize 执行失败：{}", e)))?;

        Image::from_raw(target.width, target.height, image.format(), dst_image.into_vec())
    }

    fn resize_with_imageops(
        image: &Image,
        target: Size,
        filter: FilterType,
    ) -> Result<Image, ImageError> {
        let dynamic = image
            .to_dynamic()
            .ok_or_else(|| ImageError::Resize("源图像缓冲无效".to_string()))?;

        let resized = Image::from(dynamic.resize_exact(target.width, target.height, filter));

        if resized.format() != image.format() {
            return Err(ImageError::Resize("缩放后像素格式发生变化".to_string()));
        }

        Ok(resized)
    }

    fn to_fast_pixel_type(format: PixelFormat) -> fr::PixelType {
        match format {
            PixelFormat::Rgba8 => fr::PixelType::U8x4,
            PixelFormat::Rgb8 => fr::PixelType::U8x3,
            PixelFormat::Luma8 => fr::PixelType::U8,
        }
    }

    fn to_fast_filter(filter: FilterType) -> fr::FilterType {
        match filter {
            FilterType::Nearest => fr::FilterType::Box,
            FilterType::Triangle => fr::FilterType::Bilinear,
            FilterType::CatmullRom => fr::FilterType::CatmullRom,
            FilterType::Gaussian => fr::FilterType::Mitchell,
            FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}
