//! # 位图数据模型
//!
//! ## 设计思路
//!
//! `Image` 是链路中唯一的像素载体：宽、高、像素格式与自有缓冲。
//! - 字段全部私有，构造后不可变
//! - `Clone` 是深拷贝，跨越缓存边界的永远是副本，调用方改不到缓存里的数据
//! - 宽或高为 0 的图即“空图”，代表一次失败的生成

use image::{DynamicImage, RgbaImage};

use super::ImageError;

/// 像素格式（均为 8 bit 通道）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8,
    Rgb8,
    Luma8,
}

impl PixelFormat {
    /// 每像素字节数。
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
            Self::Luma8 => 1,
        }
    }
}

/// 不可变位图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// 由原始像素构造，校验缓冲长度与尺寸一致。
    ///
    /// # 示例
    /// ```rust
    /// use capture_provider::image_provider::{Image, PixelFormat};
    ///
    /// let img = Image::from_raw(2, 1, PixelFormat::Rgba8, vec![0; 8])?;
    /// assert_eq!(img.width(), 2);
    /// # Ok::<(), capture_provider::image_provider::ImageError>(())
    /// ```
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = expected_len(width, height, format)?;

        if data.len() != expected {
            return Err(ImageError::InvalidFormat(format!(
                "像素缓冲长度不匹配：{} 字节（期望：{}x{}x{} = {}）",
                data.len(),
                width,
                height,
                format.bytes_per_pixel(),
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// RGBA8 快捷构造。
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::from_raw(width, height, PixelFormat::Rgba8, data)
    }

    /// 空图：零尺寸，代表生成失败。
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::Rgba8,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// 只读像素视图。
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 取出像素缓冲，消耗自身。
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// 转为 `DynamicImage`，保留像素格式。空图返回 `None`。
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        if self.is_empty() {
            return None;
        }

        let (w, h, data) = (self.width, self.height, self.data.clone());
        match self.format {
            PixelFormat::Rgba8 => image::RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
            PixelFormat::Rgb8 => image::RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
            PixelFormat::Luma8 => image::GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        }
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<RgbaImage> for Image {
    fn from(rgba: RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            data: rgba.into_raw(),
        }
    }
}

impl From<DynamicImage> for Image {
    /// 8 bit 的 RGBA/RGB/Luma 原样保留，其余格式统一转为 RGBA8。
    fn from(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageRgb8(rgb) => Self {
                width,
                height,
                format: PixelFormat::Rgb8,
                data: rgb.into_raw(),
            },
            DynamicImage::ImageLuma8(luma) => Self {
                width,
                height,
                format: PixelFormat::Luma8,
                data: luma.into_raw(),
            },
            DynamicImage::ImageRgba8(rgba) => rgba.into(),
            other => other.to_rgba8().into(),
        }
    }
}

fn expected_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, ImageError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
        .ok_or_else(|| ImageError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))
}
