//! # 配置模块
//!
//! ## 设计思路
//!
//! 将缩放相关的“可调策略”集中到 `ProviderConfig`。
//! 性能档位（quality / balanced / speed）作为高层语义，映射到具体的重采样滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 即 balanced 档位。
//! - 只允许平滑滤镜：`Nearest` 在 `validate` 阶段被拒绝。
//! - `infer_performance_profile` 从当前滤镜反推档位（给宿主展示状态）。

use image::imageops::FilterType;

use super::ImageError;

/// 缩放输出像素上限的默认值（约 8K x 8K）。
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// 图像提供器配置。
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// 重采样滤镜。
    pub resize_filter: FilterType,
    /// 是否优先使用 `fast_image_resize`（失败时回退 `image::imageops`）。
    pub fast_resize: bool,
    /// 放大结果允许的最大像素数，超出时直接返回原图副本；缩小不受此限制。
    pub max_output_pixels: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            resize_filter: FilterType::CatmullRom,
            fast_resize: true,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }
}

/// 性能档位。
///
/// - `Quality`：Lanczos3
/// - `Balanced`：CatmullRom
/// - `Speed`：双线性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl ImagePerformanceProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use capture_provider::image_provider::ImagePerformanceProfile;
    ///
    /// let p = ImagePerformanceProfile::parse("Balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), capture_provider::image_provider::ImageError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::Config(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }
}

impl ProviderConfig {
    /// 校验配置是否可用。
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.resize_filter == FilterType::Nearest {
            return Err(ImageError::Config(
                "不支持最近邻滤镜，缩放必须是平滑重采样".to_string(),
            ));
        }
        if self.max_output_pixels == 0 {
            return Err(ImageError::Config("max_output_pixels 不能为 0".to_string()));
        }
        Ok(())
    }

    /// 基于当前滤镜反推性能档位。
    pub fn infer_performance_profile(&self) -> ImagePerformanceProfile {
        match self.resize_filter {
            FilterType::Lanczos3 => ImagePerformanceProfile::Quality,
            FilterType::Triangle | FilterType::Nearest => ImagePerformanceProfile::Speed,
            FilterType::CatmullRom | FilterType::Gaussian => ImagePerformanceProfile::Balanced,
        }
    }

    /// 应用指定档位。
    pub fn apply_performance_profile(&mut self, profile: ImagePerformanceProfile) {
        self.resize_filter = profile.filter();
    }

    pub fn with_profile(profile: ImagePerformanceProfile) -> Self {
        let mut config = Self::default();
        config.apply_performance_profile(profile);
        config
    }
}
