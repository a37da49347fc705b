//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageProvider` 负责一次请求的完整链路，不直接与任何 UI 框架绑定：
//! 1. 查单槽缓存
//! 2. 未命中时在锁外调用 `CaptureSource::capture`，结果（包括空图）写回缓存
//! 3. 记录缩放前的原始尺寸
//! 4. 按目标框缩放并返回
//!
//! ## 实现思路
//!
//! - 配置通过 `RwLock<ProviderConfig>` 支持运行时切档，单次请求使用同一份快照。
//! - 空图写回缓存后 `get` 不会命中，失败的生成会在下次请求时重试。
//! - 命中/未命中/失败次数用原子计数，方便宿主做诊断。
//! - 记录 `capture/scale/total` 阶段耗时。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use super::{
    BoundingBox, CaptureSource, Image, ImageError, ImagePerformanceProfile, ProviderConfig,
    Scaler, SingleSlotCache, Size,
};

/// 一次请求的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedImage {
    /// 缩放后的位图。
    pub image: Image,
    /// 缩放前的原始尺寸。
    pub natural_size: Size,
    /// 本次是否命中缓存。
    pub cache_hit: bool,
}

/// 请求计数快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderStats {
    pub hits: u64,
    pub misses: u64,
    pub failed_captures: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    failed_captures: AtomicU64,
}

/// 图像提供器。
///
/// 由宿主创建并独占持有，随宿主引擎一起销毁；内部缓存随之释放。
pub struct ImageProvider<S> {
    source: S,
    cache: SingleSlotCache,
    config: RwLock<ProviderConfig>,
    counters: Counters,
}

impl<S: CaptureSource> ImageProvider<S> {
    /// 使用默认配置创建提供器。
    ///
    /// # 示例
    /// ```rust
    /// use capture_provider::image_provider::{BoundingBox, CaptureStore, ImageProvider};
    ///
    /// let provider = ImageProvider::new(CaptureStore::new());
    /// let provided = provider.request_image("preview", BoundingBox::unbounded());
    /// assert!(provided.image.is_empty());
    /// ```
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: SingleSlotCache::new(),
            config: RwLock::new(ProviderConfig::default()),
            counters: Counters::default(),
        }
    }

    /// 使用自定义配置创建提供器。
    pub fn with_config(source: S, config: ProviderConfig) -> Result<Self, ImageError> {
        config.validate()?;
        let provider = Self::new(source);
        *provider.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(provider)
    }

    /// 处理主入口：查缓存 → 生成 → 写回 → 缩放。
    pub fn request_image(&self, id: &str, requested: BoundingBox) -> ProvidedImage {
        let scaler = Scaler::new(self.config_snapshot()).unwrap_or_else(|err| {
            log::warn!("⚠️ 配置无效，改用默认缩放配置：{}", err);
            Scaler::default()
        });
        let total_start = Instant::now();

        let (source, cache_hit) = match self.cache.get(id) {
            Some(cached) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("♻️ 缓存命中 - id: {}", id);
                (cached, true)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                let capture_start = Instant::now();
                let captured = self.source.capture(id);
                let capture_elapsed = capture_start.elapsed();

                if captured.is_empty() {
                    self.counters.failed_captures.fetch_add(1, Ordering::Relaxed);
                    log::info!("图片生成失败，返回空图 - id: {}", id);
                } else {
                    log::info!(
                        "📸 生成图片 - id: {} 尺寸: {}x{} capture={}ms",
                        id,
                        captured.width(),
                        captured.height(),
                        capture_elapsed.as_millis()
                    );
                }

                self.cache.set(id, captured.clone());
                (captured, false)
            }
        };

        let natural_size = Size::from(source.dimensions());

        let scale_start = Instant::now();
        let image = scaler.scale(&source, requested);
        log::debug!(
            "✅ 请求完成 - id: {} natural={}x{} output={}x{} scale={}ms total={}ms",
            id,
            natural_size.width,
            natural_size.height,
            image.width(),
            image.height(),
            scale_start.elapsed().as_millis(),
            total_start.elapsed().as_millis()
        );

        ProvidedImage {
            image,
            natural_size,
            cache_hit,
        }
    }

    /// 丢弃缓存内容，下一次请求必定重新生成。
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// 当前缓存中的 id。
    pub fn cached_id(&self) -> Option<String> {
        self.cache.current_id()
    }

    pub fn stats(&self) -> ProviderStats {
        ProviderStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failed_captures: self.counters.failed_captures.load(Ordering::Relaxed),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 获取配置快照。
    pub fn config_snapshot(&self) -> ProviderConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 整体替换配置。
    pub fn set_config(&self, config: ProviderConfig) -> Result<(), ImageError> {
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    /// 设置性能档位。
    pub fn set_performance_profile(&self, profile: ImagePerformanceProfile) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换图片性能档位：{:?}（filter={:?}, fast_resize={}）",
            profile,
            config.resize_filter,
            config.fast_resize
        );
    }

    /// 获取当前生效档位。
    pub fn get_performance_profile(&self) -> ImagePerformanceProfile {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .infer_performance_profile()
    }
}
