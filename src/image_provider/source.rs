//! # 图片来源
//!
//! ## 设计思路
//!
//! 提供器本身不关心图片怎么生成，只依赖 `CaptureSource::capture(id)`。
//! 约定：尽力生成一张位图，失败时返回空图，不抛错。
//!
//! 内置三种来源：
//! - `FnCaptureSource`：包装闭包，便于宿主或测试注入
//! - `CaptureStore`：保存最近一次整屏截图与滚动截图，按 id 前缀路由
//! - `FileCaptureSource`：按 `file://` 路径或普通路径从磁盘加载

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Image, ImageError};

/// 本地文件允许的最大体积（默认 50MB）。
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 滚动截图 id 前缀。
pub const SCROLL_ID_PREFIX: &str = "scroll";

/// 由宿主提供的图片生成器。
pub trait CaptureSource: Send + Sync {
    /// 为 `id` 生成一张位图；失败时返回 `Image::empty()`。
    fn capture(&self, id: &str) -> Image;
}

impl<S: CaptureSource + ?Sized> CaptureSource for Arc<S> {
    fn capture(&self, id: &str) -> Image {
        (**self).capture(id)
    }
}

impl<S: CaptureSource + ?Sized> CaptureSource for Box<S> {
    fn capture(&self, id: &str) -> Image {
        (**self).capture(id)
    }
}

/// 闭包来源。
///
/// # 示例
/// ```rust
/// use capture_provider::image_provider::{CaptureSource, FnCaptureSource, Image};
///
/// let source = FnCaptureSource(|_id: &str| Image::empty());
/// assert!(source.capture("anything").is_empty());
/// ```
pub struct FnCaptureSource<F>(pub F);

impl<F> CaptureSource for FnCaptureSource<F>
where
    F: Fn(&str) -> Image + Send + Sync,
{
    fn capture(&self, id: &str) -> Image {
        (self.0)(id)
    }
}

// ============================================================================
// CaptureStore — 最近截图存放处
// ============================================================================

/// 保存最近一次整屏截图与滚动截图。
///
/// 以 `scroll` 开头的 id 读取滚动截图，其余 id 读取最近整屏截图。
/// 截图流程在完成后调用 `update_*` 写入；提供器只读。
#[derive(Default)]
pub struct CaptureStore {
    last: Mutex<Option<Image>>,
    scroll: Mutex<Option<Image>>,
}

impl CaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_last_capture(&self, image: Image) {
        log::debug!("📸 更新最近截图 - 尺寸: {}x{}", image.width(), image.height());
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(image);
    }

    pub fn update_scroll_capture(&self, image: Image) {
        log::debug!("📜 更新滚动截图 - 尺寸: {}x{}", image.width(), image.height());
        *self.scroll.lock().unwrap_or_else(PoisonError::into_inner) = Some(image);
    }

    pub fn clear(&self) {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).take();
        self.scroll.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

impl CaptureSource for CaptureStore {
    fn capture(&self, id: &str) -> Image {
        let (slot, kind) = if id.starts_with(SCROLL_ID_PREFIX) {
            (&self.scroll, "滚动截图")
        } else {
            (&self.last, "最近截图")
        };

        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(image) => image.clone(),
            None => {
                log::info!("{}为空，返回空图 - id: {}", kind, id);
                Image::empty()
            }
        }
    }
}

// ============================================================================
// FileCaptureSource — 磁盘图片
// ============================================================================

/// 从本地文件加载图片，id 为 `file://<path>` 或普通路径。
#[derive(Debug, Clone)]
pub struct FileCaptureSource {
    max_file_size: u64,
}

impl Default for FileCaptureSource {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileCaptureSource {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// 读取并解码，错误以 `ImageError` 返回。
    pub fn load(&self, id: &str) -> Result<Image, ImageError> {
        let path = id.strip_prefix("file://").unwrap_or(id);
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(ImageError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let image = Image::from(decoded);
        log::info!("✅ 本地图片读取成功 - 尺寸: {}x{}", image.width(), image.height());
        Ok(image)
    }
}

impl CaptureSource for FileCaptureSource {
    fn capture(&self, id: &str) -> Image {
        match self.load(id) {
            Ok(image) => image,
            Err(err) => {
                log::error!("加载图片失败 [{}]：{}", err.code(), err);
                Image::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn filled(value: u8) -> Image {
        Image::from_rgba(2, 2, vec![value; 16]).expect("valid test image")
    }

    #[test]
    fn store_routes_scroll_ids_to_scroll_slot() {
        let store = CaptureStore::new();
        store.update_last_capture(filled(1));
        store.update_scroll_capture(filled(2));

        assert_eq!(store.capture("scroll-42").as_bytes()[0], 2);
        assert_eq!(store.capture("preview?1").as_bytes()[0], 1);
    }

    #[test]
    fn store_returns_empty_when_nothing_captured() {
        let store = CaptureStore::new();
        assert!(store.capture("preview").is_empty());
        assert!(store.capture("scroll").is_empty());

        store.update_last_capture(filled(3));
        store.clear();
        assert!(store.capture("preview").is_empty());
    }

    #[test]
    fn shared_store_is_a_source() {
        let store = Arc::new(CaptureStore::new());
        let source: Box<dyn CaptureSource> = Box::new(Arc::clone(&store));

        store.update_last_capture(filled(9));
        assert_eq!(source.capture("x").as_bytes()[0], 9);
    }

    #[test]
    fn file_source_loads_png_with_file_scheme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shot.png");
        RgbaImage::from_pixel(6, 4, Rgba([1, 2, 3, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");

        let source = FileCaptureSource::default();
        let id = format!("file://{}", path.display());
        let image = source.capture(&id);

        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(&image.as_bytes()[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn file_source_failures_yield_empty_image() {
        let source = FileCaptureSource::default();
        assert!(source.capture("/definitely/not/here.png").is_empty());
        assert!(matches!(
            source.load("/definitely/not/here.png"),
            Err(ImageError::FileSystem(_))
        ));
    }

    #[test]
    fn file_source_enforces_size_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.png");
        RgbaImage::new(64, 64)
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");

        let source = FileCaptureSource::new(8);
        let result = source.load(path.to_str().expect("utf-8 path"));
        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }
}
