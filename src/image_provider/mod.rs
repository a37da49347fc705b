//! # 图像提供模块（image_provider）
//!
//! ## 设计思路
//!
//! 宿主界面按“不透明 id + 可选目标尺寸”拉取图片，这里负责把请求变成一张可直接显示的位图。
//! 按职责拆分为多个子模块：
//!
//! - `host`：宿主拉取接口的参数适配（薄封装）
//! - `handler`：`ImageProvider`，编排整条请求链路
//! - `cache`：单槽缓存，只保存最近一次请求的图片
//! - `scaler`：四种目标框形态的确定性缩放
//! - `source`：`CaptureSource` 抽象与内置来源
//! - `bitmap/bounds/config/error`：数据模型、配置、错误
//!
//! ## 调用链
//!
//! ```text
//! 宿主 requestImage
//!    ↓
//! host.rs（参数适配）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ cache.rs（get 命中则直接使用）
//!    ├─ source.rs（未命中：锁外生成，随后 set 写回）
//!    └─ scaler.rs（按目标框缩放）
//!    ↓
//! 返回位图 + 原始尺寸
//! ```

mod bitmap;
mod bounds;
mod cache;
mod config;
mod error;
mod handler;
pub mod host;
mod scaler;
mod source;

pub use bitmap::{Image, PixelFormat};
pub use bounds::{BoundingBox, BoxConstraint, Size};
pub use cache::SingleSlotCache;
pub use config::{DEFAULT_MAX_OUTPUT_PIXELS, ImagePerformanceProfile, ProviderConfig};
pub use error::ImageError;
pub use handler::{ImageProvider, ProvidedImage, ProviderStats};
pub use scaler::{Scaler, scale, target_size};
pub use source::{
    CaptureSource, CaptureStore, DEFAULT_MAX_FILE_SIZE, FileCaptureSource, FnCaptureSource,
    SCROLL_ID_PREFIX,
};
