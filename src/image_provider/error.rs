//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 请求链路本身是“全函数”：失败用空图表示，不向宿主抛错。
//! 但图像构造、文件加载、配置校验这些外围环节仍然需要可匹配的错误类型，
//! 统一收敛到 `ImageError`，由 `thiserror` 生成可读消息。

/// 图像提供链路统一错误类型。
///
/// 在 crate 层会被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("配置错误：{0}")]
    Config(String),

    #[error("缩放错误：{0}")]
    Resize(String),
}

impl ImageError {
    /// 稳定错误码，供宿主侧做分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Config(_) => "E_CONFIG",
            Self::Resize(_) => "E_RESIZE",
        }
    }

    /// 出错阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) | Self::FileSystem(_) => "capture",
            Self::InvalidFormat(_) | Self::ResourceLimit(_) => "construct",
            Self::Config(_) => "config",
            Self::Resize(_) => "scale",
        }
    }
}
