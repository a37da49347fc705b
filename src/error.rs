//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 图像请求链路本身不返回错误（失败即空图），但其外围——设置读写、
//! 语言资源、文件来源、配置校验——仍需要一个统一的出口。
//! `AppError` 汇总这些来源，宿主只需处理一种错误类型。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` / `LocaleError` / `std::io::Error` 提供 `From` 转换，`?` 直接上转。
//! - 实现 `Serialize` 将错误序列化为字符串，便于经宿主 IPC 透传。

use serde::Serialize;

use crate::image_provider::ImageError;
use crate::locale::LocaleError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图像构造、加载或配置错误
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 语言资源错误
    #[error("{0}")]
    Locale(#[from] LocaleError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置读写失败
    #[error("设置错误: {0}")]
    Settings(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = AppError::from(ImageError::Config("bad".to_string()));
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, "\"配置错误：bad\"");
    }
}
