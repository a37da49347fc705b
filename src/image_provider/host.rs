//! # 宿主适配层
//!
//! 宿主 UI 框架的拉取接口形如 `requestImage(id, *size, requestedSize)`：
//! 原始尺寸通过可选的输出参数回传，请求尺寸中 `<= 0` 表示不限制。
//! 这里只做参数形态转换，所有逻辑交给 `ImageProvider`。

use super::{BoundingBox, CaptureSource, Image, ImageProvider, Size};

/// 宿主拉取入口。
///
/// # 示例
/// ```rust
/// use capture_provider::image_provider::{host, CaptureStore, Image, ImageProvider, Size};
///
/// let store = CaptureStore::new();
/// store.update_last_capture(Image::from_rgba(8, 4, vec![0; 128])?);
/// let provider = ImageProvider::new(store);
///
/// let mut natural = Size::default();
/// let image = host::request_image(&provider, "preview", Some(&mut natural), 4, -1);
/// assert_eq!(natural, Size::new(8, 4));
/// assert_eq!(image.dimensions(), (4, 2));
/// # Ok::<(), capture_provider::image_provider::ImageError>(())
/// ```
pub fn request_image<S: CaptureSource>(
    provider: &ImageProvider<S>,
    id: &str,
    size: Option<&mut Size>,
    requested_width: i32,
    requested_height: i32,
) -> Image {
    let requested = BoundingBox::from_requested(requested_width, requested_height);
    let provided = provider.request_image(id, requested);

    if let Some(size) = size {
        *size = provided.natural_size;
    }

    provided.image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_provider::FnCaptureSource;

    #[test]
    fn writes_natural_size_and_scales() {
        let provider = ImageProvider::new(FnCaptureSource(|_id: &str| {
            Image::from_rgba(1920, 1080, vec![0; 1920 * 1080 * 4]).unwrap_or_default()
        }));

        let mut natural = Size::default();
        let image = request_image(&provider, "shot", Some(&mut natural), 400, 400);

        assert_eq!(natural, Size::new(1920, 1080));
        assert_eq!(image.dimensions(), (400, 225));
    }

    #[test]
    fn size_output_is_optional() {
        let provider = ImageProvider::new(FnCaptureSource(|_id: &str| Image::empty()));
        let image = request_image(&provider, "missing", None, 0, 0);
        assert!(image.is_empty());
    }
}
