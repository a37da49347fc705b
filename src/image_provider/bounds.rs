//! # 尺寸与目标框
//!
//! 宿主传来的请求尺寸是两个整数，`<= 0` 表示“该维度不限制”。
//! 这里把它收敛为每个维度各自带“未设置”状态的 `BoundingBox`，
//! 让缩放的四个分支可以穷尽匹配，而不是到处判断哨兵值。

use std::num::NonZeroU32;

/// 图片像素尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// 调用方请求的目标框。两个维度都未设置时表示“不缩放”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    pub width: Option<NonZeroU32>,
    pub height: Option<NonZeroU32>,
}

/// 目标框的四种形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxConstraint {
    /// 等比缩放到完全落入框内。
    Fit { width: u32, height: u32 },
    /// 精确宽度，高度按比例。
    Width(u32),
    /// 精确高度，宽度按比例。
    Height(u32),
    /// 原图输出。
    Unconstrained,
}

impl BoundingBox {
    /// 不缩放。
    pub const fn unbounded() -> Self {
        Self {
            width: None,
            height: None,
        }
    }

    pub fn new(width: Option<NonZeroU32>, height: Option<NonZeroU32>) -> Self {
        Self { width, height }
    }

    pub fn fit(width: u32, height: u32) -> Self {
        Self {
            width: NonZeroU32::new(width),
            height: NonZeroU32::new(height),
        }
    }

    pub fn width_only(width: u32) -> Self {
        Self {
            width: NonZeroU32::new(width),
            height: None,
        }
    }

    pub fn height_only(height: u32) -> Self {
        Self {
            width: None,
            height: NonZeroU32::new(height),
        }
    }

    /// 从宿主整数尺寸转换，非正数视为未设置。
    ///
    /// # 示例
    /// ```rust
    /// use capture_provider::image_provider::BoundingBox;
    ///
    /// let requested = BoundingBox::from_requested(400, -1);
    /// assert_eq!(requested.width.map(|w| w.get()), Some(400));
    /// assert!(requested.height.is_none());
    /// ```
    pub fn from_requested(width: i32, height: i32) -> Self {
        let positive = |v: i32| u32::try_from(v).ok().and_then(NonZeroU32::new);
        Self {
            width: positive(width),
            height: positive(height),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    pub fn constraint(&self) -> BoxConstraint {
        match (self.width, self.height) {
            (Some(w), Some(h)) => BoxConstraint::Fit {
                width: w.get(),
                height: h.get(),
            },
            (Some(w), None) => BoxConstraint::Width(w.get()),
            (None, Some(h)) => BoxConstraint::Height(h.get()),
            (None, None) => BoxConstraint::Unconstrained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_requested_values_are_unset() {
        let requested = BoundingBox::from_requested(-1, 0);
        assert!(requested.is_unbounded());
        assert_eq!(requested.constraint(), BoxConstraint::Unconstrained);
    }

    #[test]
    fn constraint_covers_all_shapes() {
        assert_eq!(
            BoundingBox::fit(400, 300).constraint(),
            BoxConstraint::Fit {
                width: 400,
                height: 300
            }
        );
        assert_eq!(BoundingBox::from_requested(400, 0).constraint(), BoxConstraint::Width(400));
        assert_eq!(BoundingBox::height_only(120).constraint(), BoxConstraint::Height(120));
        assert_eq!(BoundingBox::fit(0, 0), BoundingBox::unbounded());
    }

    #[test]
    fn size_emptiness() {
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::from((1, 1)).is_empty());
    }
}
