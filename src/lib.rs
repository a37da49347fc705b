//! # 截图图像提供器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              宿主 UI（截图预览 / 滚动截图窗口）            │
//! │                                                          │
//! │     requestImage(id, &mut size, requestedSize)           │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ 同步拉取，可多线程并发
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            本 crate                               │
//! │                                                          │
//! │  ┌─ image_provider                                       │
//! │  │   ├─ host       宿主接口参数适配                       │
//! │  │   ├─ handler    ImageProvider 请求编排                 │
//! │  │   ├─ cache      单槽缓存 (Mutex)                       │
//! │  │   ├─ scaler     四种目标框的确定性缩放                 │
//! │  │   └─ source     CaptureSource + 内置来源               │
//! │  │                                                       │
//! │  ├─ locale ─────── 翻译资源安装 / 引擎刷新                │
//! │  ├─ settings ───── 提供器设置 JSON 持久化                 │
//! │  └─ error ──────── AppError (统一错误类型)                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`image_provider`] | 按 id 生成/缓存/缩放图片，对宿主返回位图 |
//! | [`locale`] | 进程级翻译资源替换与界面引擎刷新 |
//! | [`settings`] | 提供器设置的读取、保存与应用 |

pub mod error;
pub mod image_provider;
pub mod locale;
pub mod settings;
