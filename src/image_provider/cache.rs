//! # 单槽缓存
//!
//! ## 设计思路
//!
//! 只缓存最近一次请求的 (id, 图片)。换一个 id 就整体覆盖，不做合并。
//! 内存上限固定为一张图，代价是多 id 交替请求时会互相挤掉。
//!
//! ## 实现思路
//!
//! - 槽位由一把 `Mutex` 保护，只在拷贝期间持锁
//! - 生成图片（capture）在锁外进行，不会阻塞其他请求的读写
//! - 锁中毒时直接取回内部数据：槽位的赋值是整体替换，不存在写了一半的状态

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Image;

struct CacheEntry {
    id: String,
    image: Image,
}

/// 只保存一个 (id, 图片) 的线程安全缓存。
#[derive(Default)]
pub struct SingleSlotCache {
    slot: Mutex<Option<CacheEntry>>,
}

impl SingleSlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命中时返回图片副本：id 相同且图片非空。
    ///
    /// 空图永远不算命中，失败的生成结果不会被当作缓存返回。
    pub fn get(&self, id: &str) -> Option<Image> {
        let slot = self.lock();
        slot.as_ref()
            .filter(|entry| entry.id == id && !entry.image.is_empty())
            .map(|entry| entry.image.clone())
    }

    /// 无条件替换槽位内容。
    pub fn set(&self, id: &str, image: Image) {
        let entry = CacheEntry {
            id: id.to_string(),
            image,
        };
        *self.lock() = Some(entry);
    }

    /// 清空槽位。
    pub fn clear(&self) {
        self.lock().take();
    }

    /// 当前槽位中的 id（无论图片是否为空）。
    pub fn current_id(&self) -> Option<String> {
        self.lock().as_ref().map(|entry| entry.id.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn filled(width: u32, height: u32, value: u8) -> Image {
        Image::from_rgba(width, height, vec![value; (width * height * 4) as usize])
            .expect("valid test image")
    }

    #[test]
    fn set_then_get_roundtrip() {
        let cache = SingleSlotCache::new();
        let img = filled(4, 3, 7);

        cache.set("preview", img.clone());

        assert_eq!(cache.get("preview"), Some(img));
        assert_eq!(cache.current_id().as_deref(), Some("preview"));
    }

    #[test]
    fn different_id_invalidates_previous_entry() {
        let cache = SingleSlotCache::new();
        cache.set("a", filled(2, 2, 1));
        cache.set("b", filled(2, 2, 2));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn empty_image_is_never_a_hit() {
        let cache = SingleSlotCache::new();
        cache.set("broken", Image::empty());

        assert!(cache.get("broken").is_none());
        assert_eq!(cache.current_id().as_deref(), Some("broken"));
    }

    #[test]
    fn clear_drops_entry() {
        let cache = SingleSlotCache::new();
        cache.set("a", filled(1, 1, 1));
        cache.clear();

        assert!(cache.get("a").is_none());
        assert!(cache.current_id().is_none());
    }

    #[test]
    fn returned_copy_does_not_alias_slot() {
        let cache = SingleSlotCache::new();
        cache.set("a", filled(1, 1, 5));

        let mut bytes = cache.get("a").expect("hit").into_bytes();
        bytes.fill(0);

        assert_eq!(cache.get("a").expect("hit").as_bytes(), &[5, 5, 5, 5]);
    }

    #[test]
    fn concurrent_get_and_set_never_tear() {
        let cache = Arc::new(SingleSlotCache::new());
        let workers = 8;
        let iterations = 300;

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                let id = format!("worker-{}", worker_id);
                let value = worker_id as u8 + 1;
                for _ in 0..iterations {
                    cache.set(&id, filled(16, 16, value));
                    if let Some(img) = cache.get(&id) {
                        assert_eq!(img.dimensions(), (16, 16));
                        assert!(img.as_bytes().iter().all(|b| *b == value));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
    }
}
