//! 界面语言热切换模块
//!
//! # 设计思路
//!
//! 与图像链路完全独立，只负责两件事：
//! - `install_translator`：替换进程内唯一的翻译资源，安装前先拆掉旧的
//! - `retranslate_all`：通知所有仍存活的界面引擎刷新文本
//!
//! # 实现思路
//!
//! - 翻译目录的加载抽象为 `TranslationLoader`，默认实现读取 `<dir>/<locale>.json`。
//! - 语言名为空或 `System` 时，从 `LC_ALL` / `LC_MESSAGES` / `LANG` 推断系统语言。
//! - 完整语言名（`zh_CN`）找不到时回退到语言部分（`zh`）。
//! - 引擎以 `Weak` 持有，不延长宿主对象的生命周期；刷新时顺带清理已销毁的引擎。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

/// 跟随系统语言的特殊名称。
pub const SYSTEM_LOCALE: &str = "System";

const FALLBACK_LOCALE: &str = "en_US";

/// 语言资源错误。
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("未找到语言资源：{0}")]
    NotFound(String),

    #[error("语言资源解析失败：{0}")]
    Parse(String),

    #[error("语言资源读取失败：{0}")]
    Io(#[from] std::io::Error),
}

/// 已加载的翻译表：context → (原文 → 译文)。
#[derive(Debug, Clone, Default)]
pub struct Translator {
    locale: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    pub fn new(locale: impl Into<String>, messages: HashMap<String, HashMap<String, String>>) -> Self {
        Self {
            locale: locale.into(),
            messages,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn translate(&self, context: &str, source: &str) -> Option<&str> {
        self.messages
            .get(context)
            .and_then(|entries| entries.get(source))
            .map(String::as_str)
    }
}

/// 翻译资源加载器。
pub trait TranslationLoader: Send + Sync {
    fn load(&self, locale: &str) -> Result<Translator, LocaleError>;
}

/// 从目录中读取 `<locale>.json`。
///
/// 文件格式：`{ "context": { "source": "translation" } }`。
#[derive(Debug, Clone)]
pub struct JsonTranslationLoader {
    dir: PathBuf,
}

impl JsonTranslationLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_catalog(path: &Path) -> Result<HashMap<String, HashMap<String, String>>, LocaleError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LocaleError::Parse(format!("{}: {}", path.display(), e)))
    }
}

impl TranslationLoader for JsonTranslationLoader {
    fn load(&self, locale: &str) -> Result<Translator, LocaleError> {
        for candidate in locale_candidates(locale) {
            let path = self.dir.join(format!("{}.json", candidate));
            if path.is_file() {
                log::debug!("加载语言资源：{}", path.display());
                let messages = Self::read_catalog(&path)?;
                return Ok(Translator::new(candidate, messages));
            }
        }
        Err(LocaleError::NotFound(locale.to_string()))
    }
}

/// 可刷新界面文本的引擎。
pub trait Retranslate: Send + Sync {
    fn retranslate(&self);
}

/// 进程内翻译资源与界面引擎的管理者。
pub struct LocaleManager {
    loader: Box<dyn TranslationLoader>,
    installed: RwLock<Option<Arc<Translator>>>,
    engines: Mutex<Vec<Weak<dyn Retranslate>>>,
}

impl LocaleManager {
    pub fn new(loader: impl TranslationLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            installed: RwLock::new(None),
            engines: Mutex::new(Vec::new()),
        }
    }

    /// 安装指定语言的翻译资源，成功返回 `true`。
    ///
    /// 无论成功与否，之前安装的资源都会先被移除。
    /// 加载在锁外进行，加载期间 `translate` 仍使用旧资源。
    pub fn install_translator(&self, locale_name: &str) -> bool {
        let locale = resolve_locale(locale_name);
        let loaded = self.loader.load(&locale);

        let mut installed = self.installed.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = installed.take() {
            log::debug!("移除旧语言资源：{}", previous.locale());
        }

        match loaded {
            Ok(translator) => {
                log::info!("🌐 已安装语言资源：{}（请求：{}）", translator.locale(), locale_name);
                *installed = Some(Arc::new(translator));
                true
            }
            Err(err) => {
                log::warn!("语言资源安装失败：{}", err);
                false
            }
        }
    }

    /// 当前生效的语言。
    pub fn current_locale(&self) -> Option<String> {
        self.installed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.locale().to_string())
    }

    /// 翻译文本，未命中时原样返回。
    pub fn translate(&self, context: &str, source: &str) -> String {
        let installed = self.installed.read().unwrap_or_else(PoisonError::into_inner);
        installed
            .as_ref()
            .and_then(|t| t.translate(context, source))
            .unwrap_or(source)
            .to_string()
    }

    /// 登记界面引擎（弱引用）。
    pub fn register_engine(&self, engine: &Arc<dyn Retranslate>) {
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(engine));
    }

    /// 通知所有存活引擎刷新文本，返回通知数量。同一引擎只通知一次。
    pub fn retranslate_all(&self) -> usize {
        let live: Vec<Arc<dyn Retranslate>> = {
            let mut engines = self.engines.lock().unwrap_or_else(PoisonError::into_inner);
            engines.retain(|weak| weak.strong_count() > 0);

            let mut live: Vec<Arc<dyn Retranslate>> = Vec::with_capacity(engines.len());
            for engine in engines.iter().filter_map(Weak::upgrade) {
                let ptr = Arc::as_ptr(&engine) as *const ();
                if !live.iter().any(|seen| Arc::as_ptr(seen) as *const () == ptr) {
                    live.push(engine);
                }
            }
            live
        };

        for engine in &live {
            engine.retranslate();
        }

        log::info!("🔄 已通知 {} 个界面引擎刷新文本", live.len());
        live.len()
    }
}

/// 解析语言名，空串或 `System` 取系统语言。
pub fn resolve_locale(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() || name == SYSTEM_LOCALE {
        system_locale()
    } else {
        normalize_locale(name)
    }
}

fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| normalize_locale(&value))
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

/// `zh-CN.UTF-8@latin` → `zh_CN`
fn normalize_locale(raw: &str) -> String {
    let without_modifier = raw.split('@').next().unwrap_or_default();
    let without_encoding = without_modifier.split('.').next().unwrap_or_default();
    without_encoding.trim().replace('-', "_")
}

fn locale_candidates(locale: &str) -> Vec<String> {
    let normalized = normalize_locale(locale);
    let mut candidates = vec![normalized.clone()];
    if let Some((language, _)) = normalized.split_once('_') {
        if !language.is_empty() {
            candidates.push(language.to_string());
        }
    }
    candidates
}
