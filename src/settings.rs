//! 提供器设置持久化
//!
//! 设置以 JSON 保存，字段面向宿主语义（档位字符串而不是滤镜枚举）。
//! 读写失败统一转为 `AppError::Settings`，文件不存在视为“尚未保存”。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::image_provider::{
    CaptureSource, DEFAULT_MAX_OUTPUT_PIXELS, ImagePerformanceProfile, ImageProvider,
    ProviderConfig,
};
use crate::locale::SYSTEM_LOCALE;

/// 可持久化的提供器设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub profile: String,
    pub fast_resize: bool,
    pub max_output_pixels: u64,
    pub language: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            profile: ImagePerformanceProfile::Balanced.as_str().to_string(),
            fast_resize: true,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
            language: SYSTEM_LOCALE.to_string(),
        }
    }
}

impl ProviderSettings {
    /// 转换为运行时配置（会校验档位与上限）。
    pub fn to_config(&self) -> Result<ProviderConfig, AppError> {
        let profile = ImagePerformanceProfile::parse(&self.profile)?;
        let mut config = ProviderConfig::with_profile(profile);
        config.fast_resize = self.fast_resize;
        config.max_output_pixels = self.max_output_pixels;
        config.validate()?;
        Ok(config)
    }

    /// 从提供器当前配置生成设置。`language` 由调用方另行维护。
    pub fn from_provider<S: CaptureSource>(provider: &ImageProvider<S>, language: &str) -> Self {
        let config = provider.config_snapshot();
        Self {
            profile: config.infer_performance_profile().as_str().to_string(),
            fast_resize: config.fast_resize,
            max_output_pixels: config.max_output_pixels,
            language: language.to_string(),
        }
    }
}

/// 读取设置文件，不存在时返回 `Ok(None)`。
pub fn load_settings(path: &Path) -> Result<Option<ProviderSettings>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let parsed = serde_json::from_str::<ProviderSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

    Ok(Some(parsed))
}

/// 写入设置文件，必要时创建父目录。
pub fn save_settings(path: &Path, settings: &ProviderSettings) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;
        }
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

/// 将设置应用到提供器。
pub fn apply_settings<S: CaptureSource>(
    provider: &ImageProvider<S>,
    settings: &ProviderSettings,
) -> Result<(), AppError> {
    let config = settings.to_config()?;
    provider.set_config(config)?;
    log::info!(
        "⚙️ 已应用提供器设置：profile={} fast_resize={} max_output_pixels={}",
        settings.profile,
        settings.fast_resize,
        settings.max_output_pixels
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_provider::{CaptureStore, ImageError};

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("provider.json");

        let settings = ProviderSettings {
            profile: "quality".to_string(),
            fast_resize: false,
            max_output_pixels: 1_000_000,
            language: "zh_CN".to_string(),
        };

        save_settings(&path, &settings).expect("save settings");
        let loaded = load_settings(&path).expect("load settings");
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn missing_file_is_none_and_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("provider.json");
        assert_eq!(load_settings(&path).expect("load"), None);

        std::fs::write(&path, r#"{ "profile": "speed" }"#).expect("write");
        let loaded = load_settings(&path).expect("load").expect("present");
        assert_eq!(loaded.profile, "speed");
        assert!(loaded.fast_resize);
        assert_eq!(loaded.language, SYSTEM_LOCALE);
    }

    #[test]
    fn malformed_file_is_settings_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("provider.json");
        std::fs::write(&path, "{").expect("write");

        assert!(matches!(load_settings(&path), Err(AppError::Settings(_))));
    }

    #[test]
    fn apply_settings_updates_provider() {
        let provider = ImageProvider::new(CaptureStore::new());
        let settings = ProviderSettings {
            profile: "speed".to_string(),
            ..ProviderSettings::default()
        };

        apply_settings(&provider, &settings).expect("apply");
        assert_eq!(provider.get_performance_profile(), ImagePerformanceProfile::Speed);
        assert_eq!(ProviderSettings::from_provider(&provider, SYSTEM_LOCALE), settings);
    }

    #[test]
    fn apply_settings_rejects_bad_values() {
        let provider = ImageProvider::new(CaptureStore::new());

        let bad_profile = ProviderSettings {
            profile: "ultra".to_string(),
            ..ProviderSettings::default()
        };
        assert!(matches!(
            apply_settings(&provider, &bad_profile),
            Err(AppError::Image(ImageError::Config(_)))
        ));

        let zero_limit = ProviderSettings {
            max_output_pixels: 0,
            ..ProviderSettings::default()
        };
        assert!(apply_settings(&provider, &zero_limit).is_err());
    }
}
