//! # 截图图像提供器 — 命令行入口
//!
//! 用本地图片模拟宿主请求：按给定目标尺寸拉取若干次并输出结果，
//! 便于观察缓存命中与缩放效果。

use std::path::PathBuf;
use std::process::ExitCode;

use capture_provider::error::AppError;
use capture_provider::image_provider::{
    BoundingBox, FileCaptureSource, ImageError, ImagePerformanceProfile, ImageProvider,
};
use capture_provider::settings;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "capture-provider", version, about = "按 id 拉取并缩放图片")]
struct Cli {
    /// 图片路径（支持 file:// 前缀）
    input: String,

    /// 目标宽度，<= 0 表示不限制
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    width: i32,

    /// 目标高度，<= 0 表示不限制
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    height: i32,

    /// 性能档位：quality / balanced / speed
    #[arg(long, env = "CAPTURE_PROVIDER_PROFILE")]
    profile: Option<String>,

    /// 设置文件（JSON）
    #[arg(long, env = "CAPTURE_PROVIDER_SETTINGS")]
    settings: Option<PathBuf>,

    /// 重复请求次数
    #[arg(long, default_value_t = 2)]
    repeat: u32,

    /// 输出文件路径，格式由扩展名决定
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Image(err)) => {
            log::error!("❌ [{}] {} 阶段失败：{}", err.code(), err.stage(), err);
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let provider = ImageProvider::new(FileCaptureSource::default());

    if let Some(path) = &cli.settings {
        match settings::load_settings(path)? {
            Some(loaded) => settings::apply_settings(&provider, &loaded)?,
            None => log::info!("设置文件不存在，使用默认配置: {}", path.display()),
        }
    }

    if let Some(profile) = &cli.profile {
        provider.set_performance_profile(ImagePerformanceProfile::parse(profile)?);
    }

    let requested = BoundingBox::from_requested(cli.width, cli.height);
    let mut last = None;

    for round in 1..=cli.repeat.max(1) {
        let provided = provider.request_image(&cli.input, requested);
        log::info!(
            "第 {} 次请求 - natural={}x{} output={}x{} cache_hit={}",
            round,
            provided.natural_size.width,
            provided.natural_size.height,
            provided.image.width(),
            provided.image.height(),
            provided.cache_hit
        );
        last = Some(provided);
    }

    let stats = provider.stats();
    log::info!(
        "统计 - hits={} misses={} failed_captures={}",
        stats.hits,
        stats.misses,
        stats.failed_captures
    );

    if let (Some(output), Some(provided)) = (&cli.output, last) {
        let Some(dynamic) = provided.image.to_dynamic() else {
            return Err(ImageError::FileSystem(format!("无可输出的图片：{}", cli.input)).into());
        };
        dynamic
            .save(output)
            .map_err(|e| ImageError::FileSystem(format!("写出图片失败：{}", e)))?;
        log::info!("已写出: {}", output.display());
    }

    Ok(())
}
