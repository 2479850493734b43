/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，开启详细日志时为 `debug`。
/// 重复调用是安全的（测试里会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单处理");
    info!("🌐 下单页面: {}", config.target_url);
    info!("📁 工作目录: {}", config.work_dir);
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
///
/// # 参数
/// - `total`: 订单总数
/// - `csv_path`: CSV 文件路径
pub fn log_orders_loaded(total: usize, csv_path: &Path) {
    info!("✓ 从 {} 读取到 {} 个订单", csv_path.display(), total);
}

/// 记录单个订单开始信息
pub fn log_order_start(index: usize, total: usize, order_number: &str) {
    info!("\n{}", "─".repeat(60));
    info!("[订单 {}] 处理第 {}/{} 个订单", order_number, index, total);
}

/// 打印最终统计信息
///
/// # 参数
/// - `total`: 订单总数
/// - `documents`: 生成的 PDF 数量
/// - `exhausted`: 提交重试耗尽的订单数
/// - `skipped`: 被跳过的订单数
/// - `archive`: 归档文件路径
pub fn print_final_stats(
    total: usize,
    documents: usize,
    exhausted: usize,
    skipped: usize,
    archive: Option<&Path>,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部订单处理完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 生成 PDF: {}/{}", documents, total);
    info!("❌ 提交失败: {}", exhausted);
    info!("⏭️ 跳过: {}", skipped);
    if let Some(archive) = archive {
        info!("📦 归档文件: {}", archive.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
