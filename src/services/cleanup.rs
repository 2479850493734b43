//! 清理服务 - 业务能力层
//!
//! 工作目录是一次运行的临时存储，运行结束（无论成败）都要清空并删除。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

/// 清理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_files: usize,
    pub failed_files: usize,
    pub removed_dir: bool,
}

/// 清空并删除工作目录
///
/// 逐个删除文件，单个文件失败只记录日志，不影响其余文件。
/// 目录本身不存在时视为已经清理完毕。
pub fn cleanup_work_dir(work_dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    if !work_dir.exists() {
        return report;
    }

    info!("🗑️ 正在清理工作目录: {}", work_dir.display());

    match fs::read_dir(work_dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                match fs::remove_file(&path) {
                    Ok(_) => report.removed_files += 1,
                    Err(e) => {
                        error!("删除文件失败 {}: {}", path.display(), e);
                        report.failed_files += 1;
                    }
                }
            }
        }
        Err(e) => error!("无法读取工作目录 {}: {}", work_dir.display(), e),
    }

    match fs::remove_dir_all(work_dir) {
        Ok(_) => report.removed_dir = true,
        Err(e) => error!("删除目录失败 {}: {}", work_dir.display(), e),
    }

    info!(
        "✓ 清理完成: 删除 {} 个文件，失败 {} 个",
        report.removed_files, report.failed_files
    );
    report
}

/// 一次运行的工作目录
///
/// 正常流程里调用 [`WorkDir::cleanup`]；如果运行被中途放弃或 panic，
/// Drop 时会同步做同样的清理。
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    cleaned: bool,
}

impl WorkDir {
    /// 创建（或复用）工作目录
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)
            .with_context(|| format!("无法创建工作目录: {}", path.display()))?;
        Ok(Self {
            path,
            cleaned: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// 确保目录存在（每个订单截图前调用）
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("无法创建工作目录: {}", self.path.display()))
    }

    /// 清理并消耗工作目录
    pub fn cleanup(mut self) -> CleanupReport {
        self.cleaned = true;
        cleanup_work_dir(&self.path)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if !self.cleaned {
            warn!("工作目录未正常清理，在释放时清理: {}", self.path.display());
            cleanup_work_dir(&self.path);
        }
    }
}
