//! 订单下载服务 - 业务能力层
//!
//! 只负责"把订单 CSV 放到本地"能力

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::AppError;

/// 订单文件来源
#[async_trait]
pub trait OrdersFetcher: Send + Sync {
    /// 把订单文件写到 `target`，已存在则覆盖
    async fn fetch(&self, target: &Path) -> Result<()>;
}

/// 通过 HTTP 下载订单文件
pub struct HttpOrdersFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpOrdersFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl OrdersFetcher for HttpOrdersFetcher {
    async fn fetch(&self, target: &Path) -> Result<()> {
        info!("⬇️ 正在下载订单文件: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::DownloadFailed {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::DownloadFailed {
                url: self.url.clone(),
                reason: format!("HTTP {}", status),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| AppError::DownloadFailed {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        debug!("下载完成: {} 字节", bytes.len());

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }
        tokio::fs::write(target, &bytes)
            .await
            .with_context(|| format!("无法写入订单文件: {}", target.display()))?;

        info!("✓ 订单文件已保存: {}", target.display());
        Ok(())
    }
}
