//! 页面就绪等待 - 业务能力层
//!
//! 页面在导航、点击之后才渲染出来的元素（弹窗、预览图、表单），
//! 先轮询到它出现再操作，不依赖固定延迟。

use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::PageDriver;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 等待选择器匹配到元素
///
/// 至少检查一次；超时后返回元素不存在错误。
pub async fn wait_for_element<P: PageDriver + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
) -> Result<()> {
    let start = Instant::now();
    loop {
        if page.count(selector).await? > 0 {
            debug!("{} 已就绪 ({}ms)", selector, start.elapsed().as_millis());
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(AppError::element_not_found(selector).into());
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// 等元素出现后点击
pub async fn click_when_ready<P: PageDriver + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
) -> Result<()> {
    wait_for_element(page, selector, timeout).await?;
    page.click(selector).await
}

/// 等文字为 `text` 的按钮出现后点击
pub async fn click_button_when_ready<P: PageDriver + ?Sized>(
    page: &P,
    text: &str,
    timeout: Duration,
) -> Result<()> {
    let start = Instant::now();
    while !page.has_button_with_text(text).await? {
        if start.elapsed() >= timeout {
            return Err(AppError::element_not_found(format!("button:text('{}')", text)).into());
        }
        sleep(POLL_INTERVAL).await;
    }
    page.click_button_with_text(text).await
}
