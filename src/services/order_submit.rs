//! 订单提交服务 - 业务能力层
//!
//! 反复点击提交，直到页面上不再出现错误提示，或达到尝试上限。

use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;

pub const ORDER_BUTTON: &str = "#order";
pub const ERROR_ALERT: &str = ".alert-danger";
pub const RECEIPT: &str = "#receipt";

/// 提交重试策略
///
/// 固定间隔，不做指数退避。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多点击几次提交
    pub max_attempts: usize,
    /// 两次尝试之间的固定间隔
    pub pause: Duration,
    /// 每次点击后等待回执或错误提示出现的最长时间
    pub ready_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            pause: Duration::from_secs(1),
            ready_timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.submit_max_attempts.max(1),
            pause: Duration::from_millis(config.submit_retry_pause_ms),
            ready_timeout: config.ready_timeout(),
        }
    }
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 服务端接受了订单
    Accepted { attempts: usize },
    /// 尝试次数用尽，错误提示仍然存在
    Exhausted { attempts: usize },
}

impl SubmitOutcome {
    pub fn attempts(&self) -> usize {
        match self {
            SubmitOutcome::Accepted { attempts } | SubmitOutcome::Exhausted { attempts } => {
                *attempts
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// 提交订单（带重试）
///
/// 重试耗尽只记录错误、不返回 Err，由调用方决定是否继续处理该订单。
/// 页面元素缺失等错误照常向上传递。
pub async fn submit_with_retry<P: PageDriver + ?Sized>(
    page: &P,
    policy: &RetryPolicy,
    order_number: &str,
) -> Result<SubmitOutcome> {
    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            sleep(policy.pause).await;
        }

        let stale_alert = page.count(ERROR_ALERT).await? > 0;
        page.click(ORDER_BUTTON).await?;

        // 上一次的错误提示还在页面上时，只有回执能说明本次结果
        let signals: &[&str] = if stale_alert {
            &[RECEIPT]
        } else {
            &[RECEIPT, ERROR_ALERT]
        };
        if page
            .wait_for_any(signals, policy.ready_timeout)
            .await?
            .is_none()
        {
            debug!("[订单 {}] 等待提交结果超时", order_number);
        }

        if page.count(RECEIPT).await? > 0 || page.count(ERROR_ALERT).await? == 0 {
            info!("[订单 {}] ✓ 提交成功 (第 {} 次尝试)", order_number, attempt);
            return Ok(SubmitOutcome::Accepted { attempts: attempt });
        }

        warn!(
            "[订单 {}] 提交出错 (尝试 {}/{})",
            order_number, attempt, policy.max_attempts
        );
    }

    error!(
        "[订单 {}] ❌ 提交 {} 次后仍然失败",
        order_number, policy.max_attempts
    );
    Ok(SubmitOutcome::Exhausted {
        attempts: policy.max_attempts,
    })
}
