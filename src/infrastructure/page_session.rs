//! 页面会话 - 基础设施层
//!
//! 持有唯一的 page 资源，对外只暴露 [`PageDriver`] 能力

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::PageDriver;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 页面会话
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 每次交互前应用 slowmo 延迟
/// - 不认识订单，不处理业务流程
pub struct PageSession {
    page: Page,
    slowmo: Duration,
}

impl PageSession {
    /// 创建新的页面会话
    pub fn new(page: Page) -> Self {
        Self {
            page,
            slowmo: Duration::ZERO,
        }
    }

    /// 设置交互延迟
    pub fn with_slowmo(mut self, slowmo: Duration) -> Self {
        self.slowmo = slowmo;
        self
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    async fn pace(&self) {
        if !self.slowmo.is_zero() {
            sleep(self.slowmo).await;
        }
    }

    async fn find(&self, selector: &str) -> Result<chromiumoxide::Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| AppError::element_not_found(selector).into())
    }
}

#[async_trait]
impl PageDriver for PageSession {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        debug!("重新加载页面");
        self.page.reload().await.context("重新加载页面失败")?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.pace().await;
        debug!("点击: {}", selector);
        let element = self.find(selector).await?;
        element.scroll_into_view().await?;
        element
            .click()
            .await
            .with_context(|| format!("点击 {} 失败", selector))?;
        Ok(())
    }

    async fn has_button_with_text(&self, text: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const target = {};
                return Array.from(document.querySelectorAll('button'))
                    .some(b => b.textContent.trim() === target);
            }})()
            "#,
            serde_json::to_string(text)?
        );
        self.eval_as(js_code).await
    }

    async fn click_button_with_text(&self, text: &str) -> Result<()> {
        self.pace().await;
        debug!("点击按钮: {}", text);
        let js_code = format!(
            r#"
            (() => {{
                const target = {};
                const button = Array.from(document.querySelectorAll('button'))
                    .find(b => b.textContent.trim() === target);
                if (!button) return false;
                button.click();
                return true;
            }})()
            "#,
            serde_json::to_string(text)?
        );

        let clicked: bool = self.eval_as(js_code).await?;
        if !clicked {
            return Err(AppError::element_not_found(format!("button:text('{}')", text)).into());
        }
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.pace().await;
        debug!("选择 {} = {}", selector, value);
        // 通过原生 setter 赋值，前端框架才能感知到 change
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
                setter.call(el, {});
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            serde_json::to_string(selector)?,
            serde_json::to_string(value)?
        );

        let found: bool = self.eval_as(js_code).await?;
        if !found {
            return Err(AppError::element_not_found(selector).into());
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.pace().await;
        debug!("填写 {}", selector);
        let clear_js = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
                setter.call(el, '');
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            serde_json::to_string(selector)?
        );

        let found: bool = self.eval_as(clear_js).await?;
        if !found {
            return Err(AppError::element_not_found(selector).into());
        }

        let element = self.find(selector).await?;
        element.click().await?;
        element
            .type_str(value)
            .await
            .with_context(|| format!("向 {} 输入失败", selector))?;
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let js_code = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        self.eval_as(js_code).await
    }

    async fn text_content(&self, selector: &str, nth: usize) -> Result<String> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelectorAll({})[{}];
                return el ? el.textContent : null;
            }})()
            "#,
            serde_json::to_string(selector)?,
            nth
        );

        let text: Option<String> = self.eval_as(js_code).await?;
        text.ok_or_else(|| AppError::element_not_found(format!("{} >> nth={}", selector, nth)).into())
    }

    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<Option<usize>> {
        let start = Instant::now();
        loop {
            for (index, selector) in selectors.iter().enumerate() {
                if self.count(selector).await? > 0 {
                    debug!("{} 在 {}ms 后出现", selector, start.elapsed().as_millis());
                    return Ok(Some(index));
                }
            }
            if start.elapsed() >= timeout {
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()> {
        self.pace().await;
        let element = self.find(selector).await?;
        element.scroll_into_view().await?;
        let bytes = element
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .with_context(|| format!("截图 {} 失败", selector))?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("无法写入截图: {}", path.display()))?;
        debug!("截图已保存: {}", path.display());
        Ok(())
    }
}
