//! 页面能力接口 - 基础设施层
//!
//! 业务层只依赖这组 DOM 能力，不直接接触 chromiumoxide。
//! 真实实现是 [`PageSession`](super::PageSession)，测试里换成内存假页面。

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// 页面操作能力
///
/// 所有按选择器定位的操作，在元素不存在时都应返回
/// [`AppError::ElementNotFound`](crate::error::AppError::ElementNotFound)。
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定地址
    async fn goto(&self, url: &str) -> Result<()>;

    /// 重新加载当前页面
    ///
    /// 与 `goto` 当前地址不同：带 `#` 片段的同地址导航不会重新加载页面。
    async fn reload(&self) -> Result<()>;

    /// 点击第一个匹配的元素
    async fn click(&self, selector: &str) -> Result<()>;

    /// 点击文字完全等于 `text` 的按钮
    async fn click_button_with_text(&self, text: &str) -> Result<()>;

    /// 页面上是否有文字完全等于 `text` 的按钮
    async fn has_button_with_text(&self, text: &str) -> Result<bool>;

    /// 设置下拉框的值
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    /// 清空并填写输入框
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// 统计匹配元素的个数
    async fn count(&self, selector: &str) -> Result<usize>;

    /// 读取第 `nth` 个匹配元素的文本内容
    async fn text_content(&self, selector: &str, nth: usize) -> Result<String>;

    /// 轮询等待任一选择器出现，返回先出现的下标；超时返回 `None`
    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<Option<usize>>;

    /// 对元素截图并保存为 PNG
    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()>;
}
