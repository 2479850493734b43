//! 文档导出服务 - 业务能力层
//!
//! 把合成图包成单页 PDF，然后让页面回到可以继续下单的状态。

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Browser;
use tracing::{debug, info};

use crate::infrastructure::PageDriver;
use crate::services::page_wait::{click_button_when_ready, click_when_ready};

pub const ORDER_ANOTHER_BUTTON: &str = "#order-another";
pub const DIALOG_OK_TEXT: &str = "OK";

/// CSS 像素与英寸的换算
const CSS_PX_PER_INCH: f64 = 96.0;

/// 文档导出能力
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// 把一张图片写成单页文档
    async fn export_image(&self, image_path: &Path, target: &Path) -> Result<()>;
}

/// 使用浏览器的打印功能生成 PDF
///
/// 每次导出开一个临时标签页，不影响下单页面的状态。
pub struct ChromePdfExporter<'a> {
    browser: &'a Browser,
}

impl<'a> ChromePdfExporter<'a> {
    pub fn new(browser: &'a Browser) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl DocumentExporter for ChromePdfExporter<'_> {
    async fn export_image(&self, image_path: &Path, target: &Path) -> Result<()> {
        let bytes = tokio::fs::read(image_path)
            .await
            .with_context(|| format!("无法读取图片: {}", image_path.display()))?;
        let (width, height) = image::image_dimensions(image_path)
            .with_context(|| format!("无法识别图片尺寸: {}", image_path.display()))?;

        let html = image_page_html(&bytes, width, height);
        let data_url = format!(
            "data:text/html;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );

        let page = self.browser.new_page(data_url).await?;
        let params = PrintToPdfParams::builder()
            .print_background(true)
            .paper_width(width as f64 / CSS_PX_PER_INCH)
            .paper_height(height as f64 / CSS_PX_PER_INCH)
            .margin_top(0.0)
            .margin_bottom(0.0)
            .margin_left(0.0)
            .margin_right(0.0)
            .page_ranges("1")
            .build();

        let pdf = page.pdf(params).await;
        // 先关闭标签页再处理结果
        page.close().await?;
        let pdf = pdf.context("打印 PDF 失败")?;

        tokio::fs::write(target, &pdf)
            .await
            .with_context(|| format!("无法写入 PDF: {}", target.display()))?;
        debug!("PDF 已写入: {} ({} 字节)", target.display(), pdf.len());
        Ok(())
    }
}

/// 只包含一张图片、尺寸与图片一致的页面
fn image_page_html(png: &[u8], width: u32, height: u32) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><style>
@page {{ size: {w}px {h}px; margin: 0; }}
html, body {{ margin: 0; padding: 0; }}
img {{ display: block; width: {w}px; height: {h}px; }}
</style></head><body><img src="data:image/png;base64,{data}"></body></html>"#,
        w = width,
        h = height,
        data = base64::engine::general_purpose::STANDARD.encode(png)
    )
}

pub fn document_file_name(order_id: &str) -> String {
    format!("order_{}.pdf", order_id)
}

/// 点击"再下一单"并关闭随后弹出的确认弹窗
pub async fn order_another<P: PageDriver + ?Sized>(
    page: &P,
    ready_timeout: Duration,
) -> Result<()> {
    click_when_ready(page, ORDER_ANOTHER_BUTTON, ready_timeout).await?;
    click_button_when_ready(page, DIALOG_OK_TEXT, ready_timeout).await?;
    info!("↩️ 已返回下单页面");
    Ok(())
}
