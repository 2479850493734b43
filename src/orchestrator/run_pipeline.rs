//! 单次运行管道 - 编排层
//!
//! ## 职责
//!
//! 1. **打开站点**：导航到下单页面并关闭初始弹窗
//! 2. **获取订单**：下载 CSV 并解析
//! 3. **逐个下单**：委托 `OrderFlow` 处理每一条订单，严格串行
//! 4. **归档**：把所有 PDF 打成一个 zip
//! 5. **清理**：无论成功与否都清空工作目录

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::load_orders;
use crate::services::document::DIALOG_OK_TEXT;
use crate::services::{
    click_button_when_ready, create_archive, ArchiveSummary, DocumentExporter, ImageComposer,
    OrdersFetcher, WorkDir,
};
use crate::utils::logging::{log_order_start, log_orders_loaded, print_final_stats};
use crate::workflow::{OrderCtx, OrderFlow, OrderOutcome};

/// 运行统计
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// 读取到的订单数
    pub total: usize,
    /// 已生成 PDF 的服务端订单号，按处理顺序
    pub order_ids: Vec<String>,
    /// 提交重试耗尽的订单数（包括继续生成了 PDF 的）
    pub exhausted: usize,
    /// 被跳过的订单数
    pub skipped: usize,
    /// 归档信息
    pub archive: Option<ArchiveSummary>,
}

impl RunSummary {
    pub fn archive_path(&self) -> Option<&PathBuf> {
        self.archive.as_ref().map(|a| &a.path)
    }
}

/// 单次运行管道
///
/// 页面、文档导出和订单来源都由调用方借入，管道本身不持有任何资源。
pub struct OrderPipeline<'a, P: ?Sized, D: ?Sized, F: ?Sized> {
    config: &'a Config,
    page: &'a P,
    exporter: &'a D,
    fetcher: &'a F,
}

impl<'a, P, D, F> OrderPipeline<'a, P, D, F>
where
    P: PageDriver + ?Sized,
    D: DocumentExporter + ?Sized,
    F: OrdersFetcher + ?Sized,
{
    pub fn new(config: &'a Config, page: &'a P, exporter: &'a D, fetcher: &'a F) -> Self {
        Self {
            config,
            page,
            exporter,
            fetcher,
        }
    }

    /// 执行一次完整运行
    ///
    /// 中途出错同样会等待后清理工作目录，然后把原始错误返回。
    pub async fn run(&self) -> Result<RunSummary> {
        let work_dir = WorkDir::create(self.config.work_dir_path())?;

        let result = self.process(&work_dir).await;
        if let Err(e) = &result {
            error!("❌ 运行中断: {:#}", e);
        }

        // 给仍在写盘的文件留出时间
        let delay = self.config.cleanup_delay();
        if !delay.is_zero() {
            info!("⏳ {} 秒后清理工作目录...", delay.as_secs());
            sleep(delay).await;
        }
        work_dir.cleanup();

        result
    }

    async fn process(&self, work_dir: &WorkDir) -> Result<RunSummary> {
        // 字体缺失属于致命错误，放在清理范围内
        let composer = ImageComposer::from_font_path(self.config.receipt_font.as_deref())?;
        let flow = OrderFlow::new(self.config, composer);

        self.open_site().await?;

        let csv_path = PathBuf::from(&self.config.orders_csv_path);
        self.fetcher.fetch(&csv_path).await?;
        let orders = load_orders(&csv_path).await?;
        log_orders_loaded(orders.len(), &csv_path);

        let mut summary = RunSummary {
            total: orders.len(),
            ..Default::default()
        };

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number.clone(), index + 1, orders.len());
            log_order_start(ctx.index, ctx.total, &ctx.order_number);

            let outcome = flow
                .run(self.page, self.exporter, work_dir, order, &ctx)
                .await
                .with_context(|| format!("订单 {} 处理失败", order.order_number))?;

            match outcome {
                OrderOutcome::Completed {
                    order_id, submit, ..
                } => {
                    if !submit.is_accepted() {
                        summary.exhausted += 1;
                    }
                    summary.order_ids.push(order_id);
                }
                OrderOutcome::Skipped { .. } => {
                    summary.exhausted += 1;
                    summary.skipped += 1;
                }
            }
        }

        let archive = create_archive(work_dir.path(), &self.config.output_dir_path(), Local::now())?;
        summary.archive = Some(archive);

        print_final_stats(
            summary.total,
            summary.order_ids.len(),
            summary.exhausted,
            summary.skipped,
            summary.archive_path().map(|p| p.as_path()),
        );

        Ok(summary)
    }

    /// 打开下单页面并关闭初始弹窗
    async fn open_site(&self) -> Result<()> {
        info!("🌐 打开下单页面: {}", self.config.target_url);
        self.page.goto(&self.config.target_url).await?;
        click_button_when_ready(self.page, DIALOG_OK_TEXT, self.config.ready_timeout()).await?;
        Ok(())
    }
}
