//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 填写表单 → 预览截图
//! 2. 提交（带重试）
//! 3. 读取回执 → 合成图片 → 导出 PDF
//! 4. 再下一单

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::services::document::{document_file_name, DIALOG_OK_TEXT};
use crate::services::image_composer::preview_file_name;
use crate::services::order_form::PREVIEW_IMAGE;
use crate::services::{
    click_button_when_ready, extract_receipt, fill_form, order_another, read_order_id,
    submit_with_retry, wait_for_element, DocumentExporter, ImageComposer, RetryPolicy,
    SubmitOutcome, WorkDir,
};
use crate::utils::truncate_text;
use crate::workflow::order_ctx::OrderCtx;

/// 订单处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// 已生成 PDF
    Completed {
        order_id: String,
        document: PathBuf,
        submit: SubmitOutcome,
    },
    /// 提交失败且配置为跳过
    Skipped { attempts: usize },
}

/// 订单处理流程
///
/// - 编排单个订单的完整处理流程
/// - 不持有页面，页面由编排层借给它
/// - 只依赖业务能力（services）
pub struct OrderFlow {
    composer: ImageComposer,
    retry_policy: RetryPolicy,
    skip_failed_orders: bool,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    pub fn new(config: &Config, composer: ImageComposer) -> Self {
        Self {
            composer,
            retry_policy: RetryPolicy::from_config(config),
            skip_failed_orders: config.skip_failed_orders,
        }
    }

    pub async fn run<P, D>(
        &self,
        page: &P,
        exporter: &D,
        work_dir: &WorkDir,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<OrderOutcome>
    where
        P: PageDriver + ?Sized,
        D: DocumentExporter + ?Sized,
    {
        info!(
            "{} 收货地址: {}",
            ctx,
            truncate_text(&order.address, 40)
        );

        // ========== 步骤 1: 填写表单并截图 ==========
        let ready_timeout = self.retry_policy.ready_timeout;
        fill_form(page, order, ready_timeout).await?;

        work_dir.ensure()?;
        let preview_path = work_dir.join(preview_file_name(&order.order_number));
        wait_for_element(page, PREVIEW_IMAGE, ready_timeout).await?;
        page.screenshot_element(PREVIEW_IMAGE, &preview_path).await?;
        info!("{} 📸 预览图已保存", ctx);

        // ========== 步骤 2: 提交 ==========
        let submit = submit_with_retry(page, &self.retry_policy, &order.order_number).await?;

        if !submit.is_accepted() && self.skip_failed_orders {
            warn!(
                "{} ⏭️ 提交 {} 次均失败，跳过该订单并重新加载下单页面",
                ctx,
                submit.attempts()
            );
            // 地址带 # 片段，goto 同一地址不会重新加载
            page.reload().await?;
            click_button_when_ready(page, DIALOG_OK_TEXT, ready_timeout).await?;
            return Ok(OrderOutcome::Skipped {
                attempts: submit.attempts(),
            });
        }

        // ========== 步骤 3: 回执 → 合成图 → PDF ==========
        let order_id = read_order_id(page).await?;
        let receipt = extract_receipt(page, &order_id).await?;
        let images = self
            .composer
            .compose_order(&receipt, &preview_path, work_dir.path())?;

        let document = work_dir.join(document_file_name(&order_id));
        exporter
            .export_image(&images.combined_path, &document)
            .await?;
        info!("{} 📄 PDF 已生成: {}", ctx, document.display());

        // ========== 步骤 4: 回到下单页面 ==========
        order_another(page, ready_timeout).await?;

        Ok(OrderOutcome::Completed {
            order_id,
            document,
            submit,
        })
    }
}
