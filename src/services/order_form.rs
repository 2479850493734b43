//! 表单填写服务 - 业务能力层
//!
//! 把一条订单映射到下单表单的各个控件上，并触发预览。

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::services::page_wait::wait_for_element;

pub const HEAD_SELECT: &str = "#head";
pub const LEGS_INPUT: &str = "input[type='number'][placeholder='Enter the part number for the legs']";
pub const ADDRESS_INPUT: &str = "#address";
pub const PREVIEW_BUTTON: &str = "#preview";
pub const PREVIEW_IMAGE: &str = "#robot-preview-image";

/// 身体型号对应的单选按钮
pub fn body_radio(body: &str) -> String {
    format!("#id-body-{}", body)
}

/// 填写表单并点击预览
///
/// 先等表单渲染出来（最多 `ready_timeout`）。
/// 任何控件缺失都会返回元素不存在错误，由上层终止本次运行。
pub async fn fill_form<P: PageDriver + ?Sized>(
    page: &P,
    order: &Order,
    ready_timeout: Duration,
) -> Result<()> {
    debug!("[订单 {}] 填写表单", order.order_number);

    wait_for_element(page, HEAD_SELECT, ready_timeout).await?;

    page.select_option(HEAD_SELECT, &order.head).await?;
    page.click(&body_radio(&order.body)).await?;
    page.fill(LEGS_INPUT, &order.legs).await?;
    page.fill(ADDRESS_INPUT, &order.address).await?;
    page.click(PREVIEW_BUTTON).await?;

    Ok(())
}
