//! 回执提取服务 - 业务能力层
//!
//! 从提交后的页面读取回执信息。页面结构是约定而不是假设：
//! 零件行的标签对不上时直接报错，避免把身体写成腿部之类的错位。

use std::fmt::Display;

use anyhow::Result;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::PageDriver;

pub const ORDER_ID_BADGE: &str = "#receipt .badge";
pub const RECEIPT_DATE: &str = "#receipt div";
pub const RECEIPT_ADDRESS: &str = "#receipt p";
pub const RECEIPT_PARTS: &str = "#parts div";

const PART_LABELS: [&str; 3] = ["Head:", "Body:", "Legs:"];

/// 订单回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// 服务端分配的订单号
    pub order_id: String,
    pub date: String,
    pub address: String,
    pub head: String,
    pub body: String,
    pub legs: String,
}

impl Receipt {
    /// 渲染到图片上的多行文本
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Order ID: {}", self.order_id),
            format!("Date: {}", self.date),
            format!("Address: {}", self.address),
            format!("Head: {}", self.head),
            format!("Body: {}", self.body),
            format!("Legs: {}", self.legs),
        ]
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// 读取服务端分配的订单号
pub async fn read_order_id<P: PageDriver + ?Sized>(page: &P) -> Result<String> {
    let order_id = page.text_content(ORDER_ID_BADGE, 0).await?;
    Ok(order_id.trim().to_string())
}

/// 从页面提取完整回执
pub async fn extract_receipt<P: PageDriver + ?Sized>(page: &P, order_id: &str) -> Result<Receipt> {
    let date = page.text_content(RECEIPT_DATE, 0).await?;
    let address = page.text_content(RECEIPT_ADDRESS, 0).await?;

    let mut parts = Vec::with_capacity(PART_LABELS.len());
    for (nth, label) in PART_LABELS.iter().enumerate() {
        let raw = page.text_content(RECEIPT_PARTS, nth).await?;
        parts.push(strip_label(&raw, label)?);
    }
    let [head, body, legs]: [String; 3] = parts
        .try_into()
        .map_err(|_| anyhow::anyhow!("零件行数量异常"))?;

    let receipt = Receipt {
        order_id: order_id.to_string(),
        date: date.trim().to_string(),
        address: address.trim().to_string(),
        head,
        body,
        legs,
    };
    debug!("回执内容:\n{}", receipt);

    Ok(receipt)
}

/// 去掉零件行前面的标签，标签不符时报错
pub fn strip_label(raw: &str, label: &str) -> AppResult<String> {
    raw.trim()
        .strip_prefix(label)
        .map(|rest| rest.trim().to_string())
        .ok_or_else(|| AppError::ReceiptLayout {
            expected: label.to_string(),
            actual: raw.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Receipt {
        Receipt {
            order_id: "RSB-ROBO-ORDER-ABC123".into(),
            date: "1700000000000".into(),
            address: "Address 123".into(),
            head: "Roll-a-thor head".into(),
            body: "Peanut crusher body".into(),
            legs: "D.A.V.E legs".into(),
        }
    }

    #[test]
    fn text_has_one_labelled_line_per_field() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Order ID: RSB-ROBO-ORDER-ABC123",
                "Date: 1700000000000",
                "Address: Address 123",
                "Head: Roll-a-thor head",
                "Body: Peanut crusher body",
                "Legs: D.A.V.E legs",
            ]
        );
    }

    #[test]
    fn strip_label_removes_prefix_and_whitespace() {
        assert_eq!(strip_label("  Body: Peanut crusher body ", "Body:").unwrap(), "Peanut crusher body");
    }

    #[test]
    fn swapped_part_rows_are_rejected() {
        let err = strip_label("Legs: D.A.V.E legs", "Body:").unwrap_err();
        match err {
            AppError::ReceiptLayout { expected, actual } => {
                assert_eq!(expected, "Body:");
                assert_eq!(actual, "Legs: D.A.V.E legs");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
