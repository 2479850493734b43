use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::AppError;
use crate::models::order::{Order, REQUIRED_COLUMNS};

/// 从 CSV 文件加载全部订单
pub async fn load_orders(csv_path: &Path) -> Result<Vec<Order>> {
    let content = tokio::fs::read(csv_path)
        .await
        .with_context(|| format!("无法读取订单文件: {}", csv_path.display()))?;

    read_orders(content.as_slice())
        .with_context(|| format!("无法解析订单文件: {}", csv_path.display()))
}

/// 从任意数据源解析订单，保持文件中的顺序
///
/// 表头缺列时报告第 0 行；数据行缺值时报告该数据行的序号（从 1 开始）。
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<Order>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::MissingField {
                field: name.to_string(),
                row: 0,
            })?;
    }

    let mut orders = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record.with_context(|| format!("第 {} 行格式错误", row))?;

        let field = |i: usize| -> Result<String, AppError> {
            record
                .get(columns[i])
                .map(str::to_string)
                .ok_or_else(|| AppError::MissingField {
                    field: REQUIRED_COLUMNS[i].to_string(),
                    row,
                })
        };

        orders.push(Order {
            order_number: field(0)?,
            head: field(1)?,
            body: field(2)?,
            legs: field(3)?,
            address: field(4)?,
        });
    }

    Ok(orders)
}
