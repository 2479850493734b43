//! 订单处理上下文
//!
//! 封装"我正在处理第几个订单"这一信息

use std::fmt::Display;

/// 订单处理上下文
#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 客户端订单编号
    pub order_number: String,

    /// 在本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本次运行的订单总数
    pub total: usize,
}

impl OrderCtx {
    /// 创建新的订单上下文
    pub fn new(order_number: String, index: usize, total: usize) -> Self {
        Self {
            order_number,
            index,
            total,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[订单 {} ({}/{})]", self.order_number, self.index, self.total)
    }
}
