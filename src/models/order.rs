use std::fmt::Display;

/// CSV 中必须存在的列
pub const REQUIRED_COLUMNS: [&str; 5] = ["Order number", "Head", "Body", "Legs", "Address"];

/// 订单记录
///
/// 对应 CSV 的一行，只消费一次。字段内容不做校验，
/// 非法的零件编号会在提交表单时暴露出来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// 客户端顺序编号
    pub order_number: String,
    /// 头部型号（下拉框的值）
    pub head: String,
    /// 身体型号（单选按钮编号）
    pub body: String,
    /// 腿部零件编号
    pub legs: String,
    /// 收货地址
    pub address: String,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} (头部 {}, 身体 {}, 腿部 {})",
            self.order_number, self.head, self.body, self.legs
        )
    }
}
