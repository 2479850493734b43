//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 管理浏览器生命周期（连接/启动、关闭）
//! - 持有唯一的 `PageSession`
//!
//! ### `run_pipeline` - 单次运行管道
//! - 打开站点、下载订单、逐个下单
//! - 归档 PDF
//! - 保证工作目录在任何情况下都被清理
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor::App (持有 Browser / PageSession)
//!     ↓
//! run_pipeline::OrderPipeline (处理 Vec<Order>)
//!     ↓
//! workflow::OrderFlow (处理单个 Order)
//!     ↓
//! services (能力层：表单 / 提交 / 回执 / 图片 / PDF / 归档 / 清理)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod batch_processor;
pub mod run_pipeline;

// 重新导出主要类型
pub use batch_processor::App;
pub use run_pipeline::{OrderPipeline, RunSummary};
