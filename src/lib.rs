//! # Robot Order
//!
//! 自动化机器人下单：读取订单 CSV，逐条在网页上填写并提交，
//! 为每个订单生成带回执的 PDF，最后打包归档。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 页面操作能力接口
//! - `PageSession` - 唯一的 page owner
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个订单
//! - 页面就绪等待、表单填写、提交重试、回执提取、图片合成、PDF 导出、归档、清理
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装
//! - `OrderFlow` - 流程编排（填表 → 截图 → 提交 → 回执 → PDF → 再下一单）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，管理浏览器资源
//! - `orchestrator/run_pipeline` - 单次运行，遍历订单、归档、清理

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_browser};
pub use config::Config;
pub use error::{AppError, AppResult, Result};
pub use infrastructure::{PageDriver, PageSession};
pub use models::Order;
pub use orchestrator::{App, OrderPipeline, RunSummary};
pub use workflow::{OrderCtx, OrderFlow, OrderOutcome};
