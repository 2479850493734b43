//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责浏览器资源的生命周期。
//!
//! 1. **应用初始化**：连接或启动浏览器，创建唯一的 `PageSession`
//! 2. **交互延迟**：在会话上设置 slowmo
//! 3. **委托运行**：把页面、PDF 导出和订单下载借给 `OrderPipeline`
//! 4. **关闭**：只关闭自己启动的浏览器

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::PageSession;
use crate::orchestrator::run_pipeline::{OrderPipeline, RunSummary};
use crate::services::{ChromePdfExporter, HttpOrdersFetcher};
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    session: PageSession,
    /// 浏览器是否由本程序启动
    launched: bool,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let (browser, page, launched) = match config.browser_debug_port {
            Some(port) => {
                let (browser, page) =
                    browser::connect_to_browser_and_page(port, "about:blank").await?;
                (browser, page, false)
            }
            None => {
                let (browser, page) = browser::launch_browser(
                    "about:blank",
                    config.chrome_executable.as_deref(),
                    config.headless,
                )
                .await?;
                (browser, page, true)
            }
        };

        info!("⏱️ 交互延迟: {}ms", config.slowmo_ms);
        let session = PageSession::new(page).with_slowmo(config.slowmo());

        Ok(Self {
            config,
            browser,
            session,
            launched,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let exporter = ChromePdfExporter::new(&self.browser);
        let fetcher = HttpOrdersFetcher::new(self.config.orders_csv_url.clone());

        OrderPipeline::new(&self.config, &self.session, &exporter, &fetcher)
            .run()
            .await
    }

    /// 关闭浏览器
    pub async fn shutdown(mut self) {
        if !self.launched {
            return;
        }
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
            return;
        }
        if let Err(e) = self.browser.wait().await {
            warn!("等待浏览器退出失败: {}", e);
        }
    }
}
