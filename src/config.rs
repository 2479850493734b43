use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
///
/// 所有路径和网址都有固定默认值，环境变量只用于覆盖这些默认值。
#[derive(Clone, Debug)]
pub struct Config {
    /// 下单页面
    pub target_url: String,
    /// 订单 CSV 下载地址
    pub orders_csv_url: String,
    /// 订单 CSV 本地路径
    pub orders_csv_path: String,
    /// 最终产物目录（存放 zip）
    pub output_dir: String,
    /// 临时工作目录（截图、合成图、PDF）
    pub work_dir: String,
    /// 浏览器调试端口；设置后连接已有浏览器，否则自行启动
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<String>,
    /// 是否无头启动
    pub headless: bool,
    /// 每次页面交互前的延迟（毫秒）
    pub slowmo_ms: u64,
    /// 提交订单的最大尝试次数
    pub submit_max_attempts: usize,
    /// 两次提交之间的间隔（毫秒）
    pub submit_retry_pause_ms: u64,
    /// 等待页面就绪的最长时间（毫秒）
    pub ready_timeout_ms: u64,
    /// 归档后、清理前的等待时间（秒）
    pub cleanup_delay_secs: u64,
    /// 回执字体路径
    pub receipt_font: Option<String>,
    /// 提交重试耗尽后是否跳过该订单
    pub skip_failed_orders: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: "input/orders.csv".to_string(),
            output_dir: "output".to_string(),
            work_dir: "output/robot_parts".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            slowmo_ms: 100,
            submit_max_attempts: 10,
            submit_retry_pause_ms: 1000,
            ready_timeout_ms: 5000,
            cleanup_delay_secs: 10,
            receipt_font: None,
            skip_failed_orders: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(default.orders_csv_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            work_dir: std::env::var("WORK_DIR").unwrap_or(default.work_dir),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            slowmo_ms: std::env::var("BROWSER_SLOWMO_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.slowmo_ms),
            submit_max_attempts: std::env::var("SUBMIT_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_max_attempts),
            submit_retry_pause_ms: std::env::var("SUBMIT_RETRY_PAUSE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_retry_pause_ms),
            ready_timeout_ms: std::env::var("READY_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ready_timeout_ms),
            cleanup_delay_secs: std::env::var("CLEANUP_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cleanup_delay_secs),
            receipt_font: std::env::var("RECEIPT_FONT").ok().or(default.receipt_font),
            skip_failed_orders: std::env::var("SKIP_FAILED_ORDERS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.skip_failed_orders),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    pub fn output_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn slowmo(&self) -> Duration {
        Duration::from_millis(self.slowmo_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.cleanup_delay_secs)
    }
}
