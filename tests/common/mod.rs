//! 测试用的内存假页面、假导出器和本地订单来源
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use robot_order::services::{DocumentExporter, OrdersFetcher};
use robot_order::{AppError, Config, PageDriver};

/// 永远不会成功
pub const NEVER: usize = usize::MAX;

#[derive(Default)]
struct FakeState {
    actions: Vec<String>,
    /// 已点击预览的次数，等于当前是第几个订单
    previews: usize,
    /// 当前订单的提交点击次数
    attempts: usize,
    /// 全部提交点击次数
    total_attempts: usize,
    accepted: usize,
    alert_visible: bool,
    receipt_visible: bool,
    /// "OK" 确认弹窗是否显示
    modal_visible: bool,
    current_url: Option<String>,
    /// 每次 wait_for_any 传入的选择器
    waits: Vec<Vec<String>>,
    /// 延迟出现的元素已被轮询的次数
    polls: HashMap<String, usize>,
    order_id: Option<String>,
    head: String,
    body: String,
    legs: String,
    address: String,
}

/// 模拟下单网站的页面
///
/// 第 n 个订单在第 `schedule[n-1]` 次点击提交时成功（没有配置时用 `default_clears_on`）。
pub struct FakePage {
    state: Mutex<FakeState>,
    schedule: Vec<usize>,
    default_clears_on: usize,
    missing: HashSet<String>,
    delayed: HashMap<String, usize>,
    swap_body_and_legs: bool,
}

/// 按钮在 `missing` / `delayed` 中使用的键
pub fn button_key(text: &str) -> String {
    format!("button:text('{}')", text)
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            schedule: Vec::new(),
            default_clears_on: 1,
            missing: HashSet::new(),
            delayed: HashMap::new(),
            swap_body_and_legs: false,
        }
    }

    /// 每个订单都在第 k 次提交时成功
    pub fn clearing_on(mut self, k: usize) -> Self {
        self.default_clears_on = k;
        self
    }

    /// 按订单顺序分别指定第几次提交成功
    pub fn with_schedule(mut self, schedule: Vec<usize>) -> Self {
        self.schedule = schedule;
        self
    }

    /// 让某个选择器在页面上不存在
    pub fn without(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    /// 元素在前 `polls` 次查询时还没渲染出来
    pub fn appearing_after(mut self, selector: &str, polls: usize) -> Self {
        self.delayed.insert(selector.to_string(), polls);
        self
    }

    /// 回执里身体和腿部两行的位置互换
    pub fn with_swapped_parts(mut self) -> Self {
        self.swap_body_and_legs = true;
        self
    }

    pub fn total_attempts(&self) -> usize {
        self.state.lock().unwrap().total_attempts
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn waits(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().waits.clone()
    }

    pub fn modal_visible(&self) -> bool {
        self.state.lock().unwrap().modal_visible
    }

    fn clears_on(&self, order: usize) -> usize {
        order
            .checked_sub(1)
            .and_then(|i| self.schedule.get(i).copied())
            .unwrap_or(self.default_clears_on)
    }

    /// 元素当前是否已渲染；对延迟元素的每次查询都算一次轮询
    fn rendered(&self, state: &mut FakeState, key: &str) -> bool {
        if self.missing.contains(key) {
            return false;
        }
        match self.delayed.get(key) {
            Some(&after) => {
                let polls = state.polls.entry(key.to_string()).or_default();
                let rendered = *polls >= after;
                *polls += 1;
                rendered
            }
            None => true,
        }
    }

    fn check(&self, state: &mut FakeState, selector: &str) -> Result<()> {
        if !self.rendered(state, selector) {
            return Err(AppError::element_not_found(selector).into());
        }
        Ok(())
    }

    /// 整页加载：表单清空，弹出确认弹窗
    fn load_page(state: &mut FakeState) {
        state.alert_visible = false;
        state.receipt_visible = false;
        state.order_id = None;
        state.modal_visible = true;
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("goto {}", url));
        // 同一地址只差 # 片段，浏览器不会重新加载
        if state.current_url.as_deref() != Some(url) {
            state.current_url = Some(url.to_string());
            Self::load_page(&mut state);
        }
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push("reload".to_string());
        Self::load_page(&mut state);
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, selector)?;
        state.actions.push(format!("click {}", selector));

        match selector {
            "#preview" => {
                state.previews += 1;
                state.attempts = 0;
            }
            "#order" => {
                state.attempts += 1;
                state.total_attempts += 1;
                let order = state.previews;
                if state.attempts >= self.clears_on(order) {
                    state.accepted += 1;
                    state.alert_visible = false;
                    state.receipt_visible = true;
                    state.order_id = Some(format!("RSB-ROBO-ORDER-{}", 1000 + state.accepted));
                } else {
                    state.alert_visible = true;
                }
            }
            "#order-another" => {
                state.receipt_visible = false;
                state.order_id = None;
                state.modal_visible = true;
            }
            other if other.starts_with("#id-body-") => {
                state.body = other.trim_start_matches("#id-body-").to_string();
            }
            _ => {}
        }
        Ok(())
    }

    async fn has_button_with_text(&self, text: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let rendered = self.rendered(&mut state, &button_key(text));
        Ok(rendered && state.modal_visible)
    }

    async fn click_button_with_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let key = button_key(text);
        if !state.modal_visible {
            return Err(AppError::element_not_found(key).into());
        }
        self.check(&mut state, &key)?;
        state.actions.push(format!("button {}", text));
        state.modal_visible = false;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, selector)?;
        state.actions.push(format!("select {} {}", selector, value));
        state.head = value.to_string();
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, selector)?;
        state.actions.push(format!("fill {} {}", selector, value));
        if selector == "#address" {
            state.address = value.to_string();
        } else {
            state.legs = value.to_string();
        }
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        Ok(match selector {
            ".alert-danger" => state.alert_visible as usize,
            "#receipt" => state.receipt_visible as usize,
            other => self.rendered(&mut state, other) as usize,
        })
    }

    async fn text_content(&self, selector: &str, nth: usize) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, selector)?;
        let not_found = || -> anyhow::Error { AppError::element_not_found(selector).into() };

        if !state.receipt_visible {
            return Err(not_found());
        }

        let parts = if self.swap_body_and_legs {
            [
                format!("Head: Head {}", state.head),
                format!("Legs: Legs {}", state.legs),
                format!("Body: Body {}", state.body),
            ]
        } else {
            [
                format!("Head: Head {}", state.head),
                format!("Body: Body {}", state.body),
                format!("Legs: Legs {}", state.legs),
            ]
        };

        match (selector, nth) {
            ("#receipt .badge", 0) => state.order_id.clone().ok_or_else(not_found),
            ("#receipt div", 0) => Ok("2026-10-17".to_string()),
            ("#receipt p", 0) => Ok(state.address.clone()),
            ("#parts div", n) if n < 3 => Ok(parts[n].clone()),
            _ => Err(not_found()),
        }
    }

    async fn wait_for_any(&self, selectors: &[&str], _timeout: Duration) -> Result<Option<usize>> {
        self.state
            .lock()
            .unwrap()
            .waits
            .push(selectors.iter().map(|s| s.to_string()).collect());
        for (index, selector) in selectors.iter().enumerate() {
            if self.count(selector).await? > 0 {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            self.check(&mut state, selector)?;
            state.actions.push(format!("screenshot {}", selector));
        }
        RgbaImage::from_pixel(300, 400, Rgba([40, 90, 160, 255])).save(path)?;
        Ok(())
    }
}

/// 把图片"导出"为一个最小的占位 PDF，并记录调用
#[derive(Default)]
pub struct FakeExporter {
    pub exported: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl DocumentExporter for FakeExporter {
    async fn export_image(&self, image_path: &Path, target: &Path) -> Result<()> {
        let (width, height) = image::image_dimensions(image_path)?;
        assert_eq!((width, height), (500, 600), "合成图尺寸应固定为 500×600");
        std::fs::write(target, b"%PDF-1.4\n%fake\n")?;
        self.exported.lock().unwrap().push(target.to_path_buf());
        Ok(())
    }
}

/// 从内存写出订单 CSV
pub struct LocalFetcher {
    pub csv: String,
}

impl LocalFetcher {
    pub fn new(csv: impl Into<String>) -> Self {
        Self { csv: csv.into() }
    }
}

#[async_trait]
impl OrdersFetcher for LocalFetcher {
    async fn fetch(&self, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, &self.csv)?;
        Ok(())
    }
}

/// 所有路径都指向临时目录、没有等待时间的配置
pub fn test_config(root: &Path) -> Config {
    Config {
        orders_csv_path: root.join("input/orders.csv").to_string_lossy().to_string(),
        output_dir: root.join("output").to_string_lossy().to_string(),
        work_dir: root
            .join("output/robot_parts")
            .to_string_lossy()
            .to_string(),
        slowmo_ms: 0,
        submit_retry_pause_ms: 0,
        ready_timeout_ms: 0,
        cleanup_delay_secs: 0,
        ..Config::default()
    }
}

/// 在错误链中查找 AppError
pub fn find_app_error(err: &anyhow::Error) -> Option<&AppError> {
    err.chain().find_map(|e| e.downcast_ref::<AppError>())
}
