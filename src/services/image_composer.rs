//! 图片合成服务 - 业务能力层
//!
//! 把回执文字和缩小后的预览图拼成一张 500×600 的图片。

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, info};

use crate::error::AppError;
use crate::services::receipt::Receipt;

pub const CANVAS_WIDTH: u32 = 500;
pub const CANVAS_HEIGHT: u32 = 600;
pub const RECEIPT_WIDTH: u32 = 400;
pub const RECEIPT_HEIGHT: u32 = 150;
/// 预览图缩放比例
pub const PREVIEW_SCALE: f32 = 0.6;
/// 预览图在画布上的纵向位置
pub const PREVIEW_TOP: i64 = 200;

const FONT_SIZE: f32 = 16.0;
const LINE_HEIGHT: i32 = 19;
const TEXT_ORIGIN: (i32, i32) = (30, 30);

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 内置回执字体（DejaVu Sans）
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// 加载回执字体
///
/// 配置了路径就只用该文件，文件不存在时报错；未配置时使用内置字体。
pub fn load_font(preferred: Option<&str>) -> Result<FontArc> {
    let Some(preferred) = preferred else {
        debug!("使用内置字体");
        return bundled_font();
    };

    let path = Path::new(preferred);
    if !path.is_file() {
        return Err(AppError::FontNotFound {
            path: preferred.to_string(),
        }
        .into());
    }
    let bytes = std::fs::read(path).with_context(|| format!("无法读取字体: {}", path.display()))?;
    let font =
        FontArc::try_from_vec(bytes).with_context(|| format!("无法解析字体: {}", path.display()))?;
    debug!("使用字体: {}", path.display());
    Ok(font)
}

pub fn bundled_font() -> Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT).context("无法解析内置字体")
}

/// 把回执文字画到 400×150 的白底图片上
pub fn render_receipt(text: &str, font: &FontArc) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(RECEIPT_WIDTH, RECEIPT_HEIGHT, WHITE);
    let scale = PxScale::from(FONT_SIZE);
    let (x, y) = TEXT_ORIGIN;

    for (i, line) in text.lines().enumerate() {
        draw_text_mut(&mut canvas, BLACK, x, y + i as i32 * LINE_HEIGHT, scale, font, line);
    }
    canvas
}

/// 按 60% 等比缩小预览图
pub fn resize_preview(preview: &DynamicImage) -> DynamicImage {
    let width = ((preview.width() as f32 * PREVIEW_SCALE) as u32).max(1);
    let height = ((preview.height() as f32 * PREVIEW_SCALE) as u32).max(1);
    preview.resize_exact(width, height, FilterType::Lanczos3)
}

/// 合成最终图片
///
/// 回执居中贴在顶部，已缩放的预览图水平居中贴在下方。
/// 无论输入尺寸如何，输出固定为 500×600，超出部分被裁掉。
pub fn compose(receipt: &RgbaImage, preview: &DynamicImage) -> RgbImage {
    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);

    let receipt_x = (CANVAS_WIDTH as i64 - receipt.width() as i64) / 2;
    imageops::overlay(&mut canvas, receipt, receipt_x, 0);

    let preview = preview.to_rgba8();
    let preview_x = (CANVAS_WIDTH as i64 - preview.width() as i64) / 2;
    imageops::overlay(&mut canvas, &preview, preview_x, PREVIEW_TOP);

    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// 单个订单的图片产物
#[derive(Debug, Clone)]
pub struct ComposedImages {
    pub receipt_path: PathBuf,
    pub combined_path: PathBuf,
}

/// 图片合成器
///
/// 持有已加载的字体，每个订单调用一次 [`ImageComposer::compose_order`]。
pub struct ImageComposer {
    font: FontArc,
}

impl ImageComposer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    /// 从配置加载字体并创建合成器
    pub fn from_font_path(preferred: Option<&str>) -> Result<Self> {
        Ok(Self::new(load_font(preferred)?))
    }

    /// 生成回执图和合成图
    ///
    /// 注意：预览图文件会被缩小后的版本原地覆盖。
    pub fn compose_order(
        &self,
        receipt: &Receipt,
        preview_path: &Path,
        work_dir: &Path,
    ) -> Result<ComposedImages> {
        let receipt_img = render_receipt(&receipt.to_text(), &self.font);
        let receipt_path = work_dir.join(receipt_file_name(&receipt.order_id));
        DynamicImage::ImageRgba8(receipt_img.clone())
            .to_rgb8()
            .save(&receipt_path)
            .with_context(|| format!("无法保存回执图: {}", receipt_path.display()))?;

        let preview = image::open(preview_path)
            .with_context(|| format!("无法打开预览图: {}", preview_path.display()))?;
        let resized = resize_preview(&preview);
        resized
            .save(preview_path)
            .with_context(|| format!("无法覆盖预览图: {}", preview_path.display()))?;

        let combined = compose(&receipt_img, &resized);
        let combined_path = work_dir.join(combined_file_name(&receipt.order_id));
        combined
            .save(&combined_path)
            .with_context(|| format!("无法保存合成图: {}", combined_path.display()))?;

        info!(
            "[订单 {}] 🖼️ 合成图已生成: {}",
            receipt.order_id,
            combined_path.display()
        );

        Ok(ComposedImages {
            receipt_path,
            combined_path,
        })
    }
}

pub fn preview_file_name(order_number: &str) -> String {
    format!("robot_{}.png", order_number)
}

pub fn receipt_file_name(order_id: &str) -> String {
    format!("receipt_{}.png", order_id)
}

pub fn combined_file_name(order_id: &str) -> String {
    format!("combined_{}.png", order_id)
}
