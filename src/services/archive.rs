//! 归档服务 - 业务能力层
//!
//! 把工作目录中的全部 PDF 打包成一个带时间戳的 zip。

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 归档中收录的文件扩展名
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// 归档结果
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
}

/// 归档文件名，精确到秒
pub fn archive_file_name(now: &DateTime<Local>) -> String {
    format!("robot_orders_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// 列出工作目录中的文档，按文件名排序
pub fn list_documents(work_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(work_dir)
        .with_context(|| format!("无法读取工作目录: {}", work_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_document(&path) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// 创建归档
///
/// 只收录 PDF，截图和合成图不进入归档。条目名为文件名本身（不带目录）。
pub fn create_archive(
    work_dir: &Path,
    output_dir: &Path,
    now: DateTime<Local>,
) -> Result<ArchiveSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;

    let archive_path = output_dir.join(archive_file_name(&now));
    let documents = list_documents(work_dir)?;

    let file = File::create(&archive_path)
        .with_context(|| format!("无法创建归档: {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for document in &documents {
        let name = document
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        debug!("加入归档: {}", name);

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("无法写入归档条目: {}", name))?;
        let mut source = File::open(document)
            .with_context(|| format!("无法打开文档: {}", document.display()))?;
        io::copy(&mut source, &mut zip)?;
    }
    zip.finish().context("无法完成归档")?;

    info!(
        "📦 已创建归档 {}，包含 {} 个订单",
        archive_path.display(),
        documents.len()
    );

    Ok(ArchiveSummary {
        path: archive_path,
        entries: documents.len(),
    })
}
