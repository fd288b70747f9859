//! 文档落盘：两空格缩进 + 末尾换行，临时文件 + rename。

use crate::error::StoreError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 渲染持久化文本。
pub(crate) fn render_document<T: Serialize>(doc: &T) -> Result<String, StoreError> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}

/// 写到同目录的 `.tmp` 再 rename 盖过目标，读者看不到半截文档。
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
