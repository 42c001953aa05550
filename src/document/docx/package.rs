// ==========================================
// Phil-IRI GST 系统 - OOXML 包读写
// ==========================================
// 职责: zip 包 <-> 部件列表 (保留原有顺序与未修改部件的字节)
// 工具: zip
// ==========================================

use crate::document::error::{DocumentError, DocumentResult};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

// ==========================================
// DocxPackage - 部件容器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 zip 字节读取全部部件
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::Package(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocumentError::Package(e.to_string()))?;
            let mut data = Vec::new();
            if !file.is_dir() {
                file.read_to_end(&mut data)?;
            }
            entries.push(PackageEntry {
                name: file.name().to_string(),
                data,
                is_dir: file.is_dir(),
            });
        }

        tracing::trace!(parts = entries.len(), "文档包读取完成");
        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| !entry.is_dir && entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    /// 读取部件为 UTF-8 文本
    pub fn part_text(&self, name: &str) -> DocumentResult<Option<String>> {
        match self.part(name) {
            None => Ok(None),
            Some(data) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|e| DocumentError::Package(format!("{} 不是 UTF-8: {}", name, e))),
        }
    }

    /// 替换或新增部件
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                is_dir: false,
            }),
        }
    }

    pub fn part_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// 写出 zip 字节（deflate 压缩）
    pub fn to_bytes(&self) -> DocumentResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(|e| DocumentError::Package(e.to_string()))?;
                continue;
            }
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|e| DocumentError::Package(e.to_string()))?;
            writer.write_all(&entry.data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| DocumentError::Package(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_survive_rewrite() {
        let mut package = DocxPackage::new();
        package.set_part("word/document.xml", b"<a/>".to_vec());
        package.set_part("word/media/image1.png", vec![0, 1, 2, 3]);

        let bytes = package.to_bytes().unwrap();
        let reread = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(reread.part_names(), vec!["word/document.xml", "word/media/image1.png"]);
        assert_eq!(reread.part("word/media/image1.png"), Some(&[0u8, 1, 2, 3][..]));
        assert_eq!(reread.part_text("word/document.xml").unwrap().as_deref(), Some("<a/>"));
        assert_eq!(reread.part("missing.xml"), None);
    }

    #[test]
    fn test_rejects_non_zip_bytes() {
        assert!(matches!(
            DocxPackage::from_bytes(b"not a zip"),
            Err(DocumentError::Package(_))
        ));
    }
}
