// ==========================================
// Phil-IRI GST 系统 - 结构化文档能力接口
// ==========================================
// 职责: 定义"段落 + 表格 + 单元格"的抽象能力
// 红线: 模板定位/填充只依赖本接口,不依赖具体文档库类型
// 约束: 结构探测返回 Option（缺失是常态,不是异常）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 段落对齐
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

// ==========================================
// TextFormat - 单元格/段落文本格式
// ==========================================
// 标签: bold; 取值: underline（文字下划线,不是单元格边框）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFormat {
    pub bold: bool,
    pub underline: bool,
    pub alignment: Option<Alignment>,
    pub size_half_points: Option<u32>, // 字号（半磅）
}

impl TextFormat {
    /// 取值格式: 下划线,不加粗
    pub fn value() -> Self {
        Self {
            underline: true,
            ..Self::default()
        }
    }

    /// 标签格式: 加粗
    pub fn label() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Some(Alignment::Center);
        self
    }

    pub fn with_size_pt(mut self, points: u32) -> Self {
        self.size_half_points = Some(points * 2);
        self
    }
}

// ==========================================
// DocumentDefaults - 文档级缺省样式
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDefaults {
    pub font_name: String,
    pub size_half_points: u32,
}

impl Default for DocumentDefaults {
    /// Book Antiqua 10pt,段前段后 0,单倍行距
    fn default() -> Self {
        Self {
            font_name: "Book Antiqua".to_string(),
            size_half_points: 20,
        }
    }
}

// ==========================================
// StructuralDocument - 结构化文档能力
// ==========================================
// 寻址: (表格序号, 行, 列), 表格序号按文档顺序从 0 开始
// 列按网格列寻址（合并单元格覆盖多列）
pub trait StructuralDocument {
    // ===== 只读探测 =====

    /// 顶层表格数量
    fn table_count(&self) -> usize;

    /// 表格行数
    fn row_count(&self, table: usize) -> Option<usize>;

    /// 表格网格列数
    fn column_count(&self, table: usize) -> Option<usize>;

    /// 某行的物理单元格数量
    fn row_cell_count(&self, table: usize, row: usize) -> Option<usize>;

    /// 单元格文本（多段落以换行连接）
    fn cell_text(&self, table: usize, row: usize, col: usize) -> Option<String>;

    /// 某行所有物理单元格的文本
    fn row_texts(&self, table: usize, row: usize) -> Option<Vec<String>>;

    /// 单元格首个文本片段的格式
    fn cell_format(&self, table: usize, row: usize, col: usize) -> Option<TextFormat>;

    // ===== 写入 =====

    /// 用单个紧凑段落 + 单个文本片段替换单元格内容
    ///
    /// 保留单元格属性（边框/宽度/底纹）; 单元格不存在时返回 false
    fn write_cell(&mut self, table: usize, row: usize, col: usize, text: &str, format: &TextFormat) -> bool;

    /// 单元格内所有段落改为紧凑格式（段前段后 0,单倍行距）,文本不变
    fn tighten_cell(&mut self, table: usize, row: usize, col: usize) -> bool;

    /// 在表格末尾追加一行（沿用末行结构,内容为空）
    fn append_row(&mut self, table: usize) -> bool;

    /// 在正文末尾追加紧凑段落
    fn add_paragraph(&mut self, text: &str, format: &TextFormat);

    /// 在正文末尾追加 rows x cols 空表格,返回表格序号
    fn add_table(&mut self, rows: usize, cols: usize, bordered: bool) -> usize;

    /// 应用文档级缺省字体/间距
    fn apply_defaults(&mut self, defaults: &DocumentDefaults);
}
