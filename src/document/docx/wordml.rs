// ==========================================
// Phil-IRI GST 系统 - WordprocessingML 操作
// ==========================================
// 职责: 段落/文本片段/表格/单元格/样式元素的读写
// 约束:
// - 新增子元素按 schema 顺序插入 (pPr/rPr/style 子元素顺序敏感)
// - 单元格写入保留 tcPr (边框/宽度/底纹)
// - 列按网格列寻址 (gridBefore + gridSpan)
// ==========================================

use crate::document::capability::{Alignment, DocumentDefaults, TextFormat};
use crate::document::docx::xml::{XmlElement, XmlNode};

// ==========================================
// 子元素顺序表
// ==========================================

const PPR_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle", "rPr",
    "sectPr", "pPrChange",
];

const RPR_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike", "outline",
    "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden", "color", "spacing",
    "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr", "shd", "fitText",
    "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish", "oMath",
];

const STYLE_ORDER: &[&str] = &[
    "name", "aliases", "basedOn", "next", "link", "autoRedefine", "hidden", "uiPriority",
    "semiHidden", "unhideWhenUsed", "qFormat", "locked", "personal", "personalCompose",
    "personalReply", "rsid", "pPr", "rPr", "tblPr", "trPr", "tcPr", "tblStylePr",
];

/// 新表格总宽 (dxa, 6.5 英寸)
pub const TABLE_WIDTH_DXA: u32 = 9360;

/// 单倍行距 (240 = 1 行)
const SINGLE_LINE: &str = "240";

/// 按顺序表插入或修改子元素
///
/// 已存在则原地编辑; 否则新建 `w:{local}`,插入到顺序表中排在其后的第一个已有元素之前
pub fn upsert_child_ordered<F>(parent: &mut XmlElement, local: &str, order: &[&str], edit: F)
where
    F: FnOnce(&mut XmlElement),
{
    if let Some(existing) = parent.child_mut(local) {
        edit(existing);
        return;
    }

    let mut created = XmlElement::new(format!("w:{}", local));
    edit(&mut created);

    let rank = order.iter().position(|name| *name == local);
    let insert_at = rank.and_then(|rank| {
        parent.children.iter().position(|node| match node {
            XmlNode::Element(element) => order
                .iter()
                .position(|name| *name == element.local_name())
                .is_some_and(|other| other > rank),
            _ => false,
        })
    });

    match insert_at {
        Some(index) => parent
            .children
            .insert(index, XmlNode::Element(created)),
        None => parent.push(created),
    }
}

fn set_val(parent: &mut XmlElement, local: &str, order: &[&str], value: &str) {
    upsert_child_ordered(parent, local, order, |element| element.set_attr("w:val", value));
}

fn is_on(element: Option<&XmlElement>) -> bool {
    match element {
        None => false,
        Some(element) => !matches!(element.attr("val"), Some("0") | Some("false") | Some("off")),
    }
}

// ==========================================
// 文本读取
// ==========================================

/// 段落文本（w:t 拼接; 制表符/换行按字符计）
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut out = String::new();
    collect_run_text(paragraph, &mut out);
    out
}

fn collect_run_text(element: &XmlElement, out: &mut String) {
    for child in element.elements() {
        match child.local_name() {
            "t" => out.push_str(&child.text_content()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            "pPr" | "rPr" | "del" => {}
            _ => collect_run_text(child, out),
        }
    }
}

/// 单元格文本（直属段落以换行连接）
pub fn cell_text(cell: &XmlElement) -> String {
    cell.children_named("p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 单元格首段首个文本片段的格式
pub fn cell_format(cell: &XmlElement) -> TextFormat {
    let paragraph = cell.child("p");
    let alignment = paragraph
        .and_then(|p| p.child("pPr"))
        .and_then(|ppr| ppr.child("jc"))
        .and_then(|jc| jc.attr("val"))
        .and_then(|val| match val {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            _ => None,
        });

    let rpr = paragraph
        .and_then(|p| p.child("r"))
        .and_then(|r| r.child("rPr"));

    TextFormat {
        bold: is_on(rpr.and_then(|rpr| rpr.child("b"))),
        underline: rpr
            .and_then(|rpr| rpr.child("u"))
            .is_some_and(|u| u.attr("val") != Some("none")),
        alignment,
        size_half_points: rpr
            .and_then(|rpr| rpr.child("sz"))
            .and_then(|sz| sz.attr("val"))
            .and_then(|val| val.parse().ok()),
    }
}

// ==========================================
// 段落 / 文本片段
// ==========================================

/// 紧凑段落: 段前段后 0, 单倍行距
pub fn tighten_paragraph_properties(ppr: &mut XmlElement) {
    upsert_child_ordered(ppr, "spacing", PPR_ORDER, |spacing| {
        spacing.attributes = vec![
            ("w:before".to_string(), "0".to_string()),
            ("w:after".to_string(), "0".to_string()),
            ("w:line".to_string(), SINGLE_LINE.to_string()),
            ("w:lineRule".to_string(), "auto".to_string()),
        ];
    });
}

/// 段落紧凑化（pPr 缺失时在首位补建）
pub fn tighten_paragraph(paragraph: &mut XmlElement) {
    if paragraph.child("pPr").is_none() {
        paragraph.children.insert(
            0,
            XmlNode::Element(XmlElement::new("w:pPr")),
        );
    }
    if let Some(ppr) = paragraph.child_mut("pPr") {
        tighten_paragraph_properties(ppr);
    }
}

fn apply_alignment(ppr: &mut XmlElement, alignment: Option<Alignment>) {
    let Some(alignment) = alignment else {
        return;
    };
    let value = match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    };
    set_val(ppr, "jc", PPR_ORDER, value);
}

/// 文本片段属性: 加粗/下划线/字号
pub fn apply_run_format(rpr: &mut XmlElement, format: &TextFormat) {
    let bold = if format.bold { "1" } else { "0" };
    set_val(rpr, "b", RPR_ORDER, bold);
    set_val(rpr, "bCs", RPR_ORDER, bold);

    if format.underline {
        set_val(rpr, "u", RPR_ORDER, "single");
    } else {
        rpr.remove_children("u");
    }

    if let Some(size) = format.size_half_points {
        let size = size.to_string();
        set_val(rpr, "sz", RPR_ORDER, &size);
        set_val(rpr, "szCs", RPR_ORDER, &size);
    }
}

/// 构建文本片段（空白原样保留）
pub fn build_run(text: &str, base_rpr: Option<XmlElement>, format: &TextFormat) -> XmlElement {
    let mut rpr = base_rpr.unwrap_or_else(|| XmlElement::new("w:rPr"));
    apply_run_format(&mut rpr, format);

    let t = XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(text);
    XmlElement::new("w:r").with_child(rpr).with_child(t)
}

/// 构建紧凑段落; 文本为空时不含文本片段
pub fn build_paragraph(
    text: &str,
    base_ppr: Option<XmlElement>,
    base_rpr: Option<XmlElement>,
    format: &TextFormat,
) -> XmlElement {
    let mut ppr = base_ppr.unwrap_or_else(|| XmlElement::new("w:pPr"));
    tighten_paragraph_properties(&mut ppr);
    apply_alignment(&mut ppr, format.alignment);

    let mut paragraph = XmlElement::new("w:p").with_child(ppr);
    if !text.is_empty() {
        paragraph.push(build_run(text, base_rpr, format));
    }
    paragraph
}

// ==========================================
// 单元格
// ==========================================

/// 用单个紧凑段落替换单元格内容
///
/// 首段 pPr 与首个文本片段 rPr 作为样式基底; tcPr 保留
pub fn write_cell(cell: &mut XmlElement, text: &str, format: &TextFormat) {
    let first_paragraph = cell.child("p");
    let base_ppr = first_paragraph.and_then(|p| p.child("pPr")).cloned();
    let base_rpr = first_paragraph
        .and_then(|p| p.child("r"))
        .and_then(|r| r.child("rPr"))
        .cloned();

    cell.children.retain(|node| {
        matches!(node, XmlNode::Element(element) if element.is("tcPr"))
    });
    cell.push(build_paragraph(text, base_ppr, base_rpr, format));
}

/// 单元格内所有直属段落紧凑化
pub fn tighten_cell(cell: &mut XmlElement) {
    for paragraph in cell.children_named_mut("p") {
        tighten_paragraph(paragraph);
    }
}

fn cell_span(cell: &XmlElement) -> usize {
    cell.child("tcPr")
        .and_then(|tcpr| tcpr.child("gridSpan"))
        .and_then(|span| span.attr("val"))
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

fn grid_before(row: &XmlElement) -> usize {
    row.child("trPr")
        .and_then(|trpr| trpr.child("gridBefore"))
        .and_then(|before| before.attr("val"))
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(0)
}

/// 网格列 → 行内物理单元格序号
pub fn grid_cell_index(row: &XmlElement, col: usize) -> Option<usize> {
    let mut start = grid_before(row);
    if col < start {
        return None;
    }
    for (index, cell) in row.children_named("tc").enumerate() {
        let end = start + cell_span(cell);
        if col < end {
            return Some(index);
        }
        start = end;
    }
    None
}

// ==========================================
// 表格
// ==========================================

/// 表格网格列数: tblGrid 优先,否则取各行跨列之和的最大值
pub fn column_count(table: &XmlElement) -> usize {
    let grid = table
        .child("tblGrid")
        .map(|grid| grid.children_named("gridCol").count())
        .unwrap_or(0);
    if grid > 0 {
        return grid;
    }
    table
        .children_named("tr")
        .map(|row| grid_before(row) + row.children_named("tc").map(cell_span).sum::<usize>())
        .max()
        .unwrap_or(0)
}

fn grid_widths(table: &XmlElement) -> Vec<Option<String>> {
    table
        .child("tblGrid")
        .map(|grid| {
            grid.children_named("gridCol")
                .map(|col| col.attr("w").map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn empty_cell(width: Option<&str>) -> XmlElement {
    let mut cell = XmlElement::new("w:tc");
    if let Some(width) = width {
        cell.push(
            XmlElement::new("w:tcPr").with_child(
                XmlElement::new("w:tcW")
                    .with_attr("w:w", width)
                    .with_attr("w:type", "dxa"),
            ),
        );
    }
    cell.push(build_paragraph("", None, None, &TextFormat::default()));
    cell
}

/// 表格末尾追加一行
///
/// 有行: 复制末行结构,清空内容（保留 tcPr）,去掉表头重复标记
/// 无行: 按 tblGrid 新建
pub fn append_row(table: &mut XmlElement) {
    let last_row_position = table
        .children
        .iter()
        .rposition(|node| matches!(node, XmlNode::Element(element) if element.is("tr")));

    let Some(position) = last_row_position else {
        let widths = grid_widths(table);
        let mut row = XmlElement::new("w:tr");
        if widths.is_empty() {
            row.push(empty_cell(None));
        } else {
            for width in &widths {
                row.push(empty_cell(width.as_deref()));
            }
        }
        table.push(row);
        return;
    };

    let template_row = match &table.children[position] {
        XmlNode::Element(element) => element.clone(),
        _ => return,
    };

    let mut row = template_row;
    if let Some(trpr) = row.child_mut("trPr") {
        trpr.remove_children("tblHeader");
    }
    for cell in row.children_named_mut("tc") {
        write_cell(cell, "", &TextFormat::default());
    }

    table
        .children
        .insert(position + 1, XmlNode::Element(row));
}

fn border(local: &str) -> XmlElement {
    XmlElement::new(format!("w:{}", local))
        .with_attr("w:val", "single")
        .with_attr("w:sz", "4")
        .with_attr("w:space", "0")
        .with_attr("w:color", "auto")
}

/// 新建 rows x cols 空表格（等宽列）
pub fn build_table(rows: usize, cols: usize, bordered: bool) -> XmlElement {
    let cols = cols.max(1);
    let width = (TABLE_WIDTH_DXA / cols as u32).to_string();

    let mut tbl_pr = XmlElement::new("w:tblPr").with_child(
        XmlElement::new("w:tblW")
            .with_attr("w:w", "0")
            .with_attr("w:type", "auto"),
    );
    if bordered {
        let mut borders = XmlElement::new("w:tblBorders");
        for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            borders.push(border(side));
        }
        tbl_pr.push(borders);
    }
    tbl_pr.push(XmlElement::new("w:tblLayout").with_attr("w:type", "fixed"));

    let mut grid = XmlElement::new("w:tblGrid");
    for _ in 0..cols {
        grid.push(XmlElement::new("w:gridCol").with_attr("w:w", width.as_str()));
    }

    let mut table = XmlElement::new("w:tbl").with_child(tbl_pr).with_child(grid);
    for _ in 0..rows {
        let mut row = XmlElement::new("w:tr");
        for _ in 0..cols {
            row.push(empty_cell(Some(&width)));
        }
        table.push(row);
    }
    table
}

/// 在 body 末尾（sectPr 之前）插入块级元素
pub fn insert_block(body: &mut XmlElement, block: XmlElement) {
    let node = XmlNode::Element(block);
    match body.position_of("sectPr") {
        Some(index) => body.children.insert(index, node),
        None => body.children.push(node),
    }
}

// ==========================================
// 样式
// ==========================================

/// 将缺省字体/字号/紧凑段落写入 Normal 样式
///
/// 返回 false 表示样式部件中没有可用的段落缺省样式
pub fn apply_style_defaults(styles: &mut XmlElement, defaults: &DocumentDefaults) -> bool {
    let is_normal = |style: &XmlElement| style.attr("styleId") == Some("Normal");
    let is_default_paragraph =
        |style: &XmlElement| style.attr("type") == Some("paragraph") && style.attr("default") == Some("1");

    let has_normal = styles.children_named("style").any(is_normal);
    let Some(style) = styles
        .children_named_mut("style")
        .find(|style| if has_normal { is_normal(style) } else { is_default_paragraph(style) })
    else {
        return false;
    };

    let size = defaults.size_half_points.to_string();
    upsert_child_ordered(style, "rPr", STYLE_ORDER, |rpr| {
        upsert_child_ordered(rpr, "rFonts", RPR_ORDER, |fonts| {
            fonts.attributes.retain(|(key, _)| !key.ends_with("Theme"));
            for slot in ["w:ascii", "w:hAnsi", "w:eastAsia", "w:cs"] {
                fonts.set_attr(slot, defaults.font_name.as_str());
            }
        });
        set_val(rpr, "sz", RPR_ORDER, &size);
        set_val(rpr, "szCs", RPR_ORDER, &size);
    });
    upsert_child_ordered(style, "pPr", STYLE_ORDER, tighten_paragraph_properties);
    true
}
