// ==========================================
// Phil-IRI GST 系统 - 通用 XML 树
// ==========================================
// 职责: 文档部件 XML <-> 可变元素树
// 工具: quick-xml (Reader 事件流解析 / Writer 事件流输出)
// 约束: 元素名保留原始前缀; 查找按本地名 (冒号后部分)
// ==========================================

use crate::document::error::{DocumentError, DocumentResult};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// 去掉命名空间前缀
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

// ==========================================
// XmlNode / XmlElement
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 链式添加属性
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// 链式添加子元素
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// 链式添加文本
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    // ===== 属性 =====

    /// 按本地名读取属性 (w:val / val 均可命中)
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_name(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// 设置属性: 已存在（按本地名）则覆盖,否则追加
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let local = local_name(key);
        match self.attributes.iter_mut().find(|(k, _)| local_name(k) == local) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    // ===== 子元素 =====

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |element| element.is(local))
    }

    pub fn children_named_mut<'a>(&'a mut self, local: &'a str) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.elements_mut().filter(move |element| element.is(local))
    }

    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|element| element.is(local))
    }

    /// 子元素在 children 中的位置
    pub fn position_of(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(element) if element.is(local)))
    }

    /// 删除所有同名子元素
    pub fn remove_children(&mut self, local: &str) {
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(element) if element.is(local)));
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// 子树中全部文本（含 CDATA）
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Element(child) => collect_text(child, out),
            XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
            XmlNode::Comment(_) => {}
        }
    }
}

// ==========================================
// 解析
// ==========================================

fn xml_error(part: &str, message: impl ToString) -> DocumentError {
    DocumentError::Xml {
        part: part.to_string(),
        message: message.to_string(),
    }
}

fn start_to_element(part: &str, start: &BytesStart<'_>) -> DocumentResult<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| xml_error(part, e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| xml_error(part, e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if let XmlNode::Element(element) = node {
        if root.is_none() {
            *root = Some(element);
        }
    }
}

/// 解析 XML 文本为根元素
///
/// 文本原样保留（不裁剪空白）; 处理指令与 DOCTYPE 被忽略
pub fn parse(part: &str, xml: &str) -> DocumentResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(|e| xml_error(part, e))? {
            Event::Start(start) => stack.push(start_to_element(part, &start)?),
            Event::Empty(start) => {
                let element = start_to_element(part, &start)?;
                attach(&mut stack, &mut root, XmlNode::Element(element));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error(part, "结束标签没有对应的开始标签"))?;
                attach(&mut stack, &mut root, XmlNode::Element(element));
            }
            Event::Text(text) => {
                if !stack.is_empty() {
                    let text = text.unescape().map_err(|e| xml_error(part, e))?.into_owned();
                    attach(&mut stack, &mut root, XmlNode::Text(text));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                attach(&mut stack, &mut root, XmlNode::CData(text));
            }
            Event::Comment(comment) => {
                let text = String::from_utf8_lossy(&comment).into_owned();
                attach(&mut stack, &mut root, XmlNode::Comment(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error(part, "存在未闭合的元素"));
    }
    root.ok_or_else(|| xml_error(part, "缺少根元素"))
}

// ==========================================
// 序列化
// ==========================================

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> DocumentResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => write_event(writer, Event::Text(BytesText::new(text)))?,
            XmlNode::CData(text) => write_event(writer, Event::CData(BytesCData::new(text.as_str())))?,
            XmlNode::Comment(text) => write_event(writer, Event::Comment(BytesText::from_escaped(text.as_str())))?,
        }
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> DocumentResult<()> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::XmlWrite(e.to_string()))
}

/// 序列化为带声明的 XML 字节
pub fn to_bytes(root: &XmlElement) -> DocumentResult<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner())
}

/// 序列化单个元素（无声明）
pub fn element_to_string(element: &XmlElement) -> DocumentResult<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|e| DocumentError::XmlWrite(e.to_string()))
}
