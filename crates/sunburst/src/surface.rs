use derive_more::{Display, From, Into};
use std::collections::HashMap;
use std::fmt::Write;
use strum::{Display as StrumDisplay, IntoStaticStr};

/// Primitive drawable kinds the layout asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ElementKind {
    Svg,
    G,
    Defs,
    Circle,
    Path,
    Text,
    TextPath,
}

/// Capability to build a retained tree of drawable nodes.
pub trait DrawingSurface {
    type Node: Clone;

    fn root(&self) -> Self::Node;

    /// Appends a new `kind` node tagged with `classes` under `parent`.
    fn create(&mut self, parent: &Self::Node, kind: ElementKind, classes: &[&str]) -> Self::Node;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Looks a node up by its `id` attribute.
    fn resolve(&self, id: &str) -> Option<Self::Node>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
}

impl Element {
    fn new(kind: ElementKind, classes: &[&str]) -> Self {
        Self {
            kind,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

const STYLESHEET: &str = "\
.outline { fill: none; stroke: #3a3a3a; stroke-width: 2; }
.spoke { stroke: #3a3a3a; stroke-width: 1.5; }
.midline { fill: none; stroke: none; }
.label { font-family: sans-serif; font-size: 15px; text-anchor: middle; dominant-baseline: middle; }
#outer .label { font-size: 13px; }
";

/// In-memory SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgScene {
    elements: Vec<Element>,
    ids: HashMap<String, NodeId>,
}

impl SvgScene {
    /// A square canvas `2 * radius` wide with the wheel centre in the middle.
    pub fn new(radius: f64) -> Self {
        let size = radius * 2.0;
        let mut scene = Self {
            elements: vec![Element::new(ElementKind::Svg, &[])],
            ids: HashMap::new(),
        };
        let root = scene.root();
        scene.set_attribute(&root, "xmlns", "http://www.w3.org/2000/svg");
        scene.set_attribute(&root, "width", &size.to_string());
        scene.set_attribute(&root, "height", &size.to_string());
        scene.set_attribute(&root, "viewBox", &format!("0 0 {size} {size}"));
        scene.set_attribute(&root, "preserveAspectRatio", "xMidYMid meet");
        scene
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map_or(&[], |e| e.children.as_slice())
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, NodeId(0));
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        let Some(element) = self.element(node) else {
            return;
        };
        let tag: &'static str = element.kind.into();

        let _ = write!(out, "<{tag}");
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&element.classes.join(" ")));
        }
        for (name, value) in &element.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');

        if element.kind == ElementKind::Svg {
            let _ = write!(out, "<style>{STYLESHEET}</style>");
        }
        if let Some(text) = &element.text {
            out.push_str(&escape(text));
        }
        for &child in &element.children {
            self.write_node(out, child);
        }

        let _ = write!(out, "</{tag}>");
    }
}

impl DrawingSurface for SvgScene {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn create(&mut self, parent: &NodeId, kind: ElementKind, classes: &[&str]) -> NodeId {
        let node = NodeId(self.elements.len());
        match self.elements.get_mut(parent.0) {
            Some(p) => p.children.push(node),
            None => {
                log::warn!("Unknown parent node {}, attaching {} to root", parent, kind);
                self.elements[0].children.push(node);
            }
        }
        self.elements.push(Element::new(kind, classes));
        node
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let Some(element) = self.elements.get_mut(node.0) else {
            log::warn!("Attribute '{}' set on unknown node {}", name, node);
            return;
        };

        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, old)) => {
                if name == "id" {
                    self.ids.remove(old.as_str());
                }
                *old = value.to_string();
            }
            None => element
                .attributes
                .push((name.to_string(), value.to_string())),
        }

        if name == "id" {
            self.ids.insert(value.to_string(), *node);
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.text = Some(text.to_string());
        }
    }

    fn resolve(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
