use derive_more::{AsRef, Deref, Display, From, Into};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

/// One node of the category -> subcategory -> item tree.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyNode {
    /// Leaf items, each counting as one.
    LeafGroup(Vec<Label>),
    /// Children in provider order.
    Interior(IndexMap<Label, HierarchyNode>),
}

impl HierarchyNode {
    pub fn leaves(items: impl IntoIterator<Item = impl Into<Label>>) -> Self {
        Self::LeafGroup(items.into_iter().map(Into::into).collect())
    }

    pub fn interior(children: impl IntoIterator<Item = (impl Into<Label>, HierarchyNode)>) -> Self {
        let mut map = IndexMap::new();
        for (label, node) in children {
            // first occurrence of a label wins
            map.entry(label.into()).or_insert(node);
        }
        Self::Interior(map)
    }
}

/// Total number of leaf items under `node`.
pub fn count_leaves(node: &HierarchyNode) -> usize {
    match node {
        HierarchyNode::LeafGroup(items) => items.len(),
        HierarchyNode::Interior(children) => children.values().map(count_leaves).sum(),
    }
}

impl<'de> Deserialize<'de> for HierarchyNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = HierarchyNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of item labels or a map of labelled children")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Label>()? {
            items.push(item);
        }
        Ok(HierarchyNode::LeafGroup(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut children = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(label) = map.next_key::<Label>()? {
            let node = map.next_value::<HierarchyNode>()?;
            match children.entry(label) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                Entry::Occupied(dup) => {
                    log::warn!("Duplicate label '{}' ignored", dup.key());
                }
            }
        }
        Ok(HierarchyNode::Interior(children))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(HierarchyNode::LeafGroup(Vec::new()))
    }
}
