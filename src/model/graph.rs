use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::component::{Component, ComponentKind, Position, Properties, Size};

/// Editable copy of a component's fields carried by its node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: ComponentKind,
    pub size: Size,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub text: Option<String>,
}

/// One node in the visual editor. `id` is the id of the component it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
    #[serde(default)]
    pub selected: bool,
}

/// Purely visual connector between two nodes. Ignored by generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Partial update for a node coming from the inspector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodePatch {
    /// `Some(None)` clears the label.
    pub text: Option<Option<String>>,
    pub size: Option<Size>,
    pub properties: Option<Properties>,
}

/// Events emitted by the graph-edit surface.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEdit {
    AddNode { kind: ComponentKind, at: Position },
    MoveNode { id: String, dx: f32, dy: f32 },
    DeleteNode { id: String },
    SelectNode { id: Option<String> },
    Connect { source: String, target: String },
    UpdateNode { id: String, patch: NodePatch },
    Clear,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditRejection {
    #[error("no node with id '{0}'")]
    UnknownNode(String),

    #[error("invalid size {width}x{height} for node '{id}'")]
    InvalidSize { id: String, width: f32, height: f32 },

    #[error("node '{0}' cannot be connected to itself")]
    SelfConnection(String),

    #[error("'{source_id}' is already connected to '{target_id}'")]
    DuplicateEdge { source_id: String, target_id: String },
}

/// Build the editor representation of a component collection. Nothing is selected.
pub fn to_graph(components: &[Component]) -> Graph {
    let nodes = components
        .iter()
        .map(|c| GraphNode {
            id: c.id.clone(),
            position: c.position,
            data: NodeData {
                kind: c.kind,
                size: c.size,
                properties: c.properties.clone(),
                text: c.text.clone(),
            },
            selected: false,
        })
        .collect();

    Graph {
        nodes,
        edges: Vec::new(),
    }
}

/// Recover the canonical components from editor nodes, in node order.
pub fn to_components(nodes: &[GraphNode]) -> Vec<Component> {
    nodes
        .iter()
        .map(|n| Component {
            id: n.id.clone(),
            kind: n.data.kind,
            position: n.position,
            size: n.data.size,
            properties: n.data.properties.clone(),
            text: n.data.text.clone(),
        })
        .collect()
}

impl Graph {
    pub fn components(&self) -> Vec<Component> {
        to_components(&self.nodes)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.nodes.iter().find(|n| n.selected).map(|n| n.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply one edit, yielding the next graph state. `self` is left untouched.
    pub fn apply(&self, edit: GraphEdit) -> Result<Graph, EditRejection> {
        let mut next = self.clone();

        match edit {
            GraphEdit::AddNode { kind, at } => {
                let id = self.allocate_id(kind);
                let component = Component::new(id, kind, Position::new(at.x, at.y));
                next.nodes.extend(to_graph(std::slice::from_ref(&component)).nodes);
            }

            GraphEdit::MoveNode { id, dx, dy } => {
                let node = next.node_mut(&id)?;
                node.position = node.position.offset(dx, dy);
            }

            GraphEdit::DeleteNode { id } => {
                if !self.contains(&id) {
                    return Err(EditRejection::UnknownNode(id));
                }
                next.nodes.retain(|n| n.id != id);
                next.edges.retain(|e| e.source != id && e.target != id);
            }

            GraphEdit::SelectNode { id } => {
                if let Some(id) = &id {
                    if !self.contains(id) {
                        return Err(EditRejection::UnknownNode(id.clone()));
                    }
                }
                for node in &mut next.nodes {
                    node.selected = id.as_deref() == Some(node.id.as_str());
                }
            }

            GraphEdit::Connect { source, target } => {
                for id in [&source, &target] {
                    if !self.contains(id) {
                        return Err(EditRejection::UnknownNode(id.clone()));
                    }
                }
                if source == target {
                    return Err(EditRejection::SelfConnection(source));
                }
                if self
                    .edges
                    .iter()
                    .any(|e| e.source == source && e.target == target)
                {
                    return Err(EditRejection::DuplicateEdge {
                        source_id: source,
                        target_id: target,
                    });
                }
                next.edges.push(GraphEdge {
                    id: self.allocate_edge_id(&source, &target),
                    source,
                    target,
                });
            }

            GraphEdit::UpdateNode { id, patch } => {
                if let Some(size) = patch.size {
                    if !size.is_valid() {
                        return Err(EditRejection::InvalidSize {
                            id,
                            width: size.width,
                            height: size.height,
                        });
                    }
                }
                let node = next.node_mut(&id)?;
                if let Some(text) = patch.text {
                    node.data.text = text;
                }
                if let Some(size) = patch.size {
                    node.data.size = size;
                }
                if let Some(properties) = patch.properties {
                    node.data.properties = properties;
                }
            }

            GraphEdit::Clear => {
                next = Graph::default();
            }
        }

        Ok(next)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut GraphNode, EditRejection> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditRejection::UnknownNode(id.to_string()))
    }

    /// Ids may contain `-`, so `edge-{source}-{target}` alone can repeat.
    fn allocate_edge_id(&self, source: &str, target: &str) -> String {
        let base = format!("edge-{source}-{target}");
        let mut id = base.clone();
        let mut n = 1;
        while self.edges.iter().any(|e| e.id == id) {
            n += 1;
            id = format!("{base}-{n}");
        }
        id
    }

    fn allocate_id(&self, kind: ComponentKind) -> String {
        loop {
            let id = format!("{}-{:08x}", kind, rand::random::<u32>());
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
