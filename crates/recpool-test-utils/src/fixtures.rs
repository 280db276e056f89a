//! Graph-shaped record fixtures.
//!
//! - [`Vertex`]: a 2-D point with a head-of-list link into an edge pool.
//! - [`Edge`]: source and target links declared adjacently so they can
//!   be read as one 8-byte unit, plus an intrusive next-out link.
//! - [`TreeNode`]: a k-d tree node with coordinates first (so the double
//!   medium exposes them packed) and two child links.
//!
//! Every factory resets the record's links to "none" on allocation.

use recpool_arena::Medium;
use recpool_core::{ConfigError, Field, IndexField, RecordLayout, RecordLayoutBuilder, RecordWrite};
use recpool_pool::{ObjectPool, PoolConfig, Proxy, ProxyFactory, Slot};

macro_rules! proxy_newtype {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(Slot);

        impl Proxy for $name {
            fn slot(&self) -> &Slot {
                &self.0
            }

            fn slot_mut(&mut self) -> &mut Slot {
                &mut self.0
            }
        }
    };
}

proxy_newtype!(Vertex);
proxy_newtype!(Edge);
proxy_newtype!(TreeNode);

// ── Vertex ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct VertexFields {
    pub x: Field<f64>,
    pub y: Field<f64>,
    pub first_edge: IndexField,
    pub degree: Field<i32>,
}

impl VertexFields {
    pub fn declare() -> (RecordLayout, Self) {
        let mut b = RecordLayoutBuilder::new();
        let fields = Self {
            x: b.double_field(),
            y: b.double_field(),
            first_edge: b.index_field(),
            degree: b.int_field(),
        };
        (b.build(), fields)
    }
}

pub struct VertexFactory {
    pub fields: VertexFields,
}

impl ProxyFactory<Vertex> for VertexFactory {
    fn create_ref(&self, slot: Slot) -> Vertex {
        Vertex(slot)
    }

    fn set_to_uninitialized_state<W: RecordWrite>(&self, record: &mut W) {
        record.set_index(self.fields.first_edge, None);
        record.set(self.fields.degree, 0);
    }
}

pub type VertexPool<M> = ObjectPool<Vertex, VertexFactory, M>;

pub fn vertex_pool<M: Medium>(
    config: PoolConfig,
    medium: M,
) -> Result<(VertexPool<M>, VertexFields), ConfigError> {
    let (layout, fields) = VertexFields::declare();
    let pool = ObjectPool::new(config, layout, VertexFactory { fields }, medium)?;
    Ok((pool, fields))
}

// ── Edge ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct EdgeFields {
    pub source: IndexField,
    pub target: IndexField,
    pub next_out: IndexField,
    pub weight: Field<f32>,
}

impl EdgeFields {
    pub fn declare() -> (RecordLayout, Self) {
        let mut b = RecordLayoutBuilder::new();
        let fields = Self {
            source: b.index_field(),
            target: b.index_field(),
            next_out: b.index_field(),
            weight: b.float_field(),
        };
        (b.build(), fields)
    }
}

pub struct EdgeFactory {
    pub fields: EdgeFields,
}

impl ProxyFactory<Edge> for EdgeFactory {
    fn create_ref(&self, slot: Slot) -> Edge {
        Edge(slot)
    }

    fn set_to_uninitialized_state<W: RecordWrite>(&self, record: &mut W) {
        record.set_index(self.fields.source, None);
        record.set_index(self.fields.target, None);
        record.set_index(self.fields.next_out, None);
    }
}

pub type EdgePool<M> = ObjectPool<Edge, EdgeFactory, M>;

pub fn edge_pool<M: Medium>(
    config: PoolConfig,
    medium: M,
) -> Result<(EdgePool<M>, EdgeFields), ConfigError> {
    let (layout, fields) = EdgeFields::declare();
    let pool = ObjectPool::new(config, layout, EdgeFactory { fields }, medium)?;
    Ok((pool, fields))
}

// ── TreeNode ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct TreeNodeFields {
    pub x: Field<f64>,
    pub y: Field<f64>,
    pub left: IndexField,
    pub right: IndexField,
    pub split_dim: Field<i8>,
}

impl TreeNodeFields {
    pub fn declare() -> (RecordLayout, Self) {
        let mut b = RecordLayoutBuilder::new();
        let fields = Self {
            x: b.double_field(),
            y: b.double_field(),
            left: b.index_field(),
            right: b.index_field(),
            split_dim: b.byte_field(),
        };
        (b.build(), fields)
    }
}

pub struct TreeNodeFactory {
    pub fields: TreeNodeFields,
}

impl ProxyFactory<TreeNode> for TreeNodeFactory {
    fn create_ref(&self, slot: Slot) -> TreeNode {
        TreeNode(slot)
    }

    fn set_to_uninitialized_state<W: RecordWrite>(&self, record: &mut W) {
        record.set_index(self.fields.left, None);
        record.set_index(self.fields.right, None);
    }
}

pub type TreePool<M> = ObjectPool<TreeNode, TreeNodeFactory, M>;

pub fn tree_pool<M: Medium>(
    config: PoolConfig,
    medium: M,
) -> Result<(TreePool<M>, TreeNodeFields), ConfigError> {
    let (layout, fields) = TreeNodeFields::declare();
    let pool = ObjectPool::new(config, layout, TreeNodeFactory { fields }, medium)?;
    Ok((pool, fields))
}
