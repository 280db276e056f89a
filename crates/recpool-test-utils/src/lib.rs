//! Test fixtures and mock types for recpool development.
//!
//! Provides graph-shaped record types ([`Vertex`], [`Edge`], [`TreeNode`])
//! with their layouts and factories, and a [`RecordingPropertyMap`] that
//! logs every registry callback it receives.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Mutex;

use recpool_pool::PropertyMap;

pub use fixtures::{
    edge_pool, tree_pool, vertex_pool, Edge, EdgeFactory, EdgeFields, EdgePool, TreeNode,
    TreeNodeFactory, TreeNodeFields, TreePool, Vertex, VertexFactory, VertexFields, VertexPool,
};

/// One callback received by a [`RecordingPropertyMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyEvent {
    Paused,
    Resumed,
    Created(usize),
    Deleted(usize),
}

/// Property map that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingPropertyMap {
    events: Mutex<Vec<PropertyEvent>>,
    pause_depth: AtomicIsize,
}

impl RecordingPropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event so far.
    pub fn events(&self) -> Vec<PropertyEvent> {
        self.lock().clone()
    }

    /// Indices reported as created, in order.
    pub fn created(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PropertyEvent::Created(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Indices reported as deleted, in order.
    pub fn deleted(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PropertyEvent::Deleted(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Whether more pauses than resumes have been received.
    pub fn is_paused(&self) -> bool {
        self.pause_depth.load(Ordering::SeqCst) > 0
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PropertyEvent>> {
        // Poisoned by a panicking test; the log is still valid.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: PropertyEvent) {
        self.lock().push(event);
    }
}

impl PropertyMap for RecordingPropertyMap {
    fn pause_listeners(&self) {
        self.pause_depth.fetch_add(1, Ordering::SeqCst);
        self.push(PropertyEvent::Paused);
    }

    fn resume_listeners(&self) {
        self.pause_depth.fetch_sub(1, Ordering::SeqCst);
        self.push(PropertyEvent::Resumed);
    }

    fn object_created(&self, index: usize) {
        self.push(PropertyEvent::Created(index));
    }

    fn object_deleted(&self, index: usize) {
        self.push(PropertyEvent::Deleted(index));
    }
}
