//! Error types for nickel operations.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors that can occur while querying or mutating a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),

    #[error("selector {0:?} matched no elements")]
    EmptyResult(String),

    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("cannot insert node {node} relative to {target}: node contains target")]
    HierarchyRequest { node: NodeId, target: NodeId },

    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("invalid inject position: {0:?}")]
    InvalidPosition(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
