//! Core mapping engine for Blueprint
//!
//! Blueprint synchronizes the configuration of a content platform
//! (fields, sections, volumes, user groups, sites, global sets) between
//! a live instance and a portable declarative document, so configuration
//! can be version-controlled and replayed onto other instances.
//!
//! The crate implements the bidirectional mapping:
//!
//! - **Export**: live records → portable [`Definition`]s, free of
//!   instance-specific identifiers (handles instead of internal ids)
//! - **Import**: definitions → create/update/delete reconciliation
//!   against the live records, with per-record failure collection and a
//!   destructive force mode
//!
//! # Architecture
//!
//! ```text
//!              CLI / caller
//!                   |
//!               SyncEngine
//!                   |
//!            DataTypeRegistry
//!                   |
//!           RecordMapper (per type)
//!                   |
//!       Converter (per record variant)
//!          |                    |
//!   LayoutTransformer   ReferenceResolver
//! ```
//!
//! Storage itself belongs to the host platform, reached through the
//! [`Host`] trait; [`MemoryHost`] is the in-process implementation.

pub mod convert;
pub mod definition;
pub mod engine;
pub mod error;
pub mod host;
pub mod mapper;
pub mod record;
pub mod reference;
pub mod registry;
pub mod report;

pub use convert::{
    BlockFieldConverter, BlockTypeConverter, ConvertContext, Converter, ConverterSet,
    LayoutTransformer, ModelConverter, SourceTransformer, Strictness,
};
pub use definition::{
    Definition, Document, FieldLayoutDefinition, FieldLayoutTabDefinition, merge_override,
};
pub use engine::{ExportResult, ImportOptions, SyncEngine};
pub use error::{Error, Result};
pub use host::{Host, MemoryHost};
pub use mapper::RecordMapper;
pub use record::{FieldLayout, FieldLayoutTab, Record, SiteSetting, VOLATILE_ATTRIBUTES};
pub use reference::{RefCollection, RefKey, Reference, ReferenceResolver};
pub use registry::{DataTypeRegistry, Selection, Selector};
pub use report::{BatchResult, RecordFailure, Reporter, SyncReport};
