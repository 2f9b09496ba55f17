mod alias;
mod backend;
mod change_event;
mod config_store;
mod content_source;
mod document;
mod error;
mod event_handler;
mod index_definition;
mod index_manager;
mod queue_item;
mod queue_worker;
mod rebuild;
mod registry;
mod strategy;
mod task_processor;

pub use alias::*;
pub use backend::*;
pub use change_event::*;
pub use config_store::*;
pub use content_source::*;
pub use document::*;
pub use error::*;
pub use event_handler::*;
pub use index_definition::*;
pub use index_manager::*;
pub use queue_item::*;
pub use queue_worker::*;
pub use rebuild::*;
pub use registry::*;
pub use strategy::*;
pub use task_processor::*;
