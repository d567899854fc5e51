//! Message dispatch: the handler registry and the per-frame dispatcher.
//!
//! ```text
//! frame ──► Dispatcher ──► HandlerRegistry::resolve(type) ──► MessageHandler
//!               │                                                  │
//!               └──────────── error envelope ◄── failure ──────────┘
//! ```

pub mod dispatcher;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use registry::{HandlerRegistry, MessageHandler};
