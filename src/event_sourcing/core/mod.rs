// ============================================================================
// Event Sourcing Core - Generic Infrastructure Abstractions
// ============================================================================
//
// This module contains GENERIC, reusable event sourcing infrastructure
// that works with ANY domain aggregate.
//
// Key Principles:
// - No domain-specific code (no Order, Customer, Product, etc.)
// - Generic over aggregate and event types
// - Closed event unions, resolved through a compile-time-registered table
//   rather than runtime type introspection
//
// ============================================================================

pub mod aggregate;
pub mod event;
pub mod registry;

// Re-export core types for convenience
pub use aggregate::Aggregate;
pub use event::{DomainEvent, EventEnvelope, EventMetadata, EventPayload};
pub use registry::{EnvelopeFactory, EventTypeRegistry};
