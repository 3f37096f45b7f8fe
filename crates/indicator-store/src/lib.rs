//! Indicator Store - storage collaborators for the indicator engine
//!
//! This crate provides:
//! - Async storage traits for indicators, measurements, success factors and
//!   CSF links, plus an in-memory backend
//! - The audit context consulted for "current user" and "current time"
//! - [`IndicatorService`], which runs engine rules against a store

pub mod audit;
pub mod dataset;
pub mod error;
pub mod memory;
pub mod service;
pub mod traits;

pub use audit::{AuditContext, FixedAuditContext, SystemAuditContext};
pub use dataset::Dataset;
pub use error::{Result, ServiceError, StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use service::{FactorRollUp, IndicatorService, PolicyIssue, Removal};
pub use traits::{IndicatorStore, LinkStore, MeasurementStore, Store, SuccessFactorStore};
