//! # Error Types
//!
//! Domain-specific error types for brasa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brasa-core errors (this file)                                         │
//! │  ├── CoreError        - Budget editing rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Host application errors (out of tree)                                 │
//! │  └── persistence / network failures, surfaced as user alerts           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → host app → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The computation functions themselves (takeoff, financial roll-up) are
//! total and never return these: a missing product prices at zero, an
//! unmatched infrastructure tag is dropped, a zero denominator coerces to
//! zero. Errors exist only for editing rules a caller can actually violate.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, field name)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Budget editing errors.
///
/// These represent editing rule violations. They should be caught and
/// translated to user-friendly messages by the host application.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line-level override referenced a budget item id that is not in
    /// the project's bill of materials.
    #[error("Budget item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// A lump-sum material cost was entered while itemized budget lines
    /// exist.
    ///
    /// ## When This Occurs
    /// The material cost is either the sum of the itemized lines or a
    /// directly entered lump sum, never both. Clear the budget lines
    /// first ("Ir Direto para Proposta") to enter a lump sum.
    #[error("Material cost is derived from budget lines; clear them before entering a lump sum")]
    BudgetNotEmpty,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used by the catalog/kit editing collaborators before data reaches the
/// engine; the engine itself accepts every input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Duplicate value (e.g., two active kits claiming one infrastructure
    /// tag).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
