//! # Validation Module
//!
//! Input validation for catalog and floor-plan data entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  ├── Business rule validation before a catalog/project save           │
//! │  └── Kit catalog consistency (duplicate active tags)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Lenient deserialization (money module)                       │
//! │  └── Whatever was stored anyway still loads without panicking          │
//! │                                                                         │
//! │  Values that fail here can still EXIST in old snapshots; validation    │
//! │  guards new writes, it does not reject historical data                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Error `field` values use the wire spelling (camelCase) so the frontend
//! can map a failure straight onto the offending form input.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::Kit;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product display name.
///
/// The name is also the consolidation key in the composition engine, so
/// an empty one would merge unrelated lines together.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use brasa_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Sirene Audiovisual 24V").is_ok());
/// assert!(validate_product_name("").is_err());
/// assert!(validate_product_name(&"A".repeat(300)).is_err());
/// ```
pub fn validate_product_name(nome: &str) -> ValidationResult<()> {
    let nome = nome.trim();

    if nome.is_empty() {
        return Err(ValidationError::Required {
            field: "produtoNome".to_string(),
        });
    }

    if nome.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "produtoNome".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (items quoted at cost elsewhere, or placeholders)
///
/// ## Example
/// ```rust
/// use brasa_core::validation::validate_price;
/// use rust_decimal::Decimal;
///
/// assert!(validate_price(Decimal::new(1099, 2)).is_ok()); // R$ 10,99
/// assert!(validate_price(Decimal::ZERO).is_ok());
/// assert!(validate_price(Decimal::new(-100, 2)).is_err());
/// ```
pub fn validate_price(preco: Decimal) -> ValidationResult<()> {
    if preco < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "preco".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage field (BDI, profit margin, loss, discount).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - No upper bound: BDI above 100% is unusual but legitimate, and a
///   discount above 100% merely clamps the final price to zero
pub fn validate_percentage(percentual: Decimal) -> ValidationResult<()> {
    if percentual < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "percentual".to_string(),
        });
    }

    Ok(())
}

/// Validates a kit component's conversion factor (units per meter).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed: it disables the component without deleting it
pub fn validate_conversion_factor(fator: Decimal) -> ValidationResult<()> {
    if fator < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "fatorConversao".to_string(),
        });
    }

    Ok(())
}

/// Validates a metered infrastructure length.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is the state of a freshly added run before measurement
pub fn validate_metragem(metragem: Decimal) -> ValidationResult<()> {
    if metragem < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "metragem".to_string(),
        });
    }

    Ok(())
}

/// Validates a manually entered item quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Fractional values are fine (2.5 m of hose)
pub fn validate_quantity(quantidade: Decimal) -> ValidationResult<()> {
    if quantidade < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantidade".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates that no two ACTIVE kits claim the same infrastructure tag.
///
/// ## Why Only Active Kits?
/// The engine resolves a tag to the first active kit, so duplicate tags on
/// active kits make the outcome order-dependent. Inactive duplicates are
/// harmless drafts and commonly exist (an old kit kept for reference next
/// to its replacement).
///
/// ## Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Kit Editor: Save Catalog                                               │
/// │                                                                         │
/// │  validate_kit_catalog(&kits) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       ├── two active kits share tipoInfra? → Error: Duplicate          │
/// │       │                                                                 │
/// │       └── OK → Persist catalog                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_kit_catalog(kits: &[Kit]) -> ValidationResult<()> {
    let mut seen: Vec<&str> = Vec::new();

    for kit in kits.iter().filter(|k| k.ativo) {
        if seen.contains(&kit.tipo_infra.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "tipoInfra".to_string(),
                value: kit.tipo_infra.clone(),
            });
        }
        seen.push(&kit.tipo_infra);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
