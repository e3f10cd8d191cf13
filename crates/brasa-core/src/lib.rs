//! # brasa-core: Pure Quoting Logic for Brasa
//!
//! This crate is the **heart** of Brasa. It contains the quantity takeoff
//! and pricing logic for fire-protection quotes as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Brasa Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (React)                            │   │
//! │  │   Floor Plans ──► Manual Items ──► Budget Grid ──► Proposal    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Project JSON (camelCase)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brasa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ financial │  │  takeoff  │  │   │
//! │  │   │  Project  │  │  Decimal  │  │  ladder   │  │    BOM    │  │   │
//! │  │   │   Floor   │  │  parsing  │  │ discount  │  │  warnings │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            Persistence (localStorage / sync backend)            │   │
//! │  │              the same JSON snapshots, stored verbatim           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire-format domain types (Project, Floor, Kit, etc.)
//! - [`money`] - Decimal helpers and lenient JSON number parsing
//! - [`financial`] - The pricing ladder (BDI, profit margin, discount)
//! - [`takeoff`] - Composition engine: floors in, consolidated BOM out
//! - [`budget`] - Mutating budget operations on a Project
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic apart from freshly minted line ids
//! 2. **No I/O**: persistence and sync belong to the frontend, never here
//! 3. **Decimal Money**: every amount and quantity is a `Decimal`, never f64
//! 4. **Degrade, Don't Fail**: the takeoff reports warnings instead of erroring
//!
//! ## Example Usage
//!
//! ```rust
//! use brasa_core::{default_kits, Product, Project};
//! use rust_decimal::Decimal;
//!
//! let catalog = vec![Product {
//!     id: "p1".to_string(),
//!     nome: "Central de Alarme".to_string(),
//!     preco: Decimal::from(1000),
//!     imagem: None,
//!     is_local: None,
//! }];
//!
//! let mut project = Project::new();
//! let floor = project.add_floor();
//! floor.set_manual_item("Central de Alarme", Decimal::ONE);
//!
//! let warnings = project.recalculate(&catalog, &default_kits());
//! assert!(warnings.is_empty());
//!
//! // 1000 cost → +25% BDI → +15% margin → 1437.50 sale price
//! assert_eq!(project.financeiro.preco_venda_final, Decimal::new(14375, 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod budget;
pub mod error;
pub mod financial;
pub mod money;
pub mod takeoff;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use brasa_core::Project` instead of
// `use brasa_core::types::Project`

pub use error::{CoreError, CoreResult, ValidationError};
pub use financial::{
    apply_discount_by_percent, apply_discount_by_value, pre_discount_base, resolve_financials,
};
pub use takeoff::{
    compute_composition, find_active_kit, find_product_by_name, Composition, TakeoffWarning,
};
pub use types::*;

use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default BDI percentage for a new project (25%)
///
/// ## Business Reason
/// BDI (Benefícios e Despesas Indiretas) covers indirect costs and overhead
/// on Brazilian construction quotes. 25% is the house default; each project
/// can be tuned individually.
pub const DEFAULT_BDI_PERCENT: u32 = 25;

/// Default profit margin percentage for a new project (15%)
///
/// ## Business Reason
/// Applied on top of cost + BDI. The house default for standard contracts;
/// negotiated jobs adjust it per project.
pub const DEFAULT_PROFIT_MARGIN_PERCENT: u32 = 15;

/// Default proposal validity in days (30)
///
/// ## Business Reason
/// Material prices move; a proposal older than a month must be re-quoted
/// before acceptance.
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

// =============================================================================
// Seed Data
// =============================================================================

/// The kit catalog a fresh installation starts with.
///
/// One active kit for the `alarme` infrastructure tag: per meter of routed
/// alarm infrastructure, 1.2 m of conduit and 0.25 tee connectors, with a
/// 10% cut-and-waste allowance. Real installations replace this from the
/// kit editor; it exists so a first takeoff produces something.
pub fn default_kits() -> Vec<Kit> {
    vec![Kit {
        id: "k1".to_string(),
        nome_kit: "Kit Infra Alarme Padrão".to_string(),
        tipo_infra: "alarme".to_string(),
        percentual_perda: Decimal::TEN,
        ativo: true,
        componentes: vec![
            KitComponent {
                produto_id: None,
                produto_nome: "Tubo Zincado 3/4".to_string(),
                fator_conversao: Decimal::new(12, 1),
                unidade: UnitKind::Meter,
            },
            KitComponent {
                produto_id: None,
                produto_nome: "Conexão Tê 3/4".to_string(),
                fator_conversao: Decimal::new(25, 2),
                unidade: UnitKind::Un,
            },
        ],
    }]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kits_pass_catalog_validation() {
        let kits = default_kits();

        assert!(validation::validate_kit_catalog(&kits).is_ok());
        assert_eq!(kits.len(), 1);
        assert!(kits[0].ativo);
        assert_eq!(kits[0].tipo_infra, "alarme");
        assert_eq!(kits[0].componentes.len(), 2);
    }

    #[test]
    fn test_default_kit_drives_the_anchor_takeoff() {
        // 37 m of alarme through the seed kit:
        //   conduit:  37 × 1.2  = 44.4  → +10% = 48.84  → ceil = 49
        //   tees:     37 × 0.25 = 9.25  → +10% = 10.175 → ceil = 11
        let mut project = Project::new();
        let floor = project.add_floor();
        floor.add_infra("alarme");
        floor.set_infra_length("alarme", Decimal::from(37));

        let catalog = vec![
            Product {
                id: "p1".to_string(),
                nome: "Tubo Zincado 3/4".to_string(),
                preco: Decimal::from(10),
                imagem: None,
                is_local: None,
            },
            Product {
                id: "p2".to_string(),
                nome: "Conexão Tê 3/4".to_string(),
                preco: Decimal::from(2),
                imagem: None,
                is_local: None,
            },
        ];

        let warnings = project.recalculate(&catalog, &default_kits());

        assert!(warnings.is_empty());
        let conduit = project
            .orcamento_itens
            .iter()
            .find(|l| l.produto_nome == "Tubo Zincado 3/4")
            .unwrap();
        let tees = project
            .orcamento_itens
            .iter()
            .find(|l| l.produto_nome == "Conexão Tê 3/4")
            .unwrap();
        assert_eq!(conduit.qtd_final, Decimal::from(49));
        assert_eq!(tees.qtd_final, Decimal::from(11));
    }
}
