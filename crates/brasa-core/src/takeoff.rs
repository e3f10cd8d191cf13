//! # Composition Engine
//!
//! Turns a project's floors into a consolidated, priced bill of materials.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_composition                                │
//! │                                                                         │
//! │  Step 1: Manual items                                                   │
//! │    floors → itens_centrais → price by exact name → merge by name        │
//! │                                                                         │
//! │  Step 2: Infrastructure                                                 │
//! │    floors → infraestruturas → Σ metragem per tag (first-encounter       │
//! │    order) → first ACTIVE kit per tag → per component:                   │
//! │      base = total × fator                                               │
//! │      with_loss = base × (1 + perda/100)                                 │
//! │      final = ceil(with_loss)          ◄── loss BEFORE ceiling           │
//! │    → merge into the same line list                                      │
//! │                                                                         │
//! │  Step 3: Cost roll-up                                                   │
//! │    custo_materiais = Σ custo_total → financial ladder (§ financial)     │
//! │                                                                         │
//! │  Output: { items, financial, warnings }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degradation, not failure
//! The engine never errors: a name missing from the catalog prices at
//! zero, an infrastructure tag with no active kit produces no line. Both
//! outcomes are reported on the side as [`TakeoffWarning`]s so the caller
//! can show them; the BOM itself is unaffected by the warnings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::financial::resolve_financials;
use crate::money::{percent_of, round_up};
use crate::types::{BudgetItem, FinancialSummary, ItemOrigin, Kit, Product, Project};

// =============================================================================
// Lookups
// =============================================================================

/// The one catalog join: exact display-name string equality.
///
/// No normalization of case, whitespace or accents is applied; a mismatch
/// of any kind yields `None` and the caller prices the line at zero. Keep
/// every name lookup behind this function so the join strategy can change
/// in one place.
#[inline]
pub fn find_product_by_name<'a>(catalog: &'a [Product], nome: &str) -> Option<&'a Product> {
    catalog.iter().find(|p| p.nome == nome)
}

/// First ACTIVE kit owning an infrastructure tag, in catalog order.
///
/// If several active kits claim the same tag the first one wins; the kit
/// editor can surface that conflict via
/// [`crate::validation::validate_kit_catalog`].
#[inline]
pub fn find_active_kit<'a>(kits: &'a [Kit], tipo: &str) -> Option<&'a Kit> {
    kits.iter().find(|k| k.ativo && k.tipo_infra == tipo)
}

// =============================================================================
// Result Types
// =============================================================================

/// Output of one engine run.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Consolidated BOM lines: manual-origin lines first in the order
    /// first encountered across floors, then calculated-origin lines in
    /// the order their infrastructure tags were first encountered.
    pub items: Vec<BudgetItem>,

    /// The project's ladder refreshed with the new material cost;
    /// percentages and discount fields untouched.
    pub financial: FinancialSummary,

    /// Non-blocking diagnostics. Never affect `items` or `financial`.
    pub warnings: Vec<TakeoffWarning>,
}

/// Something the engine priced at zero or dropped while degrading
/// gracefully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TakeoffWarning {
    /// Metered length exists for this tag but no active kit converts it;
    /// the length is unaccounted for in the BOM.
    #[serde(rename_all = "camelCase")]
    UnmatchedInfra {
        tipo: String,
        #[ts(type = "number")]
        metragem_total: Decimal,
    },

    /// A manual item or kit component references a name the catalog does
    /// not carry; its lines are priced at zero.
    #[serde(rename_all = "camelCase")]
    UnknownProduct { produto_nome: String },
}

// =============================================================================
// Engine
// =============================================================================

/// Derives the consolidated BOM and refreshed financial summary for a
/// project.
///
/// Pure: reads its three inputs, mutates nothing, returns new values.
/// Deterministic apart from the freshly minted line ids.
///
/// ## Merge rule
/// Lines are keyed by product display name. A name already in the list
/// absorbs further quantities into `qtd_sistema`/`qtd_final` and has its
/// total recomputed; its `origem` and unit cost stay as first created.
/// A line that merged both manual and kit-derived quantities therefore
/// reports only its first origin - a known ambiguity of the format.
pub fn compute_composition(project: &Project, catalog: &[Product], kits: &[Kit]) -> Composition {
    let mut lines: Vec<BudgetItem> = Vec::new();
    let mut warnings: Vec<TakeoffWarning> = Vec::new();

    // Step 1 - manual items, floor by floor
    for floor in &project.pavimentos {
        for item in &floor.itens_centrais {
            let preco = unit_price(catalog, &item.produto_nome, &mut warnings);
            merge_line(
                &mut lines,
                &item.produto_nome,
                item.quantidade,
                preco,
                ItemOrigin::Manual,
            );
        }
    }

    // Step 2 - total metered length per tag, first-encounter order
    let mut infra_totals: Vec<(String, Decimal)> = Vec::new();
    for floor in &project.pavimentos {
        for infra in &floor.infraestruturas {
            if let Some((_, total)) = infra_totals.iter_mut().find(|(t, _)| *t == infra.tipo) {
                *total += infra.metragem;
            } else {
                infra_totals.push((infra.tipo.clone(), infra.metragem));
            }
        }
    }

    for (tipo, total) in infra_totals {
        if total <= Decimal::ZERO {
            continue;
        }
        let kit = match find_active_kit(kits, &tipo) {
            Some(kit) => kit,
            None => {
                warn!(%tipo, metragem = %total, "no active kit for infrastructure tag, length dropped");
                warnings.push(TakeoffWarning::UnmatchedInfra {
                    tipo,
                    metragem_total: total,
                });
                continue;
            }
        };

        for comp in &kit.componentes {
            let preco = unit_price(catalog, &comp.produto_nome, &mut warnings);
            let base_qty = total * comp.fator_conversao;
            let with_loss = base_qty + percent_of(base_qty, kit.percentual_perda);
            let final_qty = round_up(with_loss);
            merge_line(
                &mut lines,
                &comp.produto_nome,
                final_qty,
                preco,
                ItemOrigin::Calculated,
            );
        }
    }

    // Step 3 - cost roll-up through the financial ladder
    let custo_materiais: Decimal = lines.iter().map(|l| l.custo_total).sum();
    let financial = resolve_financials(&FinancialSummary {
        custo_materiais,
        ..project.financeiro.clone()
    });

    debug!(
        lines = lines.len(),
        warnings = warnings.len(),
        custo_materiais = %custo_materiais,
        preco_venda_final = %financial.preco_venda_final,
        "composition computed"
    );

    Composition {
        items: lines,
        financial,
        warnings,
    }
}

/// Price a name from the catalog; a miss prices at zero and records one
/// warning per distinct name.
fn unit_price(
    catalog: &[Product],
    produto_nome: &str,
    warnings: &mut Vec<TakeoffWarning>,
) -> Decimal {
    match find_product_by_name(catalog, produto_nome) {
        Some(product) => product.preco,
        None => {
            warn!(produto = %produto_nome, "product not in catalog, priced at zero");
            let already = warnings.iter().any(|w| {
                matches!(w, TakeoffWarning::UnknownProduct { produto_nome: n } if n == produto_nome)
            });
            if !already {
                warnings.push(TakeoffWarning::UnknownProduct {
                    produto_nome: produto_nome.to_string(),
                });
            }
            Decimal::ZERO
        }
    }
}

/// Merge a quantity into the consolidated line list (see the merge rule on
/// [`compute_composition`]).
fn merge_line(
    lines: &mut Vec<BudgetItem>,
    produto_nome: &str,
    quantidade: Decimal,
    custo_unitario: Decimal,
    origem: ItemOrigin,
) {
    if let Some(line) = lines.iter_mut().find(|l| l.produto_nome == produto_nome) {
        line.qtd_sistema += quantidade;
        line.qtd_final += quantidade;
        line.recompute_total();
        return;
    }

    lines.push(BudgetItem {
        id: Uuid::new_v4().to_string(),
        produto_nome: produto_nome.to_string(),
        origem,
        qtd_sistema: quantidade,
        qtd_final: quantidade,
        custo_unitario,
        custo_total: quantidade * custo_unitario,
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
