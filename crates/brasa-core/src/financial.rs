//! # Financial Roll-up
//!
//! The pricing ladder: material cost → BDI → profit margin → discount →
//! final sale price.
//!
//! ## Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  custo_materiais                         1000.00                        │
//! │       │                                                                 │
//! │       ▼  bdi_valor = custo × bdi%         +250.00   (25%)               │
//! │  subtotal                                1250.00                        │
//! │       │                                                                 │
//! │       ▼  margem = subtotal × margem%      +187.50   (15%)               │
//! │  base price                              1437.50                        │
//! │       │                                                                 │
//! │       ▼  − desconto_valor                   −0.00                       │
//! │  preco_venda_final                       1437.50   (clamped at 0)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is total: no error paths, no panics, defined output
//! for every input. Discount reconciliation guards its one division.

use rust_decimal::Decimal;

use crate::money::percent_of;
use crate::types::FinancialSummary;

// =============================================================================
// Roll-up
// =============================================================================

/// Recomputes the derived fields of the ladder from its inputs.
///
/// ## Behavior
/// - `bdi_valor`, `margem_lucro_valor` and `preco_venda_final` are
///   recomputed in order; a negative result clamps to zero.
/// - The discount fields pass through untouched: the two representations
///   (absolute value vs. percentage) are interchangeable and only the
///   caller knows which one was just edited. Use
///   [`apply_discount_by_value`] / [`apply_discount_by_percent`] to edit
///   them consistently.
///
/// Pure and idempotent; calling it twice yields the same summary.
pub fn resolve_financials(summary: &FinancialSummary) -> FinancialSummary {
    let bdi_valor = percent_of(summary.custo_materiais, summary.bdi_percentual);
    let subtotal = summary.custo_materiais + bdi_valor;
    let margem_lucro_valor = percent_of(subtotal, summary.margem_lucro_percentual);
    let base_price = subtotal + margem_lucro_valor;
    let preco_venda_final = (base_price - summary.desconto_valor).max(Decimal::ZERO);

    FinancialSummary {
        bdi_valor,
        margem_lucro_valor,
        preco_venda_final,
        ..summary.clone()
    }
}

/// The amount a discount is measured against: cost + BDI + margin, taken
/// from the stored derived values.
#[inline]
pub fn pre_discount_base(summary: &FinancialSummary) -> Decimal {
    summary.custo_materiais + summary.bdi_valor + summary.margem_lucro_valor
}

// =============================================================================
// Discount Entry Points
// =============================================================================

/// The user edited the discount in reais.
///
/// Sets `desconto_valor`, derives the matching `desconto_percentual`
/// against the pre-discount base, and refreshes the ladder. A base of zero
/// (or less) derives a percentage of zero rather than dividing.
pub fn apply_discount_by_value(summary: &FinancialSummary, valor: Decimal) -> FinancialSummary {
    let base = pre_discount_base(summary);
    let percentual = if base > Decimal::ZERO {
        valor / base * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    resolve_financials(&FinancialSummary {
        desconto_valor: valor,
        desconto_percentual: percentual,
        ..summary.clone()
    })
}

/// The user edited the discount as a percentage.
///
/// Sets `desconto_percentual`, derives the matching `desconto_valor`
/// against the pre-discount base, and refreshes the ladder.
pub fn apply_discount_by_percent(summary: &FinancialSummary, percentual: Decimal) -> FinancialSummary {
    let valor = percent_of(pre_discount_base(summary), percentual);

    resolve_financials(&FinancialSummary {
        desconto_percentual: percentual,
        desconto_valor: valor,
        ..summary.clone()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn summary(custo: &str, bdi: &str, margem: &str, desconto: &str) -> FinancialSummary {
        resolve_financials(&FinancialSummary {
            custo_materiais: dec(custo),
            bdi_percentual: dec(bdi),
            margem_lucro_percentual: dec(margem),
            desconto_valor: dec(desconto),
            ..FinancialSummary::default()
        })
    }

    #[test]
    fn test_financial_chain_concrete() {
        let fin = summary("1000", "25", "15", "0");

        assert_eq!(fin.bdi_valor, dec("250"));
        assert_eq!(fin.margem_lucro_valor, dec("187.5"));
        assert_eq!(fin.preco_venda_final, dec("1437.5"));
    }

    #[test]
    fn test_roll_up_is_idempotent() {
        let once = summary("1000", "25", "15", "100");
        let twice = resolve_financials(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_discount_exceeding_base_clamps_to_zero() {
        let fin = summary("1000", "25", "15", "2000");
        assert_eq!(fin.preco_venda_final, Decimal::ZERO);
    }

    #[test]
    fn test_discount_fields_pass_through() {
        let fin = resolve_financials(&FinancialSummary {
            custo_materiais: dec("1000"),
            desconto_percentual: dec("10"),
            desconto_valor: dec("143.75"),
            ..FinancialSummary::default()
        });
        assert_eq!(fin.desconto_percentual, dec("10"));
        assert_eq!(fin.desconto_valor, dec("143.75"));
    }

    #[test]
    fn test_apply_discount_by_value_derives_percentage() {
        let fin = summary("1000", "25", "15", "0");
        // base = 1000 + 250 + 187.5 = 1437.5
        let fin = apply_discount_by_value(&fin, dec("143.75"));

        assert_eq!(fin.desconto_valor, dec("143.75"));
        assert_eq!(fin.desconto_percentual, dec("10"));
        assert_eq!(fin.preco_venda_final, dec("1293.75"));
    }

    #[test]
    fn test_apply_discount_by_percent_derives_value() {
        let fin = summary("1000", "25", "15", "0");
        let fin = apply_discount_by_percent(&fin, dec("10"));

        assert_eq!(fin.desconto_valor, dec("143.75"));
        assert_eq!(fin.preco_venda_final, dec("1293.75"));
    }

    #[test]
    fn test_discount_on_zero_base_coerces_percentage_to_zero() {
        let fin = summary("0", "25", "15", "0");
        let fin = apply_discount_by_value(&fin, dec("100"));

        assert_eq!(fin.desconto_valor, dec("100"));
        assert_eq!(fin.desconto_percentual, Decimal::ZERO);
        assert_eq!(fin.preco_venda_final, Decimal::ZERO);
    }

    #[test]
    fn test_zero_percentages_collapse_ladder() {
        let fin = summary("500", "0", "0", "0");
        assert_eq!(fin.bdi_valor, Decimal::ZERO);
        assert_eq!(fin.margem_lucro_valor, Decimal::ZERO);
        assert_eq!(fin.preco_venda_final, dec("500"));
    }
}
