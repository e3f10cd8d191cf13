//! # Budget Editing
//!
//! Mutating operations on a [`Project`]'s budget: run the engine, override
//! individual lines, tune the commercial knobs, or bypass the takeoff
//! entirely with a lump-sum material cost.
//!
//! ## The One Invariant
//! Every operation here leaves the project in a state where
//! `custo_total = qtd_final × custo_unitario` holds on every line and the
//! financial ladder reflects the current lines. Callers never recompute
//! anything by hand; they call the operation and read the result.
//!
//! ## Overrides Are Transient
//! Line overrides survive any number of financial adjustments but are
//! discarded by the next [`Project::recalculate`], which rebuilds the line
//! list from the floors. That is deliberate: the floors are the source of
//! truth, overrides are a last-mile correction on top of one engine run.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::financial::{
    apply_discount_by_percent, apply_discount_by_value, resolve_financials,
};
use crate::takeoff::{compute_composition, TakeoffWarning};
use crate::types::{Kit, Product, Project, ProjectStatus};

impl Project {
    // =========================================================================
    // Engine Entry Point
    // =========================================================================

    /// Runs the composition engine and installs its output on the project.
    ///
    /// Replaces `orcamento_itens` wholesale (discarding any line
    /// overrides), refreshes `financeiro`, and moves the project to
    /// [`ProjectStatus::Calculated`]. Returns the engine's warnings so the
    /// caller can surface them.
    pub fn recalculate(&mut self, catalog: &[Product], kits: &[Kit]) -> Vec<TakeoffWarning> {
        let composition = compute_composition(self, catalog, kits);

        self.orcamento_itens = composition.items;
        self.financeiro = composition.financial;
        self.status = ProjectStatus::Calculated;

        debug!(
            project = %self.id,
            lines = self.orcamento_itens.len(),
            "project recalculated"
        );

        composition.warnings
    }

    // =========================================================================
    // Line Overrides
    // =========================================================================

    /// Replaces the final quantity of one budget line.
    ///
    /// `qtd_sistema` keeps the engine's figure so the delta stays visible
    /// in the UI. The line total and the financial ladder are refreshed.
    pub fn override_item_quantity(&mut self, item_id: &str, qtd_final: Decimal) -> CoreResult<()> {
        let line = self
            .orcamento_itens
            .iter_mut()
            .find(|l| l.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound {
                item_id: item_id.to_string(),
            })?;

        line.qtd_final = qtd_final;
        line.recompute_total();
        self.resum_material_cost();
        Ok(())
    }

    /// Replaces the unit cost of one budget line.
    ///
    /// Used when the quoted price differs from the catalog price. The line
    /// total and the financial ladder are refreshed.
    pub fn override_item_unit_cost(&mut self, item_id: &str, custo_unitario: Decimal) -> CoreResult<()> {
        let line = self
            .orcamento_itens
            .iter_mut()
            .find(|l| l.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound {
                item_id: item_id.to_string(),
            })?;

        line.custo_unitario = custo_unitario;
        line.recompute_total();
        self.resum_material_cost();
        Ok(())
    }

    /// Re-derives `custo_materiais` from the current lines and pushes it
    /// through the ladder.
    fn resum_material_cost(&mut self) {
        self.financeiro.custo_materiais =
            self.orcamento_itens.iter().map(|l| l.custo_total).sum();
        self.financeiro = resolve_financials(&self.financeiro);
    }

    // =========================================================================
    // Commercial Knobs
    // =========================================================================

    /// Sets the BDI percentage and refreshes the ladder.
    ///
    /// The stored `desconto_valor` is kept as-is, so a previously granted
    /// discount keeps its currency value and its percentage drifts.
    pub fn set_bdi_percent(&mut self, percentual: Decimal) {
        self.financeiro.bdi_percentual = percentual;
        self.financeiro = resolve_financials(&self.financeiro);
    }

    /// Sets the profit-margin percentage and refreshes the ladder.
    pub fn set_profit_margin_percent(&mut self, percentual: Decimal) {
        self.financeiro.margem_lucro_percentual = percentual;
        self.financeiro = resolve_financials(&self.financeiro);
    }

    /// Grants a discount entered as a currency amount; the percentage is
    /// derived from the pre-discount base.
    pub fn set_discount_value(&mut self, valor: Decimal) {
        self.financeiro = apply_discount_by_value(&self.financeiro, valor);
    }

    /// Grants a discount entered as a percentage of the pre-discount base;
    /// the currency amount is derived.
    pub fn set_discount_percent(&mut self, percentual: Decimal) {
        self.financeiro = apply_discount_by_percent(&self.financeiro, percentual);
    }

    // =========================================================================
    // Lump-Sum Path
    // =========================================================================

    /// Enters a material cost directly, skipping the takeoff.
    ///
    /// Only legal while the budget has no lines; once lines exist, material
    /// cost is their sum and a direct entry would silently diverge from
    /// them. Clear the lines first (see [`Project::clear_budget_items`]).
    pub fn set_lump_sum_material_cost(&mut self, custo_materiais: Decimal) -> CoreResult<()> {
        if !self.orcamento_itens.is_empty() {
            return Err(CoreError::BudgetNotEmpty);
        }
        self.financeiro.custo_materiais = custo_materiais;
        self.financeiro = resolve_financials(&self.financeiro);
        Ok(())
    }

    /// Drops all budget lines, leaving `financeiro` untouched.
    ///
    /// The material cost goes stale until the next recalculation or
    /// lump-sum entry; this mirrors how the quoting screen behaves when
    /// switching to direct pricing.
    pub fn clear_budget_items(&mut self) {
        self.orcamento_itens.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Floor, FloorType, InfraMeter, ManualItem};
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(nome: &str, preco: &str) -> Product {
        Product {
            id: format!("p-{nome}"),
            nome: nome.to_string(),
            preco: dec(preco),
            imagem: None,
            is_local: None,
        }
    }

    /// One floor, ten units of a 100-cost product: material cost 1000.
    fn calculated_project() -> Project {
        let mut project = Project::new();
        project.pavimentos.push(Floor {
            id: Uuid::new_v4().to_string(),
            nome: "Pavimento 1".to_string(),
            tipo: FloorType::Tipo,
            referencia_prancha: String::new(),
            largura: Decimal::ZERO,
            comprimento: Decimal::ZERO,
            altura: dec("3"),
            itens_centrais: vec![ManualItem {
                id: Uuid::new_v4().to_string(),
                produto_nome: "Central de Alarme".to_string(),
                quantidade: dec("10"),
            }],
            infraestruturas: vec![InfraMeter {
                tipo: "alarme".to_string(),
                metragem: Decimal::ZERO,
            }],
        });
        let warnings = project.recalculate(&[product("Central de Alarme", "100")], &[]);
        assert!(warnings.is_empty());
        project
    }

    #[test]
    fn test_recalculate_installs_lines_and_status() {
        let project = calculated_project();

        assert_eq!(project.status, ProjectStatus::Calculated);
        assert_eq!(project.orcamento_itens.len(), 1);
        assert_eq!(project.financeiro.custo_materiais, dec("1000"));
        assert_eq!(project.financeiro.preco_venda_final, dec("1437.5"));
    }

    #[test]
    fn test_recalculate_discards_overrides() {
        let mut project = calculated_project();
        let id = project.orcamento_itens[0].id.clone();
        project.override_item_quantity(&id, dec("99")).unwrap();

        project.recalculate(&[product("Central de Alarme", "100")], &[]);

        assert_eq!(project.orcamento_itens[0].qtd_final, dec("10"));
        assert_eq!(project.financeiro.custo_materiais, dec("1000"));
    }

    #[test]
    fn test_override_quantity_updates_line_and_ladder() {
        let mut project = calculated_project();
        let id = project.orcamento_itens[0].id.clone();

        project.override_item_quantity(&id, dec("12")).unwrap();

        let line = &project.orcamento_itens[0];
        assert_eq!(line.qtd_sistema, dec("10"));
        assert_eq!(line.qtd_final, dec("12"));
        assert_eq!(line.custo_total, dec("1200"));
        assert_eq!(project.financeiro.custo_materiais, dec("1200"));
        assert_eq!(project.financeiro.preco_venda_final, dec("1725"));
    }

    #[test]
    fn test_override_unit_cost_updates_line_and_ladder() {
        let mut project = calculated_project();
        let id = project.orcamento_itens[0].id.clone();

        project.override_item_unit_cost(&id, dec("90")).unwrap();

        let line = &project.orcamento_itens[0];
        assert_eq!(line.custo_unitario, dec("90"));
        assert_eq!(line.custo_total, dec("900"));
        assert_eq!(project.financeiro.custo_materiais, dec("900"));
    }

    #[test]
    fn test_override_unknown_id_is_an_error() {
        let mut project = calculated_project();

        let err = project.override_item_quantity("nope", dec("1")).unwrap_err();

        assert!(matches!(err, CoreError::ItemNotFound { item_id } if item_id == "nope"));
    }

    #[test]
    fn test_lump_sum_requires_empty_budget() {
        let mut project = calculated_project();

        let err = project.set_lump_sum_material_cost(dec("5000")).unwrap_err();
        assert!(matches!(err, CoreError::BudgetNotEmpty));

        project.clear_budget_items();
        project.set_lump_sum_material_cost(dec("5000")).unwrap();

        assert_eq!(project.financeiro.custo_materiais, dec("5000"));
        assert_eq!(project.financeiro.preco_venda_final, dec("7187.5"));
    }

    #[test]
    fn test_clear_budget_items_leaves_financials() {
        let mut project = calculated_project();

        project.clear_budget_items();

        assert!(project.orcamento_itens.is_empty());
        // stale by design until the next recalculation or lump-sum entry
        assert_eq!(project.financeiro.custo_materiais, dec("1000"));
    }

    #[test]
    fn test_set_bdi_keeps_discount_value() {
        let mut project = calculated_project();
        project.set_discount_value(dec("143.75"));
        assert_eq!(project.financeiro.desconto_percentual, dec("10"));

        project.set_bdi_percent(dec("30"));

        // 1000 + 300 = 1300 + 195 = 1495, minus the unchanged 143.75
        assert_eq!(project.financeiro.bdi_valor, dec("300"));
        assert_eq!(project.financeiro.desconto_valor, dec("143.75"));
        assert_eq!(project.financeiro.preco_venda_final, dec("1351.25"));
    }

    #[test]
    fn test_set_profit_margin_percent() {
        let mut project = calculated_project();

        project.set_profit_margin_percent(dec("20"));

        assert_eq!(project.financeiro.margem_lucro_valor, dec("250"));
        assert_eq!(project.financeiro.preco_venda_final, dec("1500"));
    }

    #[test]
    fn test_discount_setters_mirror_each_other() {
        let mut by_value = calculated_project();
        let mut by_percent = calculated_project();

        by_value.set_discount_value(dec("143.75"));
        by_percent.set_discount_percent(dec("10"));

        assert_eq!(by_value.financeiro.desconto_percentual, dec("10"));
        assert_eq!(by_percent.financeiro.desconto_valor, dec("143.75"));
        assert_eq!(by_value.financeiro.preco_venda_final, dec("1293.75"));
        assert_eq!(by_percent.financeiro.preco_venda_final, dec("1293.75"));
    }

    #[test]
    fn test_oversized_discount_clamps_price_to_zero() {
        let mut project = calculated_project();

        project.set_discount_value(dec("2000"));

        assert_eq!(project.financeiro.preco_venda_final, Decimal::ZERO);
    }
}
