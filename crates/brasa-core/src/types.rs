//! # Domain Types
//!
//! Core domain types for the quoting engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐      ┌─────────────────┐     ┌─────────────────┐  │
//! │  │    Project      │      │      Kit        │     │    Product      │  │
//! │  │  ─────────────  │      │  ─────────────  │     │  ─────────────  │  │
//! │  │  pavimentos ────┼──┐   │  tipo_infra     │     │  nome (join key)│  │
//! │  │  orcamento_itens│  │   │  percentual_perda     │  preco          │  │
//! │  │  financeiro     │  │   │  componentes ───┼──►  KitComponent      │  │
//! │  └─────────────────┘  │   └─────────────────┘    (produto_nome,     │  │
//! │                       │                           fator_conversao)  │  │
//! │  ┌─────────────────┐  │                                              │  │
//! │  │     Floor       │◄─┘   ┌─────────────────┐     ┌─────────────────┐  │
//! │  │  ─────────────  │      │   BudgetItem    │     │FinancialSummary │  │
//! │  │  itens_centrais─┼──► ManualItem          │     │  ─────────────  │  │
//! │  │  infraestruturas┼──► InfraMeter          │     │  custo → BDI →  │  │
//! │  └─────────────────┘      │  qtd/custo      │     │  margem → preço │  │
//! │                           └─────────────────┘     └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Projects travel as JSON snapshots written by the existing frontend, so
//! every struct keeps the frontend's Portuguese field names (camelCase on the
//! wire via serde) and every numeric field deserializes leniently: stored
//! records can hold numbers, numeric strings, empty strings or null.
//!
//! ## Dual-Key Identity Pattern
//! - `id`: opaque string - UUID v4 for rows minted here; legacy rows hold
//!   short random ids and are accepted as-is.
//! - `nome`/`produto_nome`: the display name is the business key - the
//!   catalog join used by the takeoff is exact-name string equality.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{DEFAULT_BDI_PERCENT, DEFAULT_PROFIT_MARGIN_PERCENT, DEFAULT_VALIDITY_DAYS};

// =============================================================================
// Product
// =============================================================================

/// A catalog entry. Read-only to the engine; the catalog CRUD collaborator
/// owns its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4 for new rows; legacy rows hold short ids).
    pub id: String,

    /// Display name; the exact-match join key used by manual items and kit
    /// components. NOT the identifier.
    pub nome: String,

    /// Unit sale price (non-negative).
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub preco: Decimal,

    /// Optional product image URL.
    pub imagem: Option<String>,

    /// Present on rows that only exist in the offline fallback store.
    pub is_local: Option<bool>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record, referenced by quotes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub nome: String,
    pub documento: String,
    pub contato: String,
    pub email: String,
    pub endereco: String,
    pub is_local: Option<bool>,
}

// =============================================================================
// Kit
// =============================================================================

/// A named conversion recipe for one infrastructure-type tag.
///
/// ## Invariant
/// At most one *active* kit should own a given `tipo_infra`. The engine
/// does not enforce this: it uses the first active match. Use
/// [`crate::validation::validate_kit_catalog`] in the kit editor to surface
/// conflicts before they silently pick a winner.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: String,

    /// Display name shown in the kit picker.
    pub nome_kit: String,

    /// Infrastructure-type tag this recipe converts; matched exactly
    /// against a floor's infrastructure runs (consistent casing/spelling is
    /// the caller's responsibility).
    pub tipo_infra: String,

    /// Loss percentage applied multiplicatively before rounding
    /// (10 = 10% extra material for offcuts and bends).
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub percentual_perda: Decimal,

    /// Only active kits participate in the takeoff.
    pub ativo: bool,

    /// Recipe lines, in order.
    #[serde(default)]
    pub componentes: Vec<KitComponent>,
}

/// One line of a kit's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct KitComponent {
    /// Optional catalog id; the computation joins by name, not id.
    pub produto_id: Option<String>,

    /// Catalog join key (exact display-name match).
    pub produto_nome: String,

    /// Quantity of this component needed per metered unit of
    /// infrastructure.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub fator_conversao: Decimal,

    /// Advisory unit kind; not consumed by the computation.
    /// Legacy kit rows may lack it, so it defaults to `UN`.
    #[serde(default)]
    pub unidade: UnitKind,
}

/// Unit kind of a kit component: discrete count or continuous length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UnitKind {
    /// Discrete pieces ("1 tee every 4 meters").
    #[serde(rename = "UN")]
    Un,
    /// Linear consumption per meter (conduit, cabling).
    #[serde(rename = "M")]
    Meter,
}

impl Default for UnitKind {
    fn default() -> Self {
        UnitKind::Un
    }
}

// =============================================================================
// Floor
// =============================================================================

/// One physical level of the building being quoted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: String,
    pub nome: String,
    pub tipo: FloorType,

    /// Drawing sheet reference (advisory).
    pub referencia_prancha: String,

    /// Physical dimensions in meters. Advisory only; the takeoff consumes
    /// the metered infrastructure runs, not these.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub largura: Decimal,
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub comprimento: Decimal,
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub altura: Decimal,

    /// Central/manual equipment entered directly on this floor.
    #[serde(default)]
    pub itens_centrais: Vec<ManualItem>,

    /// Named infrastructure runs and their metered lengths.
    /// Missing on records from before infrastructure support.
    #[serde(default)]
    pub infraestruturas: Vec<InfraMeter>,
}

/// Floor type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FloorType {
    Garagem,
    Pilotis,
    Tipo,
    Cobertura,
    Subsolo,
    #[serde(rename = "Térreo")]
    Terreo,
}

impl Default for FloorType {
    fn default() -> Self {
        FloorType::Tipo
    }
}

/// A directly specified equipment line on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ManualItem {
    pub id: String,

    /// Catalog join key (exact display-name match).
    pub produto_nome: String,

    /// May be fractional, typically integral. Never rounded.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub quantidade: Decimal,
}

/// A named infrastructure run and its metered length on one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InfraMeter {
    /// Infrastructure-type tag; matched exactly against kits' `tipo_infra`.
    pub tipo: String,

    /// Total length in meters on this floor. Lengths add across floors.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub metragem: Decimal,
}

// =============================================================================
// Budget Item
// =============================================================================

/// One consolidated, priced line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,

    /// Catalog display name this line was consolidated under.
    pub produto_nome: String,

    /// Which aggregation step first created the line. A line that later
    /// absorbed quantities from the other step keeps this first-seen tag.
    pub origem: ItemOrigin,

    /// Quantity the engine computed, before any human override.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub qtd_sistema: Decimal,

    /// Quantity actually billed. Starts equal to `qtd_sistema`; may be
    /// overridden line by line after calculation.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub qtd_final: Decimal,

    /// Unit cost snapshotted from the catalog at calculation time.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub custo_unitario: Decimal,

    /// `qtd_final * custo_unitario`; restored after every mutation.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub custo_total: Decimal,
}

impl BudgetItem {
    /// Restores the `custo_total == qtd_final * custo_unitario` invariant.
    #[inline]
    pub fn recompute_total(&mut self) {
        self.custo_total = self.qtd_final * self.custo_unitario;
    }
}

/// Which aggregation step created a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ItemOrigin {
    /// Entered directly on a floor as central equipment.
    #[serde(rename = "manual")]
    Manual,
    /// Derived from an infrastructure run through a kit recipe.
    #[serde(rename = "calculado")]
    Calculated,
}

// =============================================================================
// Financial Summary
// =============================================================================

/// The pricing ladder for a project.
///
/// ## Ladder
/// ```text
/// custo_materiais ──► + BDI ──► + margem ──► − desconto ──► preco_venda_final
///                     (bdi_valor)  (margem_lucro_valor)      (clamped at 0)
/// ```
///
/// The derived fields (`bdi_valor`, `margem_lucro_valor`,
/// `preco_venda_final`) are stored alongside the inputs so a persisted
/// proposal redisplays without recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// Sum of all budget-line totals, or a manually entered lump sum when
    /// the budget has no lines.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub custo_materiais: Decimal,

    /// Overhead (BDI) percentage.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub bdi_percentual: Decimal,

    /// Derived: `custo_materiais * bdi_percentual / 100`.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub bdi_valor: Decimal,

    /// Profit margin percentage, applied on top of cost + BDI.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub margem_lucro_percentual: Decimal,

    /// Derived: `(custo_materiais + bdi_valor) * margem_lucro_percentual / 100`.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub margem_lucro_valor: Decimal,

    /// Discount as a percentage of the pre-discount base. Kept consistent
    /// with `desconto_valor` by the discount entry points ("last edited
    /// wins"); may go stale when BDI/margin change until the next discount
    /// edit.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub desconto_percentual: Decimal,

    /// Discount as an absolute amount; the roll-up subtracts this one.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub desconto_valor: Decimal,

    /// `max(0, pre-discount base − desconto_valor)`.
    #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
    #[ts(type = "number")]
    pub preco_venda_final: Decimal,
}

impl Default for FinancialSummary {
    /// A fresh ladder: zeros except the firm's standard BDI and margin.
    fn default() -> Self {
        FinancialSummary {
            custo_materiais: Decimal::ZERO,
            bdi_percentual: Decimal::from(DEFAULT_BDI_PERCENT),
            bdi_valor: Decimal::ZERO,
            margem_lucro_percentual: Decimal::from(DEFAULT_PROFIT_MARGIN_PERCENT),
            margem_lucro_valor: Decimal::ZERO,
            desconto_percentual: Decimal::ZERO,
            desconto_valor: Decimal::ZERO,
            preco_venda_final: Decimal::ZERO,
        }
    }
}

// =============================================================================
// Project Status
// =============================================================================

/// Lifecycle of a quote. Serialized values match the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProjectStatus {
    /// Floors are still being edited.
    #[serde(rename = "Rascunho")]
    Draft,
    /// The engine has produced a bill of materials.
    #[serde(rename = "Calculado")]
    Calculated,
    /// Proposal sent to the customer.
    #[serde(rename = "Enviado")]
    Sent,
    /// Customer approved the proposal.
    #[serde(rename = "Aprovado")]
    Approved,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Draft
    }
}

// =============================================================================
// Project
// =============================================================================

/// A quote: raw floor inputs plus the derived BOM and pricing ladder.
///
/// Persisted records embed `orcamento_itens` and `financeiro` alongside the
/// raw floors so a previously computed proposal redisplays without
/// recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,

    /// Customer display name as it appears on the proposal.
    pub cliente: String,

    /// Optional link to a customer record.
    pub cliente_id: Option<String>,

    /// Site/work name.
    pub obra: String,
    pub endereco: String,
    pub status: ProjectStatus,

    #[serde(default)]
    pub pavimentos: Vec<Floor>,

    /// Payment terms printed on the proposal.
    pub condicoes_pagamento: String,

    /// Execution schedule printed on the proposal.
    pub cronograma: String,
    pub observacoes: String,

    /// Proposal validity in days. Stored snapshots can carry this as a
    /// fractional number, a string, or null; anything without a usable
    /// day count falls back to the 30-day default.
    #[serde(deserialize_with = "lenient_validade_dias", default = "default_validade_dias")]
    pub validade_dias: i64,

    /// Consolidated bill of materials; rebuilt from the floors by each
    /// engine run, hand-editable in between.
    #[serde(default)]
    pub orcamento_itens: Vec<BudgetItem>,

    #[serde(default)]
    pub financeiro: FinancialSummary,

    #[ts(as = "String")]
    pub data_criacao: DateTime<Utc>,

    /// Link to the published proposal document, when one exists.
    pub proposta_url: Option<String>,
}

fn default_validade_dias() -> i64 {
    DEFAULT_VALIDITY_DAYS
}

fn lenient_validade_dias<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(crate::money::lenient_opt_i64(deserializer)?.unwrap_or(DEFAULT_VALIDITY_DAYS))
}

impl Project {
    /// Creates a blank Draft quote with the firm's standard proposal terms.
    pub fn new() -> Self {
        Project {
            id: Uuid::new_v4().to_string(),
            cliente: String::new(),
            cliente_id: None,
            obra: String::new(),
            endereco: String::new(),
            status: ProjectStatus::Draft,
            pavimentos: Vec::new(),
            condicoes_pagamento: "30 dias após aprovação".to_string(),
            cronograma: "15 dias úteis".to_string(),
            observacoes: String::new(),
            validade_dias: DEFAULT_VALIDITY_DAYS,
            orcamento_itens: Vec::new(),
            financeiro: FinancialSummary::default(),
            data_criacao: Utc::now(),
            proposta_url: None,
        }
    }

    /// Appends a new floor named after its position ("Pavimento 3"), typed
    /// `Tipo`, with the default ceiling height of 3 m.
    pub fn add_floor(&mut self) -> &mut Floor {
        let floor = Floor {
            id: Uuid::new_v4().to_string(),
            nome: format!("Pavimento {}", self.pavimentos.len() + 1),
            tipo: FloorType::Tipo,
            referencia_prancha: String::new(),
            largura: Decimal::ZERO,
            comprimento: Decimal::ZERO,
            altura: Decimal::from(3),
            itens_centrais: Vec::new(),
            infraestruturas: Vec::new(),
        };
        self.pavimentos.push(floor);
        let last = self.pavimentos.len() - 1;
        &mut self.pavimentos[last]
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new()
    }
}

impl Floor {
    /// Sets the quantity for a named device on this floor.
    ///
    /// ## Behavior
    /// - Existing entry: the quantity is replaced (the floor editor's
    ///   inputs hold absolute values, not increments). Zero stays in the
    ///   list; the takeoff simply adds nothing for it.
    /// - No entry yet: one is appended with a fresh id.
    pub fn set_manual_item(&mut self, produto_nome: &str, quantidade: Decimal) {
        if let Some(item) = self
            .itens_centrais
            .iter_mut()
            .find(|i| i.produto_nome == produto_nome)
        {
            item.quantidade = quantidade;
            return;
        }
        self.itens_centrais.push(ManualItem {
            id: Uuid::new_v4().to_string(),
            produto_nome: produto_nome.to_string(),
            quantidade,
        });
    }

    /// Adds an infrastructure run with zero length. Adding a tag the floor
    /// already carries is a no-op.
    pub fn add_infra(&mut self, tipo: &str) {
        if self.infraestruturas.iter().any(|i| i.tipo == tipo) {
            return;
        }
        self.infraestruturas.push(InfraMeter {
            tipo: tipo.to_string(),
            metragem: Decimal::ZERO,
        });
    }

    /// Removes an infrastructure run by tag.
    pub fn remove_infra(&mut self, tipo: &str) {
        self.infraestruturas.retain(|i| i.tipo != tipo);
    }

    /// Sets the metered length of an existing infrastructure run. Unknown
    /// tags are ignored (the editor only shows inputs for existing runs).
    pub fn set_infra_length(&mut self, tipo: &str, metragem: Decimal) {
        if let Some(infra) = self.infraestruturas.iter_mut().find(|i| i.tipo == tipo) {
            infra.metragem = metragem;
        }
    }
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

    #[test]
    fn test_project_status_serde_values() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Draft).unwrap(),
            "\"Rascunho\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Calculated).unwrap(),
            "\"Calculado\""
        );
        let status: ProjectStatus = serde_json::from_str("\"Aprovado\"").unwrap();
        assert_eq!(status, ProjectStatus::Approved);
    }

    #[test]
    fn test_floor_type_serde_values() {
        assert_eq!(
            serde_json::to_string(&FloorType::Terreo).unwrap(),
            "\"Térreo\""
        );
        let tipo: FloorType = serde_json::from_str("\"Garagem\"").unwrap();
        assert_eq!(tipo, FloorType::Garagem);
    }

    #[test]
    fn test_item_origin_serde_values() {
        assert_eq!(
            serde_json::to_string(&ItemOrigin::Manual).unwrap(),
            "\"manual\""
        );
        assert_eq!(
            serde_json::to_string(&ItemOrigin::Calculated).unwrap(),
            "\"calculado\""
        );
    }

    #[test]
    fn test_unit_kind_serde_values() {
        // "UN"/"M" exist only on the wire; the variants are Un and Meter
        assert_eq!(serde_json::to_string(&UnitKind::Un).unwrap(), "\"UN\"");
        assert_eq!(serde_json::to_string(&UnitKind::Meter).unwrap(), "\"M\"");
        let unidade: UnitKind = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(unidade, UnitKind::Meter);
    }

    #[test]
    fn test_new_project_defaults() {
        let project = Project::new();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.condicoes_pagamento, "30 dias após aprovação");
        assert_eq!(project.cronograma, "15 dias úteis");
        assert_eq!(project.validade_dias, 30);
        assert!(project.pavimentos.is_empty());
        assert!(project.orcamento_itens.is_empty());
        assert_eq!(project.financeiro.bdi_percentual, dec("25"));
        assert_eq!(project.financeiro.margem_lucro_percentual, dec("15"));
        assert_eq!(project.financeiro.preco_venda_final, Decimal::ZERO);
    }

    #[test]
    fn test_add_floor_numbering_and_defaults() {
        let mut project = Project::new();
        project.add_floor();
        let floor = project.add_floor();

        assert_eq!(floor.nome, "Pavimento 2");
        assert_eq!(floor.tipo, FloorType::Tipo);
        assert_eq!(floor.altura, dec("3"));
        assert_eq!(floor.largura, Decimal::ZERO);
        assert_eq!(project.pavimentos.len(), 2);
        assert_eq!(project.pavimentos[0].nome, "Pavimento 1");
    }

    #[test]
    fn test_set_manual_item_replaces_quantity() {
        let mut project = Project::new();
        let floor = project.add_floor();

        floor.set_manual_item("Sirene de Alarme", dec("2"));
        floor.set_manual_item("Sirene de Alarme", dec("5"));

        assert_eq!(floor.itens_centrais.len(), 1);
        assert_eq!(floor.itens_centrais[0].quantidade, dec("5"));
    }

    #[test]
    fn test_add_infra_is_idempotent() {
        let mut project = Project::new();
        let floor = project.add_floor();

        floor.add_infra("alarme");
        floor.add_infra("alarme");

        assert_eq!(floor.infraestruturas.len(), 1);
        assert_eq!(floor.infraestruturas[0].metragem, Decimal::ZERO);
    }

    #[test]
    fn test_set_and_remove_infra_length() {
        let mut project = Project::new();
        let floor = project.add_floor();

        floor.add_infra("alarme");
        floor.set_infra_length("alarme", dec("37"));
        assert_eq!(floor.infraestruturas[0].metragem, dec("37"));

        // unknown tag is ignored
        floor.set_infra_length("hidrante", dec("10"));
        assert_eq!(floor.infraestruturas.len(), 1);

        floor.remove_infra("alarme");
        assert!(floor.infraestruturas.is_empty());
    }

    #[test]
    fn test_budget_item_recompute_total() {
        let mut item = BudgetItem {
            id: "x".to_string(),
            produto_nome: "Sirene".to_string(),
            origem: ItemOrigin::Manual,
            qtd_sistema: dec("2"),
            qtd_final: dec("7"),
            custo_unitario: dec("10.5"),
            custo_total: Decimal::ZERO,
        };
        item.recompute_total();
        assert_eq!(item.custo_total, dec("73.5"));
    }

    #[test]
    fn test_deserialize_stored_snapshot() {
        // Shape written by the existing frontend: camelCase keys, short
        // random ids, numeric strings and missing arrays in old records.
        let raw = r#"{
            "id": "temp-x7k2m9q4p",
            "cliente": "Condomínio Jardim",
            "clienteId": null,
            "obra": "Torre A",
            "endereco": "SQN 210",
            "status": "Calculado",
            "pavimentos": [
                {
                    "id": "f1",
                    "nome": "Pavimento 1",
                    "tipo": "Térreo",
                    "referenciaPrancha": "PR-01",
                    "largura": 12,
                    "comprimento": "20,5",
                    "altura": 3,
                    "itensCentrais": [
                        { "id": "i1", "produtoNome": "Sirene de Alarme", "quantidade": 2 }
                    ]
                }
            ],
            "condicoesPagamento": "30 dias após aprovação",
            "cronograma": "15 dias úteis",
            "observacoes": "",
            "validadeDias": 30,
            "orcamentoItens": [
                {
                    "id": "b1",
                    "produtoNome": "Sirene de Alarme",
                    "origem": "manual",
                    "qtdSistema": 2,
                    "qtdFinal": 2,
                    "custoUnitario": 150.5,
                    "custoTotal": 301
                }
            ],
            "financeiro": {
                "custoMateriais": 301,
                "bdiPercentual": 25,
                "bdiValor": 75.25,
                "margemLucroPercentual": 15,
                "margemLucroValor": 56.4375,
                "descontoPercentual": 0,
                "descontoValor": "",
                "precoVendaFinal": 432.6875
            },
            "dataCriacao": "2024-03-18T14:22:05.123Z"
        }"#;

        let project: Project = serde_json::from_str(raw).unwrap();

        assert_eq!(project.status, ProjectStatus::Calculated);
        assert_eq!(project.pavimentos[0].tipo, FloorType::Terreo);
        assert_eq!(project.pavimentos[0].comprimento, dec("20.5"));
        // infraestruturas missing in the record defaults to empty
        assert!(project.pavimentos[0].infraestruturas.is_empty());
        assert_eq!(project.orcamento_itens[0].custo_unitario, dec("150.5"));
        assert_eq!(project.financeiro.desconto_valor, Decimal::ZERO);
        assert_eq!(project.financeiro.preco_venda_final, dec("432.6875"));
        assert!(project.proposta_url.is_none());
    }

    #[test]
    fn test_validade_dias_tolerates_legacy_shapes() {
        // the frontend stores whatever its number input held, so old
        // records carry fractional days, strings, or null
        fn project_with(validade_line: &str) -> Project {
            let raw = format!(
                r#"{{
                    "id": "temp-a1b2c3d4e",
                    "cliente": "Condomínio Jardim",
                    "obra": "Torre A",
                    "endereco": "SQN 210",
                    "status": "Rascunho",
                    "condicoesPagamento": "30 dias após aprovação",
                    "cronograma": "15 dias úteis",
                    "observacoes": "",
                    {validade_line}
                    "dataCriacao": "2024-03-18T14:22:05.123Z"
                }}"#
            );
            serde_json::from_str(&raw).unwrap()
        }

        // fractional day counts truncate
        assert_eq!(project_with(r#""validadeDias": 30.5,"#).validade_dias, 30);
        assert_eq!(project_with(r#""validadeDias": "45","#).validade_dias, 45);
        // null and absent fall back to the default, not zero
        assert_eq!(project_with(r#""validadeDias": null,"#).validade_dias, 30);
        assert_eq!(project_with("").validade_dias, 30);
    }

    #[test]
    fn test_serialize_keeps_wire_field_names() {
        let project = Project::new();
        let value = serde_json::to_value(&project).unwrap();

        assert!(value.get("orcamentoItens").is_some());
        assert!(value.get("condicoesPagamento").is_some());
        assert!(value.get("validadeDias").is_some());
        let financeiro = value.get("financeiro").unwrap();
        assert!(financeiro.get("custoMateriais").is_some());
        assert!(financeiro.get("bdiPercentual").is_some());
        assert!(financeiro.get("precoVendaFinal").is_some());
        // decimals serialize as plain JSON numbers
        assert_eq!(financeiro["bdiPercentual"], serde_json::json!(25.0));
    }

    #[test]
    fn test_financial_summary_default() {
        let fin = FinancialSummary::default();
        assert_eq!(fin.bdi_percentual, dec("25"));
        assert_eq!(fin.margem_lucro_percentual, dec("15"));
        assert_eq!(fin.custo_materiais, Decimal::ZERO);
        assert_eq!(fin.desconto_valor, Decimal::ZERO);
    }
}
