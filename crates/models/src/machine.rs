//! Machine record entity.
//!
//! One table, keyed by a database-assigned id. `created_at` is written once
//! at insert time; `updated_at` must be refreshed by every mutation.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub site: String,
    pub installed_at: DateTimeWithTimeZone,
    pub state: MachineState,
    pub description: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Operational state of a machine. Stored as the variant name; any state may
/// follow any state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineState {
    #[default]
    #[sea_orm(string_value = "OPERATIONAL")]
    Operational,
    #[sea_orm(string_value = "BROKEN_DOWN")]
    BrokenDown,
    #[sea_orm(string_value = "UNDER_MAINTENANCE")]
    UnderMaintenance,
    #[sea_orm(string_value = "STOPPED")]
    Stopped,
    #[sea_orm(string_value = "OUT_OF_SERVICE")]
    OutOfService,
}

impl MachineState {
    /// Human-readable label for display surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::BrokenDown => "Broken down",
            Self::UnderMaintenance => "Under maintenance",
            Self::Stopped => "Stopped",
            Self::OutOfService => "Out of service",
        }
    }
}
