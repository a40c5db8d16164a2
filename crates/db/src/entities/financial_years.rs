//! `SeaORM` Entity for financial_years table.

use bizbooks_core::fiscal::FinancialYear;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_years")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub year: i32,
    pub is_locked: bool,
    pub locked_by: Option<Uuid>,
    pub locked_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FinancialYear {
    fn from(m: Model) -> Self {
        Self {
            tenant_id: m.tenant_id,
            year: m.year,
            is_locked: m.is_locked,
            locked_by: m.locked_by,
            locked_at: m.locked_at.map(|at| at.with_timezone(&Utc)),
        }
    }
}
