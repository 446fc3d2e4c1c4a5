//! Directory reads and writes. Every operation borrows the store handle it
//! runs against; nothing here holds a connection of its own.

use entity::{business_unit, domain, employee, product};
use platform_db::new_id;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{field} is not a valid {expected}: {value:?}")]
    InvalidInput {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// One entry of an employee picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeOption {
    pub value: String,
    pub title: String,
}

impl From<&employee::Model> for EmployeeOption {
    fn from(model: &employee::Model) -> Self {
        Self {
            value: model.id.to_string(),
            title: model.display_name(),
        }
    }
}

/// Assignment submitted for an existing employee. Every field arrives as a
/// string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub uuid: String,
    pub lead_uuid: String,
    pub bid: String,
    pub business_unit: String,
    pub capitalization: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub manager_uuid: String,
    pub name: String,
    pub jira_link: String,
    pub domain: String,
}

/// Result of a best-effort employee update. Callers report every variant
/// as success; `WriteFailed` only reaches the log.
#[derive(Clone, Debug, PartialEq)]
pub enum UpsertOutcome {
    Applied,
    NotFound,
    WriteFailed(String),
}

struct Assignment {
    id: Uuid,
    superior: Option<Uuid>,
    capitalization: Option<f64>,
}

impl EmployeeUpdate {
    fn assignment(&self) -> DirectoryResult<Assignment> {
        Ok(Assignment {
            id: parse_uuid("uuid", &self.uuid)?,
            superior: optional(&self.lead_uuid)
                .map(|raw| parse_uuid("lead_uuid", raw))
                .transpose()?,
            capitalization: optional(&self.capitalization)
                .map(|raw| {
                    raw.parse::<f64>()
                        .map_err(|_| invalid("capitalization", "number", raw))
                })
                .transpose()?,
        })
    }
}

fn optional(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_uuid(field: &'static str, raw: &str) -> DirectoryResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| invalid(field, "uuid", raw))
}

fn invalid(field: &'static str, expected: &'static str, value: &str) -> DirectoryError {
    DirectoryError::InvalidInput {
        field,
        expected,
        value: value.to_string(),
    }
}

/// Business unit names in creation order.
pub async fn list_business_units<C>(db: &C) -> DirectoryResult<Vec<String>>
where
    C: ConnectionTrait,
{
    let names = business_unit::Entity::find()
        .select_only()
        .column(business_unit::Column::Name)
        .order_by_asc(business_unit::Column::Id)
        .into_tuple::<String>()
        .all(db)
        .await?;
    Ok(names)
}

/// Domain names in creation order.
pub async fn list_domains<C>(db: &C) -> DirectoryResult<Vec<String>>
where
    C: ConnectionTrait,
{
    let names = domain::Entity::find()
        .select_only()
        .column(domain::Column::Name)
        .order_by_asc(domain::Column::Id)
        .into_tuple::<String>()
        .all(db)
        .await?;
    Ok(names)
}

/// Employees holding `role`. Without a role (or with an empty one) this
/// lists the unassigned pool, i.e. rows whose role is NULL, not everyone.
pub async fn list_employees<C>(
    db: &C,
    role: Option<&str>,
) -> DirectoryResult<Vec<EmployeeOption>>
where
    C: ConnectionTrait,
{
    let condition = match role.filter(|role| !role.is_empty()) {
        Some(role) => employee::Column::Role.eq(role),
        None => employee::Column::Role.is_null(),
    };
    let rows = employee::Entity::find()
        .filter(condition)
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?;
    Ok(rows.iter().map(EmployeeOption::from).collect())
}

/// Overwrites role, business unit, superior, capitalization and bid of the
/// employee whose id matches. Never fails: shape and store errors come back
/// as [`UpsertOutcome::WriteFailed`].
pub async fn upsert_employee<C>(db: &C, update: &EmployeeUpdate) -> UpsertOutcome
where
    C: ConnectionTrait,
{
    let assignment = match update.assignment() {
        Ok(assignment) => assignment,
        Err(err) => return UpsertOutcome::WriteFailed(err.to_string()),
    };
    let result = employee::Entity::update_many()
        .col_expr(employee::Column::Role, Expr::value(Some(update.role.clone())))
        .col_expr(
            employee::Column::BusinessUnit,
            Expr::value(Some(update.business_unit.clone())),
        )
        .col_expr(employee::Column::Superiors, Expr::value(assignment.superior))
        .col_expr(
            employee::Column::Capitalization,
            Expr::value(assignment.capitalization),
        )
        .col_expr(employee::Column::Bid, Expr::value(Some(update.bid.clone())))
        .filter(employee::Column::Id.eq(assignment.id))
        .exec(db)
        .await;
    match result {
        Ok(res) if res.rows_affected == 0 => UpsertOutcome::NotFound,
        Ok(_) => UpsertOutcome::Applied,
        Err(err) => UpsertOutcome::WriteFailed(err.to_string()),
    }
}

/// Inserts a product under a fresh id. The manager and domain are stored as
/// given; neither is checked against existing rows.
pub async fn create_product<C>(db: &C, new: &NewProduct) -> DirectoryResult<product::Model>
where
    C: ConnectionTrait,
{
    let manager_id = parse_uuid("manager_uuid", &new.manager_uuid)?;
    let model = product::ActiveModel {
        id: Set(new_id()),
        name: Set(new.name.clone()),
        manager_id: Set(manager_id),
        domain: Set(new.domain.clone()),
        jira_link: Set(new.jira_link.clone()),
    }
    .insert(db)
    .await?;
    Ok(model)
}
