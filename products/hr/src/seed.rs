//! Deterministic synthetic organization for development databases.
//!
//! Generation is split in two: [`plan`] draws every row from a
//! `ChaCha8Rng` seeded with [`SeedConfig::seed`], and [`run`] wipes the
//! directory tables and writes the plan inside one transaction. The same
//! seed yields the same names, units, bids, capitalizations and reporting
//! lines; only the time-ordered ids differ between runs.

use std::ops::Range;

use entity::{business_unit, domain, employee, product};
use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use platform_db::new_id;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DbErr, EntityTrait, TransactionTrait,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::org::{Bid, CHIEF_ID, Role};

pub const DEFAULT_SEED: u64 = 0;

const MANAGER_CAPITALIZATION: Range<f64> = 4.0..6.0;
const LEAD_CAPITALIZATION: Range<f64> = 2.0..4.0;
const DEVELOPER_CAPITALIZATION: Range<f64> = 1.0..2.0;

const BUSINESS_UNITS: [&str; 2] = ["MVM", "MTech"];
const DOMAINS: [&str; 4] = [
    "Бэк-офис",
    "Техплатформа",
    "Офис больших данных",
    "Цифровой опыт поставщика",
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot place {role} employees without any {superior}")]
    MissingSuperiors { role: Role, superior: Role },
    #[error("managers need at least one business unit")]
    NoBusinessUnits,
    #[error("seeding failed: {0}")]
    Store(#[from] DbErr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeedConfig {
    pub seed: u64,
    pub managers: usize,
    pub leads: usize,
    pub developers: usize,
    pub unassigned: usize,
    pub business_units: Vec<String>,
    pub domains: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            managers: 5,
            leads: 10,
            developers: 30,
            unassigned: 15,
            business_units: BUSINESS_UNITS.iter().map(|s| s.to_string()).collect(),
            domains: DOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SeedConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Rows to write, employees in hierarchy order (managers, leads,
/// developers, then the unassigned pool).
#[derive(Clone, Debug, PartialEq)]
pub struct SeedPlan {
    pub business_units: Vec<business_unit::Model>,
    pub domains: Vec<domain::Model>,
    pub employees: Vec<employee::Model>,
}

impl SeedPlan {
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &employee::Model> {
        self.employees
            .iter()
            .filter(move |e| e.role.as_deref() == Some(role.as_str()))
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &employee::Model> {
        self.employees.iter().filter(|e| e.role.is_none())
    }

    pub fn find(&self, id: Uuid) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn report(&self) -> SeedReport {
        SeedReport {
            business_units: self.business_units.len(),
            domains: self.domains.len(),
            managers: self.with_role(Role::Manager).count(),
            leads: self.with_role(Role::Lead).count(),
            developers: self.with_role(Role::Developer).count(),
            unassigned: self.unassigned().count(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub business_units: usize,
    pub domains: usize,
    pub managers: usize,
    pub leads: usize,
    pub developers: usize,
    pub unassigned: usize,
}

impl SeedReport {
    pub fn employees(&self) -> usize {
        self.managers + self.leads + self.developers + self.unassigned
    }
}

struct Placement {
    role: Role,
    superior: Uuid,
    business_unit: String,
    capitalization: f64,
    bid: Bid,
}

/// Draws the whole organization from `config.seed`.
pub fn plan(config: &SeedConfig) -> Result<SeedPlan, SeedError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let business_units = config
        .business_units
        .iter()
        .map(|name| business_unit::Model {
            id: new_id(),
            name: name.clone(),
        })
        .collect();
    let domains = config
        .domains
        .iter()
        .map(|name| domain::Model {
            id: new_id(),
            name: name.clone(),
        })
        .collect();

    let mut managers = Vec::with_capacity(config.managers);
    for _ in 0..config.managers {
        let business_unit = config
            .business_units
            .choose(&mut rng)
            .ok_or(SeedError::NoBusinessUnits)?
            .clone();
        let capitalization = rng.gen_range(MANAGER_CAPITALIZATION);
        managers.push(hire(
            &mut rng,
            Some(Placement {
                role: Role::Manager,
                superior: CHIEF_ID,
                business_unit,
                capitalization,
                bid: Bid::Capex,
            }),
        ));
    }

    let leads = place_under(
        &mut rng,
        &managers,
        config.leads,
        Role::Lead,
        LEAD_CAPITALIZATION,
        |_| Bid::Capex,
    )?;
    let developers = place_under(
        &mut rng,
        &leads,
        config.developers,
        Role::Developer,
        DEVELOPER_CAPITALIZATION,
        |rng| *Bid::ALL.choose(rng).unwrap_or(&Bid::Capex),
    )?;

    let mut employees = managers;
    employees.extend(leads);
    employees.extend(developers);
    employees.extend((0..config.unassigned).map(|_| hire(&mut rng, None)));

    Ok(SeedPlan {
        business_units,
        domains,
        employees,
    })
}

/// Hires `count` employees, each reporting to a uniformly chosen superior
/// and inheriting that superior's business unit.
fn place_under<F>(
    rng: &mut ChaCha8Rng,
    superiors: &[employee::Model],
    count: usize,
    role: Role,
    capitalization: Range<f64>,
    mut bid: F,
) -> Result<Vec<employee::Model>, SeedError>
where
    F: FnMut(&mut ChaCha8Rng) -> Bid,
{
    let mut hired = Vec::with_capacity(count);
    for _ in 0..count {
        let superior = superiors
            .choose(rng)
            .ok_or_else(|| SeedError::MissingSuperiors {
                role,
                superior: superior_role(role),
            })?;
        let placement = Placement {
            role,
            superior: superior.id,
            business_unit: superior.business_unit.clone().unwrap_or_default(),
            capitalization: rng.gen_range(capitalization.clone()),
            bid: bid(rng),
        };
        hired.push(hire(rng, Some(placement)));
    }
    Ok(hired)
}

fn superior_role(role: Role) -> Role {
    match role {
        Role::Developer => Role::Lead,
        Role::Lead | Role::Manager => Role::Manager,
    }
}

fn hire(rng: &mut ChaCha8Rng, placement: Option<Placement>) -> employee::Model {
    // Three independent draws; a full name is never split back apart.
    let first_name: String = FirstName(EN).fake_with_rng(rng);
    let middle_name: String = FirstName(EN).fake_with_rng(rng);
    let last_name: String = LastName(EN).fake_with_rng(rng);

    let mut model = employee::Model {
        id: new_id(),
        first_name,
        middle_name,
        last_name,
        business_unit: None,
        role: None,
        bid: None,
        capitalization: None,
        superiors: None,
    };
    if let Some(placement) = placement {
        model.role = Some(placement.role.as_str().to_string());
        model.superiors = Some(placement.superior);
        model.business_unit = Some(placement.business_unit);
        model.capitalization = Some(placement.capitalization);
        model.bid = Some(placement.bid.as_str().to_string());
    }
    model
}

/// Replaces the directory contents with a freshly planned organization.
///
/// Destructive: every row in the four directory tables is deleted first.
/// Any failure rolls the whole run back.
pub async fn run<C>(db: &C, config: &SeedConfig) -> Result<SeedReport, SeedError>
where
    C: TransactionTrait,
{
    let plan = plan(config)?;
    let txn = db.begin().await?;
    if let Err(err) = write_plan(&txn, &plan).await {
        warn!(error = %err, "seeding failed; rolling back");
        txn.rollback().await?;
        return Err(err.into());
    }
    txn.commit().await?;

    let report = plan.report();
    info!(
        seed = config.seed,
        business_units = report.business_units,
        domains = report.domains,
        managers = report.managers,
        leads = report.leads,
        developers = report.developers,
        unassigned = report.unassigned,
        "directory seeded"
    );
    Ok(report)
}

async fn write_plan<C>(db: &C, plan: &SeedPlan) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    product::Entity::delete_many().exec(db).await?;
    employee::Entity::delete_many().exec(db).await?;
    domain::Entity::delete_many().exec(db).await?;
    business_unit::Entity::delete_many().exec(db).await?;

    for unit in &plan.business_units {
        business_unit::ActiveModel {
            id: Set(unit.id),
            name: Set(unit.name.clone()),
        }
        .insert(db)
        .await?;
    }
    for domain in &plan.domains {
        domain::ActiveModel {
            id: Set(domain.id),
            name: Set(domain.name.clone()),
        }
        .insert(db)
        .await?;
    }
    for employee in &plan.employees {
        employee::ActiveModel {
            id: Set(employee.id),
            first_name: Set(employee.first_name.clone()),
            middle_name: Set(employee.middle_name.clone()),
            last_name: Set(employee.last_name.clone()),
            business_unit: Set(employee.business_unit.clone()),
            role: Set(employee.role.clone()),
            bid: Set(employee.bid.clone()),
            capitalization: Set(employee.capitalization),
            superiors: Set(employee.superiors),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
