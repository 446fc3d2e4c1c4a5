//! HR vertical slice: the organizational directory and its seed data.

pub mod directory;
pub mod org;
pub mod seed;

#[cfg(test)]
pub(crate) mod testing;

pub use directory::{
    DirectoryError, EmployeeOption, EmployeeUpdate, NewProduct, UpsertOutcome, create_product,
    list_business_units, list_domains, list_employees, upsert_employee,
};
pub use org::{Bid, CHIEF_ID, Role};
pub use seed::{SeedConfig, SeedError, SeedPlan, SeedReport};
