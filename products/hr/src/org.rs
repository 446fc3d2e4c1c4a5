//! Vocabulary of the org chart.

use std::fmt;

use uuid::{Uuid, uuid};

/// Superior of every top-level manager. No employee row carries this id.
pub const CHIEF_ID: Uuid = uuid!("018c8da1-bb27-72bd-b2eb-25cf5521de7e");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Lead,
    Developer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Lead => "lead",
            Role::Developer => "developer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost classification of an employee's allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bid {
    Opex,
    Capex,
}

impl Bid {
    pub const ALL: [Bid; 2] = [Bid::Opex, Bid::Capex];

    pub fn as_str(self) -> &'static str {
        match self {
            Bid::Opex => "opex",
            Bid::Capex => "capex",
        }
    }
}
