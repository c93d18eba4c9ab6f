//! Department selection for report routing.
//!
//! The strategy is injectable so the shipped rules table can be swapped for
//! the uniform-random picker or a test double without touching the service.

use serde::{Deserialize, Serialize};

use super::domain::{Category, Report};

/// Fixed set of handling departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    PublicWorks,
    Sanitation,
    SafetyTeam,
    TrafficDivision,
}

impl Department {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::PublicWorks,
            Self::Sanitation,
            Self::SafetyTeam,
            Self::TrafficDivision,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PublicWorks => "Public Works",
            Self::Sanitation => "Sanitation Dept",
            Self::SafetyTeam => "Safety Team",
            Self::TrafficDivision => "Traffic Division",
        }
    }
}

/// Picks the handling department for a report.
pub trait DispatchStrategy: Send + Sync {
    fn select(&self, report: &Report) -> Department;
}

/// Deterministic category -> department rules table. Default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryDispatch;

impl DispatchStrategy for CategoryDispatch {
    fn select(&self, report: &Report) -> Department {
        match report.category {
            Category::Infrastructure | Category::Environment => Department::PublicWorks,
            Category::Sanitation => Department::Sanitation,
            Category::Safety | Category::Emergency => Department::SafetyTeam,
            Category::Traffic => Department::TrafficDivision,
        }
    }
}

/// Uniform random pick over the fixed department list. Placeholder routing;
/// not authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDispatch;

impl DispatchStrategy for RandomDispatch {
    fn select(&self, _report: &Report) -> Department {
        let departments = Department::ordered();
        let index = (rand::random::<u64>() % departments.len() as u64) as usize;
        departments[index]
    }
}
