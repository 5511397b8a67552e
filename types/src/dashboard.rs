use serde::{Deserialize, Serialize};

use crate::employee::{Division, Employee};

/// How many employees the dashboard lists as recently added.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionCount {
    pub division: Division,
    pub employees: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_employees: u64,
    pub total_divisions: u64,
    pub unassigned: u64,
    pub per_division: Vec<DivisionCount>,
    pub recent: Vec<Employee>,
}

impl DashboardSummary {
    pub fn build(employees: &[Employee], divisions: &[Division]) -> Self {
        let per_division = divisions
            .iter()
            .map(|division| DivisionCount {
                division: division.clone(),
                employees: employees
                    .iter()
                    .filter(|e| e.division.as_ref().is_some_and(|d| d.id == division.id))
                    .count() as u64,
            })
            .collect();

        let mut recent: Vec<Employee> = employees.to_vec();
        // Ties end up newest-inserted first.
        recent.sort_by_key(|e| e.created_at);
        recent.reverse();
        recent.truncate(RECENT_LIMIT);

        Self {
            total_employees: employees.len() as u64,
            total_divisions: divisions.len() as u64,
            unassigned: employees.iter().filter(|e| e.division.is_none()).count() as u64,
            per_division,
            recent,
        }
    }

    /// Largest per-division count, for scaling the chart.
    pub fn chart_max(&self) -> u64 {
        self.per_division
            .iter()
            .map(|c| c.employees)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;

    fn employee(name: &str, division: Option<&Division>, secs: i64) -> Employee {
        Employee {
            id: Uuid::now_v7(),
            name: name.into(),
            phone: "081234567890".into(),
            position: "QA Engineer".into(),
            division: division.cloned(),
            image: None,
            created_at: Timestamp::from_second(secs).unwrap(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let tech = Division::new("teknologi", "Teknologi");
        let hr = Division::new("sdm", "Sumber Daya Manusia");
        let employees = vec![
            employee("Budi", Some(&tech), 10),
            employee("Siti", Some(&tech), 20),
            employee("Eko", Some(&hr), 30),
            employee("Gilang", None, 40),
        ];

        let summary = DashboardSummary::build(&employees, &[tech, hr]);

        assert_eq!(summary.total_employees, 4);
        assert_eq!(summary.total_divisions, 2);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(summary.per_division[0].employees, 2);
        assert_eq!(summary.per_division[1].employees, 1);
        assert_eq!(summary.chart_max(), 2);

        let recent: Vec<_> = summary.recent.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(recent, ["Gilang", "Eko", "Siti"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::build(&[], &[]);
        assert_eq!(summary.total_employees, 0);
        assert!(summary.recent.is_empty());
        assert_eq!(summary.chart_max(), 1);
    }
}
