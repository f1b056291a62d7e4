//! Salary ranking for the chart view.
//!
//! Two selection policies are supported. [`RankPolicy::Arrival`] reproduces
//! the historical behaviour: the first ten rows in fetch order, then sorted.
//! [`RankPolicy::ByValue`] selects the ten highest salaries across the whole
//! table, which is what the "Top 10" caption promises.

use tracing::warn;

use crate::employee::Employee;
use crate::salary::parse_salary;

/// Number of entries shown on the salary chart.
pub const TOP_SALARY_COUNT: usize = 10;

/// How the chart picks which employees to rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankPolicy {
    /// First ten in fetch order, then sorted descending.
    Arrival,
    /// Ten highest salaries across the table, sorted descending.
    #[default]
    ByValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryRankEntry {
    pub name: String,
    pub salary: u64,
}

/// Highest, lowest, and rounded average of the ranked salaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryStats {
    pub highest: u64,
    pub lowest: u64,
    pub average: u64,
}

impl SalaryStats {
    /// `None` for an empty slice, so callers render "no data" instead of NaN.
    pub fn from_entries(entries: &[SalaryRankEntry]) -> Option<Self> {
        let highest = entries.iter().map(|e| e.salary).max()?;
        let lowest = entries.iter().map(|e| e.salary).min()?;
        let sum: u128 = entries.iter().map(|e| u128::from(e.salary)).sum();
        let len = entries.len() as u128;
        // Round half up.
        let average = ((2 * sum + len) / (2 * len)) as u64;
        Some(Self {
            highest,
            lowest,
            average,
        })
    }
}

/// The chart view's projection: ranked entries plus summary statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryChart {
    pub policy: RankPolicy,
    pub entries: Vec<SalaryRankEntry>,
    pub stats: Option<SalaryStats>,
}

impl SalaryChart {
    /// Rank `employees` (in fetch order) under `policy`.
    ///
    /// Rows whose salary does not parse are skipped. Ties keep input order.
    pub fn build(employees: &[Employee], policy: RankPolicy) -> Self {
        let candidates: &[Employee] = match policy {
            RankPolicy::Arrival => &employees[..employees.len().min(TOP_SALARY_COUNT)],
            RankPolicy::ByValue => employees,
        };

        let mut entries: Vec<SalaryRankEntry> = candidates
            .iter()
            .filter_map(|e| match parse_salary(&e.salary) {
                Some(salary) => Some(SalaryRankEntry {
                    name: e.name.clone(),
                    salary,
                }),
                None => {
                    warn!(id = %e.id, salary = %e.salary, "skipping unparseable salary");
                    None
                }
            })
            .collect();

        entries.sort_by(|a, b| b.salary.cmp(&a.salary));
        entries.truncate(TOP_SALARY_COUNT);

        let stats = SalaryStats::from_entries(&entries);
        Self {
            policy,
            entries,
            stats,
        }
    }

    /// Bar width for `entry` as a percentage of the highest salary.
    pub fn bar_percent(&self, entry: &SalaryRankEntry) -> f64 {
        match self.stats {
            Some(stats) if stats.highest > 0 => entry.salary as f64 / stats.highest as f64 * 100.0,
            _ => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::normalize;
    use crate::employee::tests::row;

    fn salaries(chart: &SalaryChart) -> Vec<u64> {
        chart.entries.iter().map(|e| e.salary).collect()
    }

    #[test]
    fn ranks_descending_with_names() {
        let employees = normalize(&[
            row("Ann", "London", "$50,000"),
            row("Bob", "London", "$120,000"),
            row("Cyd", "London", "$80,000"),
        ]);
        for policy in [RankPolicy::Arrival, RankPolicy::ByValue] {
            let chart = SalaryChart::build(&employees, policy);
            assert_eq!(salaries(&chart), [120_000, 80_000, 50_000]);
            let names: Vec<&str> = chart.entries.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, ["Bob", "Cyd", "Ann"]);
        }
    }

    #[test]
    fn arrival_policy_only_considers_first_ten_rows() {
        let mut rows: Vec<_> = (1..=10)
            .map(|i| row(&format!("E{i}"), "Tokyo", &format!("${i},000")))
            .collect();
        rows.push(row("Late Highest", "Tokyo", "$999,000"));
        let employees = normalize(&rows);

        let chart = SalaryChart::build(&employees, RankPolicy::Arrival);
        assert_eq!(chart.entries.len(), 10);
        assert!(chart.entries.iter().all(|e| e.name != "Late Highest"));
        assert_eq!(chart.entries[0].salary, 10_000);
    }

    #[test]
    fn by_value_policy_selects_true_top_ten() {
        let mut rows: Vec<_> = (1..=12)
            .map(|i| row(&format!("E{i}"), "Tokyo", &format!("${i},000")))
            .collect();
        rows.push(row("Late Highest", "Tokyo", "$999,000"));
        let employees = normalize(&rows);

        let chart = SalaryChart::build(&employees, RankPolicy::ByValue);
        assert_eq!(chart.entries.len(), 10);
        assert_eq!(chart.entries[0].name, "Late Highest");
        assert_eq!(chart.entries[9].salary, 4_000);
    }

    #[test]
    fn empty_input_has_no_stats() {
        let chart = SalaryChart::build(&[], RankPolicy::default());
        assert!(chart.is_empty());
        assert_eq!(chart.stats, None);
    }

    #[test]
    fn unparseable_salaries_are_skipped() {
        let employees = normalize(&[
            row("Ann", "London", "n/a"),
            row("Bob", "London", "$10"),
        ]);
        let chart = SalaryChart::build(&employees, RankPolicy::Arrival);
        assert_eq!(salaries(&chart), [10]);

        let none = normalize(&[row("Ann", "London", "n/a")]);
        assert_eq!(SalaryChart::build(&none, RankPolicy::Arrival).stats, None);
    }

    #[test]
    fn stats_round_average_half_up() {
        let employees = normalize(&[
            row("Ann", "London", "$1"),
            row("Bob", "London", "$2"),
        ]);
        let stats = SalaryChart::build(&employees, RankPolicy::ByValue)
            .stats
            .unwrap();
        assert_eq!(stats.highest, 2);
        assert_eq!(stats.lowest, 1);
        assert_eq!(stats.average, 2); // 1.5 rounds up
    }

    #[test]
    fn ties_keep_input_order() {
        let employees = normalize(&[
            row("First", "London", "$5,000"),
            row("Second", "London", "$5,000"),
        ]);
        let chart = SalaryChart::build(&employees, RankPolicy::ByValue);
        assert_eq!(chart.entries[0].name, "First");
        assert_eq!(chart.entries[1].name, "Second");
    }

    #[test]
    fn bar_percent_relative_to_highest() {
        let employees = normalize(&[
            row("Ann", "London", "$50"),
            row("Bob", "London", "$100"),
            row("Zed", "London", "$0"),
        ]);
        let chart = SalaryChart::build(&employees, RankPolicy::ByValue);
        assert_eq!(chart.bar_percent(&chart.entries[0]), 100.0);
        assert_eq!(chart.bar_percent(&chart.entries[1]), 50.0);
        assert_eq!(chart.bar_percent(&chart.entries[2]), 0.0);

        let zeros = normalize(&[row("Zed", "London", "$0")]);
        let chart = SalaryChart::build(&zeros, RankPolicy::ByValue);
        assert_eq!(chart.bar_percent(&chart.entries[0]), 0.0);
    }
}
