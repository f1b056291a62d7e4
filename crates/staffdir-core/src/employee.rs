//! The employee record and positional normalisation of the roster table.
//!
//! The backend returns rows of six strings in a fixed column order:
//! name, position, city, employee id, start date, salary. The mapping is
//! purely positional; nothing is trimmed or validated.

use serde::{Deserialize, Serialize};

/// One positional row of the raw roster table.
pub type RawRow = Vec<String>;

/// The raw roster table as returned by the data endpoint.
pub type RawTable = Vec<RawRow>;

/// A single employee, as normalised from one row of the roster table.
///
/// `id` is synthesised from the row position (1-based) and is only unique
/// within one fetch. Use `employee_id` when identity has to survive a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub city: String,
    pub employee_id: String,
    pub start_date: String,
    /// Currency-formatted, e.g. `"$120,000"`. See [`crate::parse_salary`].
    pub salary: String,
}

impl Employee {
    /// First character of the name, used as the avatar letter on detail cards.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Normalise a raw table into employees, preserving row order.
///
/// Ids are assigned `"1"..="N"` by position. Short rows leave the missing
/// fields empty; extra columns are ignored.
pub fn normalize(rows: &[RawRow]) -> Vec<Employee> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let col = |i: usize| row.get(i).cloned().unwrap_or_default();
            Employee {
                id: (index + 1).to_string(),
                name: col(0),
                position: col(1),
                city: col(2),
                employee_id: col(3),
                start_date: col(4),
                salary: col(5),
            }
        })
        .collect()
}

/// Linear lookup by synthesised id.
pub fn find_by_id<'a>(employees: &'a [Employee], id: &str) -> Option<&'a Employee> {
    employees.iter().find(|e| e.id == id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(name: &str, city: &str, salary: &str) -> RawRow {
        vec![
            name.into(),
            "Engineer".into(),
            city.into(),
            "5421".into(),
            "2011/04/25".into(),
            salary.into(),
        ]
    }

    #[test]
    fn ids_follow_input_order() {
        let rows = vec![
            row("Tiger Nixon", "Edinburgh", "$320,800"),
            row("Garrett Winters", "Tokyo", "$170,750"),
            row("Ashton Cox", "San Francisco", "$86,000"),
        ];
        let employees = normalize(&rows);
        assert_eq!(employees.len(), 3);
        let ids: Vec<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(employees[0].name, "Tiger Nixon");
        assert_eq!(employees[2].city, "San Francisco");
    }

    #[test]
    fn columns_map_positionally() {
        let rows = vec![vec![
            "Cedric Kelly".to_string(),
            "Senior Javascript Developer".to_string(),
            "Edinburgh".to_string(),
            "6224".to_string(),
            "2012/03/29".to_string(),
            "$433,060".to_string(),
        ]];
        let e = &normalize(&rows)[0];
        assert_eq!(e.position, "Senior Javascript Developer");
        assert_eq!(e.employee_id, "6224");
        assert_eq!(e.start_date, "2012/03/29");
        assert_eq!(e.salary, "$433,060");
    }

    #[test]
    fn fields_pass_through_unvalidated() {
        let rows = vec![row("  padded  ", "Nowhere", "not a salary")];
        let e = &normalize(&rows)[0];
        assert_eq!(e.name, "  padded  ");
        assert_eq!(e.salary, "not a salary");
    }

    #[test]
    fn short_rows_leave_fields_empty() {
        let rows = vec![vec!["Only Name".to_string()]];
        let e = &normalize(&rows)[0];
        assert_eq!(e.name, "Only Name");
        assert_eq!(e.position, "");
        assert_eq!(e.salary, "");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let mut r = row("Airi Satou", "Tokyo", "$162,700");
        r.push("unexpected".into());
        let e = &normalize(&[r])[0];
        assert_eq!(e.salary, "$162,700");
    }

    #[test]
    fn empty_table() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn find_by_id_returns_matching_position() {
        let employees = normalize(&[
            row("Tiger Nixon", "Edinburgh", "$320,800"),
            row("Garrett Winters", "Tokyo", "$170,750"),
        ]);
        assert_eq!(find_by_id(&employees, "2").unwrap().name, "Garrett Winters");
        assert!(find_by_id(&employees, "3").is_none());
        assert!(find_by_id(&employees, "").is_none());
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let e = &normalize(&[row("Tiger Nixon", "Edinburgh", "$320,800")])[0];
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["employeeId"], "5421");
        assert_eq!(json["startDate"], "2011/04/25");
        let parsed: Employee = serde_json::from_value(json).unwrap();
        assert_eq!(&parsed, e);
    }

    #[test]
    fn initial_is_first_char() {
        let e = &normalize(&[row("Örjan Berg", "London", "$1")])[0];
        assert_eq!(e.initial(), Some('Ö'));
        let blank = &normalize(&[row("", "London", "$1")])[0];
        assert_eq!(blank.initial(), None);
    }
}
