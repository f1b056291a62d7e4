//! City grouping and map aggregation.
//!
//! Employees are partitioned by their `city` field, then each group is
//! matched against a compiled-in coordinate table. Groups whose city is not
//! in the table cannot be placed on the map; they are kept aside in
//! [`MapProjection::unmapped`] and logged rather than silently vanishing.

use std::collections::HashMap;

use tracing::warn;

use crate::employee::Employee;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Known office locations. "Sidney" is spelled as the backend spells it.
pub const CITY_COORDINATES: &[(&str, Coordinates)] = &[
    ("Edinburgh", Coordinates { lat: 55.9533, lng: -3.1883 }),
    ("Tokyo", Coordinates { lat: 35.6762, lng: 139.6503 }),
    ("San Francisco", Coordinates { lat: 37.7749, lng: -122.4194 }),
    ("New York", Coordinates { lat: 40.7128, lng: -74.006 }),
    ("London", Coordinates { lat: 51.5074, lng: -0.1278 }),
    ("Sidney", Coordinates { lat: -33.8688, lng: 151.2093 }),
    ("Singapore", Coordinates { lat: 1.3521, lng: 103.8198 }),
];

/// Exact, case-sensitive lookup in [`CITY_COORDINATES`].
pub fn lookup_coordinates(city: &str) -> Option<Coordinates> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, coords)| *coords)
}

/// Employees sharing a city, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct CityGroup {
    pub city: String,
    pub employees: Vec<Employee>,
}

/// Partition employees by city.
///
/// Groups appear in order of the city's first occurrence; members keep
/// their input order. Every employee lands in exactly one group.
pub fn group_by_city(employees: &[Employee]) -> Vec<CityGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CityGroup> = Vec::new();

    for employee in employees {
        let slot = *index.entry(employee.city.as_str()).or_insert_with(|| {
            groups.push(CityGroup {
                city: employee.city.clone(),
                employees: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].employees.push(employee.clone());
    }

    groups
}

/// Marker size/colour tier by head count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OfficeTier {
    /// Fewer than 5 employees.
    Small,
    /// 5 to 9 employees.
    Medium,
    /// 10 or more employees.
    Large,
}

impl OfficeTier {
    pub fn for_headcount(count: usize) -> Self {
        match count {
            0..=4 => Self::Small,
            5..=9 => Self::Medium,
            _ => Self::Large,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// A city group that could be placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAggregate {
    pub city: String,
    pub employees: Vec<Employee>,
    pub coordinates: Coordinates,
}

impl CityAggregate {
    pub fn headcount(&self) -> usize {
        self.employees.len()
    }

    pub fn tier(&self) -> OfficeTier {
        OfficeTier::for_headcount(self.headcount())
    }

    /// The first `limit` members and how many were left out.
    pub fn preview(&self, limit: usize) -> (&[Employee], usize) {
        let shown = &self.employees[..self.employees.len().min(limit)];
        (shown, self.employees.len() - shown.len())
    }
}

/// Head-count statistics over the mapped cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStats {
    pub total_cities: usize,
    pub total_employees: usize,
    pub largest_office: usize,
    /// Rounded half up.
    pub average_per_city: usize,
}

/// The map view's projection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapProjection {
    /// Cities with known coordinates, in order of first appearance.
    pub cities: Vec<CityAggregate>,
    /// Groups dropped because their city has no coordinates.
    pub unmapped: Vec<CityGroup>,
}

impl MapProjection {
    pub fn build(employees: &[Employee]) -> Self {
        let mut projection = Self::default();
        for group in group_by_city(employees) {
            match lookup_coordinates(&group.city) {
                Some(coordinates) => projection.cities.push(CityAggregate {
                    city: group.city,
                    employees: group.employees,
                    coordinates,
                }),
                None => {
                    warn!(
                        city = %group.city,
                        employees = group.employees.len(),
                        "city has no coordinates, excluded from map"
                    );
                    projection.unmapped.push(group);
                }
            }
        }
        projection
    }

    /// Cities ordered by head count, largest first. Ties keep map order.
    pub fn by_headcount(&self) -> Vec<&CityAggregate> {
        let mut sorted: Vec<&CityAggregate> = self.cities.iter().collect();
        sorted.sort_by(|a, b| b.headcount().cmp(&a.headcount()));
        sorted
    }

    pub fn select(&self, city: &str) -> Option<&CityAggregate> {
        self.cities.iter().find(|c| c.city == city)
    }

    /// `None` when no city could be mapped.
    pub fn stats(&self) -> Option<MapStats> {
        let largest_office = self.cities.iter().map(CityAggregate::headcount).max()?;
        let total_cities = self.cities.len();
        let total_employees: usize = self.cities.iter().map(CityAggregate::headcount).sum();
        Some(MapStats {
            total_cities,
            total_employees,
            largest_office,
            average_per_city: (2 * total_employees + total_cities) / (2 * total_cities),
        })
    }

    pub fn unmapped_employees(&self) -> usize {
        self.unmapped.iter().map(|g| g.employees.len()).sum()
    }
}
