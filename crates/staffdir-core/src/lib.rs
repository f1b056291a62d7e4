//! Core types for staffdir: the employee record, table normalisation, and
//! the per-view projections (city map, salary chart, id lookup).

pub mod chart;
pub mod employee;
pub mod geo;
pub mod salary;

pub use chart::{RankPolicy, SalaryChart, SalaryRankEntry, SalaryStats, TOP_SALARY_COUNT};
pub use employee::{Employee, RawRow, RawTable, find_by_id, normalize};
pub use geo::{
    CITY_COORDINATES, CityAggregate, CityGroup, Coordinates, MapProjection, MapStats, OfficeTier,
    group_by_city, lookup_coordinates,
};
pub use salary::{format_salary, parse_salary};
