//! Reporting: period windows and pure aggregation over expense rows.

mod aggregation;
mod endpoints;
mod period;

pub use aggregation::{
    CategoryAggregate, UNCATEGORIZED_LABEL, by_category, by_date, by_month, category_breakdown,
    grand_total,
};
pub use endpoints::{report_data_endpoint, year_report_endpoint};
pub use period::{Period, WindowRange};
