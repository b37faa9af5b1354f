pub mod amount;
pub mod analytics;
pub mod calendar;
pub mod dashboard;
pub mod filters;
pub mod hostels;
pub mod invoices;
pub mod merchants;
pub mod products;
pub mod reviews;
pub mod schools;
pub mod users;
pub mod verification;

#[cfg(test)]
pub(crate) mod fixtures;
