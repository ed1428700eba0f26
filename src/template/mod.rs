//! Template catalogue and document endpoints.

pub mod model;
pub mod routes;

#[cfg(test)]
mod tests;
