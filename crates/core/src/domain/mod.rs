pub mod dashboard;
pub mod market;
pub mod product;
pub mod vendor;

#[cfg(test)]
pub(crate) mod fixtures;
