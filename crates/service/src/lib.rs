pub mod balance;
pub mod errors;
pub mod month;
pub mod seed;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
