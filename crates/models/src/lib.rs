pub mod category;
pub mod db;
pub mod errors;
pub mod expense;
pub mod payment_method;
pub mod user;

#[cfg(test)]
mod tests;
