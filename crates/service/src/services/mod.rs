pub mod category_service;
pub mod expense_service;
pub mod payment_method_service;
pub mod user_service;
