pub mod admin_builder;
pub mod builder;
pub mod cart_builder;
pub mod order_builder;
pub mod request_body;

pub use admin_builder::{AdminOrderForm, AdminOrderSource};
pub use builder::{build_request_body, tax_code_from_class, RequestSource};
pub use cart_builder::CartSource;
pub use order_builder::OrderSource;
pub use request_body::{
    is_postal_code_valid, ExemptionType, RequestLineItem, TaxRequestBody, NON_TAXABLE_TAX_CODE,
};
