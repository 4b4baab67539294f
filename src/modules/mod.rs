pub mod application;
pub mod calculation;
pub mod commerce;
pub mod rates;
pub mod requests;
pub mod validation;
