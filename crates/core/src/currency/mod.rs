//! Currency conversion with banker's rounding.

pub mod service;

pub use service::CurrencyService;
