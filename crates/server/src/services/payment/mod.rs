pub mod invoice_service;
pub mod ledger_service;
