pub mod invoice_dto;
pub mod referral_dto;
pub mod static_dto;
