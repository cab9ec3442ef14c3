pub mod referral_service;
