pub mod audit;
pub mod labs;
pub mod moderator_labs;
pub mod password_reset_tokens;
pub mod reservations;
pub mod two_factor_codes;
pub mod users;
