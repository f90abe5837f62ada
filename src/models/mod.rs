pub mod audit_log;
pub mod lab;
pub mod moderator_lab;
pub mod password_reset_token;
pub mod reservation;
pub mod two_factor_code;
pub mod user;

pub use audit_log::AuditLog;
pub use lab::Lab;
pub use moderator_lab::ModeratorLab;
pub use password_reset_token::PasswordResetToken;
pub use reservation::{Reservation, ReservationStatus};
pub use two_factor_code::TwoFactorCode;
pub use user::{ModeratorType, Role, User};
