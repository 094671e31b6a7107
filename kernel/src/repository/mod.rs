pub mod health;
pub mod policy;
pub mod reservation;
pub mod space;
