pub mod policy;
pub mod reservation;
pub mod space;
