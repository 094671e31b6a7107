pub mod id;
pub mod interval;
pub mod notification;
pub mod occupancy;
pub mod policy;
pub mod reservation;
pub mod role;
pub mod space;
