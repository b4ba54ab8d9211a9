// victor-api: Async Rust client for the Victor Smart-Kill cloud API

pub mod api;
pub mod client;
pub mod decode;
pub mod error;
pub mod resources;

pub use api::VictorApi;
pub use client::{DEFAULT_BASE_URL, VictorClient};
pub use decode::UnknownFields;
pub use error::Error;
pub use resources::{
    Activity, MobileApp, Operator, Profile, TermsAndConditions, Trap, TrapStatistics, User,
};
