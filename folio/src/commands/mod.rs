pub mod contact;
pub mod email;
pub mod migrate;
pub mod serve;
