pub mod contact;
pub mod lead;
pub mod submission;
