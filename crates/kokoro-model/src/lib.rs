pub mod error;
pub mod history;
pub mod login;
pub mod questionnaire;
pub mod resource;
pub mod response;
pub mod risk;
pub mod status;
pub mod submission;
pub mod user;
