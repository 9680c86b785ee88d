pub mod account;
pub mod certificates;
pub mod courses;
pub mod quizzes;
pub mod video;
pub mod wallets;
