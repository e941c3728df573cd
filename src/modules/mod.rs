pub mod accounts;
pub mod classes;
pub mod departments;
pub mod roles;
pub mod students;
pub mod teachers;
