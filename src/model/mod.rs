pub mod employee;
pub mod filial;
pub mod payroll;
pub mod period;
pub mod user;
