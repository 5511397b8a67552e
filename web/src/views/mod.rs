mod components;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::Dashboard;

mod employees;
pub use employees::Employees;

mod employee_form;
pub use employee_form::{EmployeeCreate, EmployeeEdit};

mod profile;
pub use profile::Profile;
