mod employee_dto;

pub use employee_dto::{CreateEmployeeDto, EmployeeResponseDto, UpdateEmployeeDto};
