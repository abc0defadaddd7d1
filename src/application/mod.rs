// Application layer: orchestration of model assembly and solving

pub mod schedule_service;

pub use schedule_service::ScheduleService;
