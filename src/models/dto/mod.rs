pub mod question_dto;
pub mod response;
