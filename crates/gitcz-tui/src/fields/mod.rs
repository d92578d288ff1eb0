pub mod breaking;
pub mod footer;
pub mod ticket_number;
