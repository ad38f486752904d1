pub mod compare;
pub mod grade;
pub mod init;
pub mod play;
pub mod reset;
pub mod validate;
pub mod weak_spots;
