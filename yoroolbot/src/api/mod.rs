pub mod dispatch;
pub mod reply;
