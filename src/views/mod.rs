pub mod dialogs;
pub mod peers;
