pub mod document;
pub mod history;
pub mod page;
pub mod settings;
