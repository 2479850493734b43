pub mod page_driver;
pub mod page_session;

pub use page_driver::PageDriver;
pub use page_session::PageSession;
