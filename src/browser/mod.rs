pub mod driver;
pub mod input;
pub mod navigator;
pub mod waiter;

pub use driver::{BrowserSession, DriverStrategy, acquire, with_session};
pub use input::fill_input;
pub use navigator::navigate;
pub use waiter::{Condition, Locator, wait_for, wait_for_stable};
