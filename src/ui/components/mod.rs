mod command_input;
mod input;
mod key_result;
mod quantity;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use key_result::KeyResult;
pub use quantity::QuantitySelector;
pub use search_input::{SearchEvent, SearchInput};
