use std::fmt::Display;

use inquire::Select;
use nickdl::errors::*;

const PAGE_SIZE: usize = 15;

/// asks the user to pick one of `items`.
pub fn choose<T: Display + Clone>(name: &str, items: &[T]) -> Result<T> {
    if items.is_empty() {
        return Err(NickError::Message(format!("there is no {name} to choose from")));
    }

    Select::new(&format!("{name}:"), items.to_vec())
        .with_page_size(PAGE_SIZE)
        .with_help_message("type to filter, enter to select")
        .prompt()
        .map_err(|err| NickError::Message(format!("failed to read {name}: {err}")))
}
