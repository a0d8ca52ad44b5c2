mod boot_manager;
mod selection_storage;

pub(crate) use boot_manager::BootManager;
pub(crate) use selection_storage::SelectionStorage;
