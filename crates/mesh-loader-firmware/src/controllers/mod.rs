mod loader;

pub(crate) use loader::LoaderController;
