pub(crate) mod filters;
pub(crate) mod settings;
pub(crate) mod tester;
