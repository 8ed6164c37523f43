pub(crate) mod account_repository;
pub(crate) mod admin_repository;
pub(crate) mod resource_repository;
