pub(crate) mod account_service;
pub(crate) mod admin_service;
pub(crate) mod error;
pub(crate) mod media_service;
pub(crate) mod resource_service;
