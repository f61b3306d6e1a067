pub(super) mod add;
pub(super) mod delete;
pub(super) mod edit;
pub(super) mod export;
pub(super) mod get_field;
pub(super) mod import;
pub(super) mod modify;
pub(super) mod show;
